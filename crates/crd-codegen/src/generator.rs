//! Base generator invocation
//!
//! The base generator turns one CRD into Rust source with every capability
//! derived unconditionally. It runs as an external process; this module
//! only prepares its input and collects its output.

use crate::config::GeneratorConfig;
use crate::error::{CodegenError, Result};
use crate::schema::SchemaDocument;
use std::io::Write;
use std::path::Path;
use tokio::process::Command;

/// Raw generator output for one schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Module identifier of the source document
    pub id: String,
    pub source: String,
}

/// Anything that can turn a schema document into annotated Rust source
pub trait Generator {
    fn generate(&self, doc: &SchemaDocument) -> impl Future<Output = Result<GeneratedUnit>>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, doc: &SchemaDocument) -> impl Future<Output = Result<GeneratedUnit>> {
        (**self).generate(doc)
    }
}

/// Runs `kopium` (or a compatible tool) on a temporary copy of the document
#[derive(Debug, Clone)]
pub struct KopiumGenerator {
    program: String,
    args: Vec<String>,
}

impl KopiumGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl Default for KopiumGenerator {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl Generator for KopiumGenerator {
    async fn generate(&self, doc: &SchemaDocument) -> Result<GeneratedUnit> {
        let yaml = doc.to_yaml()?;

        // Must outlive the child process
        let mut input = tempfile::Builder::new()
            .prefix(&format!("{}-", doc.id))
            .suffix(".yaml")
            .tempfile()?;
        input.write_all(yaml.as_bytes())?;
        input.flush()?;

        tracing::debug!(
            program = %self.program,
            args = ?self.args,
            input = %input.path().display(),
            "running generator"
        );

        let output = Command::new(&self.program)
            .arg("-f")
            .arg(input.path())
            .args(&self.args)
            .output()
            .await
            .map_err(|source| CodegenError::GeneratorSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CodegenError::Generation {
                schema: doc.id.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let source = String::from_utf8_lossy(&output.stdout);
        Ok(GeneratedUnit {
            id: doc.id.clone(),
            source: normalize_command_header(&source, input.path(), &doc.id),
        })
    }
}

/// Replace the temporary input path in the generator's command header
///
/// Keeps regenerated files identical between runs.
pub fn normalize_command_header(source: &str, input: &Path, id: &str) -> String {
    let input = input.display().to_string();
    let stable = format!("{id}.yml");

    let mut out: Vec<String> = Vec::new();
    for line in source.lines() {
        if line.starts_with("// kopium command:") {
            out.push(line.replace(&input, &stable));
        } else {
            out.push(line.to_string());
        }
    }

    let mut text = out.join("\n");
    if source.ends_with('\n') {
        text.push('\n');
    }
    text
}
