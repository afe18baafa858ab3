//! Per-document driver
//!
//! fetch → generate → rewrite → write → format → register, one document at
//! a time in source order. The first failure aborts the run; files already
//! written stay on disk and the manifest is not written.

use crate::config::{Config, OutputConfig};
use crate::error::Result;
use crate::fetch::{Fetcher, SchemaSource};
use crate::format::{Formatter, FormatterKind};
use crate::generator::{Generator, KopiumGenerator};
use crate::manifest::LibraryManifest;
use crate::rewrite::{ExclusionSet, RewriteStats, Rewriter};
use std::path::PathBuf;

/// One module written by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedModule {
    pub id: String,
    pub path: PathBuf,
    pub stats: RewriteStats,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub modules: Vec<ProcessedModule>,
    pub manifest: PathBuf,
}

pub struct Pipeline<G, F> {
    fetcher: Fetcher,
    generator: G,
    formatter: F,
    rewriter: Rewriter,
    output: OutputConfig,
}

impl Pipeline<KopiumGenerator, FormatterKind> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.output.clone(),
            config.not_defaulted.clone(),
            KopiumGenerator::from_config(&config.generator),
            config.formatter,
        )
    }
}

impl<G: Generator, F: Formatter> Pipeline<G, F> {
    pub fn new(output: OutputConfig, exclusions: ExclusionSet, generator: G, formatter: F) -> Self {
        Self {
            fetcher: Fetcher::new(output.strip_suffix.clone()),
            generator,
            formatter,
            rewriter: Rewriter::new(exclusions),
            output,
        }
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Process every source in order, then write the manifest
    pub async fn run<S: SchemaSource>(&self, sources: &[S]) -> Result<RunSummary> {
        std::fs::create_dir_all(&self.output.dir)?;

        let mut manifest = LibraryManifest::new(self.output.header.clone());
        let mut modules = Vec::with_capacity(sources.len());

        for source in sources {
            let module = match self.process(source).await {
                Ok(module) => module,
                Err(e) => {
                    tracing::error!(location = %source.location(), "aborting run: {e}");
                    return Err(e);
                }
            };
            manifest.push(module.id.clone());
            modules.push(module);
        }

        let manifest_path = self.output.dir.join(&self.output.manifest);
        manifest.write(&manifest_path)?;
        tracing::info!(
            path = %manifest_path.display(),
            modules = manifest.len(),
            "wrote manifest"
        );

        Ok(RunSummary {
            modules,
            manifest: manifest_path,
        })
    }

    /// Turn one source into a formatted module file
    pub async fn process<S: SchemaSource>(&self, source: &S) -> Result<ProcessedModule> {
        let doc = self.fetcher.fetch(source).await?;
        let unit = self.generator.generate(&doc).await?;

        let (code, stats) = self.rewriter.rewrite(&unit.source);
        tracing::debug!(
            schema = %doc.id,
            structs = stats.structs,
            enums = stats.enums,
            custom_resources = stats.custom_resources,
            excluded = stats.excluded,
            "rewrote declaration blocks"
        );

        let path = self.output.dir.join(format!("{}.rs", doc.id));
        std::fs::write(&path, code)?;

        if let Err(e) = self.formatter.format(&path).await {
            tracing::warn!(path = %path.display(), "formatting failed: {e}");
        }

        tracing::info!(schema = %doc.name, path = %path.display(), "generated module");
        Ok(ProcessedModule {
            id: doc.id,
            path,
            stats,
        })
    }
}
