use crate::error::{CodegenError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::process::Command;

/// Rewrites a generated file in place
pub trait Formatter {
    fn format(&self, path: &Path) -> impl Future<Output = Result<()>>;
}

/// Built-in formatters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatterKind {
    /// External `rustfmt <file>`
    #[default]
    Rustfmt,
    /// In-process `prettyplease`; keeps the leading `//` header
    Prettyplease,
    /// Leave files as written
    Skip,
}

impl FromStr for FormatterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rustfmt" => Ok(Self::Rustfmt),
            "prettyplease" => Ok(Self::Prettyplease),
            "skip" | "none" => Ok(Self::Skip),
            other => Err(format!(
                "Unknown formatter: {other} (expected rustfmt, prettyplease or skip)"
            )),
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rustfmt => "rustfmt",
            Self::Prettyplease => "prettyplease",
            Self::Skip => "skip",
        })
    }
}

impl Formatter for FormatterKind {
    async fn format(&self, path: &Path) -> Result<()> {
        match self {
            Self::Rustfmt => rustfmt(path).await,
            Self::Prettyplease => {
                let source = tokio::fs::read_to_string(path).await?;
                let formatted = prettyplease_source(&source).map_err(|e| CodegenError::Format {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                tokio::fs::write(path, formatted).await?;
                Ok(())
            }
            Self::Skip => Ok(()),
        }
    }
}

async fn rustfmt(path: &Path) -> Result<()> {
    let status = Command::new("rustfmt")
        .arg(path)
        .status()
        .await
        .map_err(|e| CodegenError::Format {
            path: path.to_path_buf(),
            message: format!("could not run rustfmt: {e}"),
        })?;

    // rustfmt's verdict is informational only
    tracing::debug!(path = %path.display(), %status, "rustfmt finished");
    Ok(())
}

/// Format a whole file with prettyplease
///
/// Plain `//` comments are dropped by `syn`, so the leading comment header
/// is split off and put back on top.
pub fn prettyplease_source(source: &str) -> syn::Result<String> {
    let header_len = source
        .lines()
        .take_while(|line| {
            let line = line.trim_start();
            line.starts_with("//") && !line.starts_with("//!") && !line.starts_with("///")
        })
        .map(|line| line.len() + 1)
        .sum::<usize>()
        .min(source.len());
    let (header, body) = source.split_at(header_len);

    let file = syn::parse_file(body)?;
    let formatted = prettyplease::unparse(&file);

    if header.is_empty() {
        Ok(formatted)
    } else {
        let header = header.trim_end_matches('\n');
        Ok(format!("{header}\n\n{formatted}"))
    }
}
