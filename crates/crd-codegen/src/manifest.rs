use crate::error::Result;
use std::path::Path;

/// The crate root that re-exports every generated module
///
/// Entries keep insertion order, which is the source list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryManifest {
    header: String,
    modules: Vec<String>,
}

impl LibraryManifest {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            modules: Vec::new(),
        }
    }

    pub fn push(&mut self, module: impl Into<String>) {
        self.modules.push(module.into());
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = self.header.clone();
        if !out.is_empty() && !out.ends_with("\n\n") {
            out.push_str(if out.ends_with('\n') { "\n" } else { "\n\n" });
        }
        for module in &self.modules {
            out.push_str(&format!("pub mod {module};\npub use {module}::*;\n"));
        }
        out
    }

    /// Overwrite the manifest file
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}
