use super::SchemaSource;
use crate::error::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalSource {
    pub path: PathBuf,
}

impl SchemaSource for LocalSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}
