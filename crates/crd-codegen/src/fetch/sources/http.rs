use super::SchemaSource;
use crate::error::{CodegenError, Result};

#[derive(Debug, Clone)]
pub struct HttpSource {
    pub url: String,
}

impl SchemaSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        let retrieval = |source| CodegenError::Retrieval {
            location: self.url.clone(),
            source,
        };

        let resp = reqwest::get(&self.url)
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(retrieval)?;

        resp.text().await.map_err(retrieval)
    }
}
