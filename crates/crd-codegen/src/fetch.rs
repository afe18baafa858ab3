pub mod sources;

pub use sources::{HttpSource, LocalSource, SchemaSource, Source, SourceType};

use crate::error::Result;
use crate::schema::SchemaDocument;

/// Retrieves schema documents and derives their module identifiers
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    strip_suffix: Option<String>,
}

impl Fetcher {
    pub fn new(strip_suffix: Option<String>) -> Self {
        Self { strip_suffix }
    }

    /// Fetch and parse one document
    pub async fn fetch<S: SchemaSource>(&self, source: &S) -> Result<SchemaDocument> {
        let location = source.location();
        tracing::debug!(%location, "fetching schema");

        let text = source.fetch().await?;
        SchemaDocument::from_yaml(location, &text, self.strip_suffix.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_local_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gateways.yaml");
        std::fs::write(
            &path,
            "kind: CustomResourceDefinition\nmetadata:\n  name: gateways.gateway.networking.k8s.io\n",
        )
        .expect("write");

        let fetcher = Fetcher::new(Some(".gateway.networking.k8s.io".into()));
        let doc = fetcher
            .fetch(&LocalSource { path: path.clone() })
            .await
            .expect("fetch");

        assert_eq!(doc.id, "gateways");
        assert_eq!(doc.location, path.display().to_string());
    }
}
