mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalSource;

use crate::error::Result;

/// A configured schema location
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub source_type: SourceType,
}

#[derive(Debug, Clone)]
pub enum SourceType {
    Http(HttpSource),
    Local(LocalSource),
}

/// Somewhere a single schema document can be read from
pub trait SchemaSource {
    /// Human-readable location, used in errors and logs
    fn location(&self) -> String;

    fn fetch(&self) -> impl Future<Output = Result<String>>;
}

impl SchemaSource for SourceType {
    fn location(&self) -> String {
        match self {
            SourceType::Http(s) => s.location(),
            SourceType::Local(s) => s.location(),
        }
    }

    async fn fetch(&self) -> Result<String> {
        match self {
            SourceType::Http(s) => s.fetch().await,
            SourceType::Local(s) => s.fetch().await,
        }
    }
}

impl SchemaSource for Source {
    fn location(&self) -> String {
        self.source_type.location()
    }

    async fn fetch(&self) -> Result<String> {
        self.source_type.fetch().await
    }
}
