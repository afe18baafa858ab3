use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning CRDs into Rust modules
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    /// IO error when reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to retrieve a schema document
    #[error("Failed to fetch schema from {location}")]
    #[diagnostic(
        code(crd::retrieval),
        help("Check that the URL is reachable and serves a raw YAML document")
    )]
    Retrieval {
        /// URL or path that was requested
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// Schema document does not have the expected CRD shape
    #[error("Invalid schema document at {location}: {message}")]
    #[diagnostic(
        code(crd::invalid_schema),
        help("Each source must point at a single CustomResourceDefinition with metadata.name set")
    )]
    InvalidSchema {
        /// URL or path the document came from
        location: String,
        message: String,
    },

    /// The base generator could not be started at all
    #[error("Failed to run generator `{program}`")]
    #[diagnostic(
        code(crd::generator_spawn),
        help("Install kopium (`cargo install kopium`) or point `generator.command` at it")
    )]
    GeneratorSpawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The base generator exited unsuccessfully
    #[error("Generator failed for {schema} ({status}):\n{stderr}")]
    #[diagnostic(code(crd::generation))]
    Generation {
        /// Module identifier of the schema being generated
        schema: String,
        /// Exit status as reported by the OS
        status: String,
        /// Diagnostic output of the tool, verbatim
        stderr: String,
    },

    /// Code formatting error
    #[error("Failed to format {}: {message}", path.display())]
    #[diagnostic(code(crd::format_error))]
    Format { path: PathBuf, message: String },

    /// Generic error with context
    #[error("{message}")]
    #[diagnostic(code(crd::error))]
    Other {
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CodegenError {
    /// Create an invalid schema error
    pub fn invalid_schema(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a generic error without a source
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error came from the base generator rejecting a document
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;
