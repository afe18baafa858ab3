use crate::error::{CodegenError, Result};
use serde::Deserialize;

/// One retrieved CustomResourceDefinition
///
/// The full document is kept as a YAML value so it can be handed to the
/// generator untouched; only `metadata.name` is read out of it.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Module identifier, e.g. `httproutes`
    pub id: String,
    /// Declared `metadata.name`, e.g. `httproutes.gateway.networking.k8s.io`
    pub name: String,
    /// Where the document was fetched from
    pub location: String,
    pub document: serde_yaml::Value,
}

#[derive(Deserialize)]
struct CrdHeader {
    metadata: CrdMetadata,
}

#[derive(Deserialize)]
struct CrdMetadata {
    name: String,
}

impl SchemaDocument {
    /// Parse a YAML document and derive its module identifier
    pub fn from_yaml(
        location: impl Into<String>,
        text: &str,
        strip_suffix: Option<&str>,
    ) -> Result<Self> {
        let location = location.into();
        let document: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| CodegenError::invalid_schema(&location, e.to_string()))?;
        let header: CrdHeader = serde_yaml::from_value(document.clone()).map_err(|e| {
            CodegenError::invalid_schema(&location, format!("missing metadata.name: {e}"))
        })?;

        let name = header.metadata.name;
        let id = module_id(&name, strip_suffix);
        Ok(Self {
            id,
            name,
            location,
            document,
        })
    }

    /// Serialize the document back to YAML for the generator
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.document)
            .map_err(|e| CodegenError::invalid_schema(&self.location, e.to_string()))
    }
}

/// Derive a module identifier from a CRD name
///
/// The configured suffix is stripped when present; otherwise the plural
/// (first DNS label) is used.
pub fn module_id(name: &str, strip_suffix: Option<&str>) -> String {
    let stem = strip_suffix
        .and_then(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| name.split('.').next().unwrap_or(name));
    sanitize_name(stem)
}

/// Sanitize a string to be safe for identifiers and filenames
pub fn sanitize_name(s: &str) -> String {
    if s.is_empty() {
        return "unknown".to_string();
    }

    // Replace invalid characters with underscores
    let mut sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    // Ensure it doesn't start with a digit
    if sanitized
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit())
    {
        sanitized = format!("_{}", sanitized);
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.io
spec:
  group: example.io
"#;

    #[test]
    fn test_module_id_strips_configured_suffix() {
        assert_eq!(
            module_id("httproutes.gateway.networking.k8s.io", Some(".gateway.networking.k8s.io")),
            "httproutes"
        );
    }

    #[test]
    fn test_module_id_falls_back_to_plural() {
        assert_eq!(module_id("widgets.example.io", None), "widgets");
        assert_eq!(
            module_id("widgets.example.io", Some(".gateway.networking.k8s.io")),
            "widgets"
        );
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("tls-routes"), "tls_routes");
        assert_eq!(sanitize_name("3scale"), "_3scale");
        assert_eq!(sanitize_name(""), "unknown");
    }

    #[test]
    fn test_from_yaml() {
        let doc = SchemaDocument::from_yaml("widgets.yaml", WIDGETS, None).expect("parse");
        assert_eq!(doc.id, "widgets");
        assert_eq!(doc.name, "widgets.example.io");
        assert!(doc.to_yaml().expect("dump").contains("widgets.example.io"));
    }

    #[test]
    fn test_from_yaml_without_name() {
        let err = SchemaDocument::from_yaml("bad.yaml", "kind: Foo\n", None).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidSchema { .. }));
    }
}
