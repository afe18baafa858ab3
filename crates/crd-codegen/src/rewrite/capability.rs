use super::block::Shape;

/// A derive the base generator can attach to a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// `TypedBuilder`
    Builder,
    /// `JsonSchema`
    SchemaIntrospection,
    /// `PartialEq`
    Equality,
    /// `Default`
    DefaultValue,
    /// `CustomResource`
    CustomResource,
    /// Any other derive (`Serialize`, `Clone`, ...), always kept as-is
    Other(String),
}

impl Capability {
    pub fn from_derive(name: &str) -> Self {
        match name {
            "TypedBuilder" => Self::Builder,
            "JsonSchema" => Self::SchemaIntrospection,
            "PartialEq" => Self::Equality,
            "Default" => Self::DefaultValue,
            "CustomResource" => Self::CustomResource,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn derive_name(&self) -> &str {
        match self {
            Self::Builder => "TypedBuilder",
            Self::SchemaIntrospection => "JsonSchema",
            Self::Equality => "PartialEq",
            Self::DefaultValue => "Default",
            Self::CustomResource => "CustomResource",
            Self::Other(name) => name,
        }
    }

    /// Feature flag gating this capability, if it is optional
    pub fn gate(&self) -> Option<FeatureGate> {
        match self {
            Self::Builder => Some(FeatureGate::Builder),
            Self::SchemaIntrospection => Some(FeatureGate::Schemars),
            _ => None,
        }
    }
}

/// Cargo features of the generated crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureGate {
    Builder,
    Schemars,
}

impl FeatureGate {
    pub fn feature(self) -> &'static str {
        match self {
            Self::Builder => "builder",
            Self::Schemars => "schemars",
        }
    }

    pub fn capability(self) -> Capability {
        match self {
            Self::Builder => Capability::Builder,
            Self::Schemars => Capability::SchemaIntrospection,
        }
    }
}

/// What a declaration block turns into, picked from [`Rule::for_block`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Add `PartialEq` to the unconditional derive
    pub equality: bool,
    /// Add `Default` to the unconditional derive, unless the type is excluded
    pub default_value: bool,
    /// One `cfg_attr` derive line per entry, in this order
    pub gated: &'static [FeatureGate],
    /// Emit `kube(schema = "disabled")` when `schemars` is off
    pub schema_disabled: bool,
}

const STRUCT_GATES: &[FeatureGate] = &[FeatureGate::Builder, FeatureGate::Schemars];
// typed-builder cannot derive for enums
const ENUM_GATES: &[FeatureGate] = &[FeatureGate::Schemars];

impl Rule {
    /// Decision table keyed by `{shape, custom_resource}`
    pub fn for_block(shape: Shape, custom_resource: bool) -> Self {
        match (shape, custom_resource) {
            (Shape::Struct, true) => Rule {
                equality: true,
                default_value: true,
                gated: STRUCT_GATES,
                schema_disabled: true,
            },
            (Shape::Struct, false) => Rule {
                equality: true,
                default_value: true,
                gated: STRUCT_GATES,
                schema_disabled: false,
            },
            (Shape::Enum, custom_resource) => Rule {
                equality: true,
                default_value: false,
                gated: ENUM_GATES,
                schema_disabled: custom_resource,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names_round_trip() {
        for name in ["TypedBuilder", "JsonSchema", "PartialEq", "Default", "CustomResource", "Clone"] {
            assert_eq!(Capability::from_derive(name).derive_name(), name);
        }
        assert_eq!(
            Capability::from_derive("Serialize"),
            Capability::Other("Serialize".into())
        );
    }

    #[test]
    fn test_only_builder_and_schema_are_gated() {
        assert_eq!(Capability::Builder.gate(), Some(FeatureGate::Builder));
        assert_eq!(
            Capability::SchemaIntrospection.gate(),
            Some(FeatureGate::Schemars)
        );
        assert_eq!(Capability::Equality.gate(), None);
        assert_eq!(Capability::DefaultValue.gate(), None);
        assert_eq!(Capability::CustomResource.gate(), None);
    }

    #[test]
    fn test_enums_never_get_builder() {
        for custom_resource in [false, true] {
            let rule = Rule::for_block(Shape::Enum, custom_resource);
            assert!(!rule.gated.contains(&FeatureGate::Builder));
            assert_eq!(rule.gated, &[FeatureGate::Schemars]);
            assert!(!rule.default_value);
        }
    }

    #[test]
    fn test_custom_resource_disables_schema() {
        assert!(Rule::for_block(Shape::Struct, true).schema_disabled);
        assert!(!Rule::for_block(Shape::Struct, false).schema_disabled);
    }

    #[test]
    fn test_structs_get_equality_and_default() {
        let rule = Rule::for_block(Shape::Struct, false);
        assert!(rule.equality);
        assert!(rule.default_value);
        assert_eq!(rule.gated, &[FeatureGate::Builder, FeatureGate::Schemars]);
    }
}
