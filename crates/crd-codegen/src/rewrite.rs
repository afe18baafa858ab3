//! Post-generation rewrite of generator output
//!
//! The base generator derives every optional capability unconditionally.
//! This module turns each generator derive line into one unconditional
//! derive plus `cfg_attr` derives for the optional capabilities, then gates
//! the matching imports and field attributes.
//!
//! Passes run in a fixed order, each over the output of the previous one:
//!
//! 1. declaration blocks (classify, apply exclusions, re-emit)
//! 2. import gate
//! 3. field builder gate
//!
//! Lines that match no rule pass through unchanged.

pub mod block;
pub mod capability;
pub mod fields;
pub mod imports;

use block::{DeclarationBlock, Shape};
use capability::{Capability, Rule};
use std::collections::BTreeSet;

/// Type names that never get `Default`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Exact, case-sensitive match
    pub fn contains(&self, type_name: &str) -> bool {
        self.names.contains(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Counts of what a rewrite touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub structs: usize,
    pub enums: usize,
    pub custom_resources: usize,
    pub excluded: usize,
}

impl RewriteStats {
    pub fn blocks(&self) -> usize {
        self.structs + self.enums
    }
}

/// Rewrites generated units against a fixed exclusion set
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    exclusions: ExclusionSet,
}

impl Rewriter {
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self { exclusions }
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Run every pass over one generated unit
    pub fn rewrite(&self, unit: &str) -> (String, RewriteStats) {
        let lines: Vec<String> = unit.lines().map(String::from).collect();

        let (lines, stats) = self.rewrite_blocks(lines);
        let lines = imports::gate_imports(lines);
        let lines = fields::gate_builder_fields(lines);

        let mut text = lines.join("\n");
        if unit.ends_with('\n') {
            text.push('\n');
        }
        (text, stats)
    }

    fn rewrite_blocks(&self, lines: Vec<String>) -> (Vec<String>, RewriteStats) {
        let mut stats = RewriteStats::default();
        let mut out = Vec::with_capacity(lines.len());

        for index in 0..lines.len() {
            match block::classify(&lines, index) {
                Some(block) => {
                    match block.shape {
                        Shape::Struct => stats.structs += 1,
                        Shape::Enum => stats.enums += 1,
                    }
                    if block.custom_resource {
                        stats.custom_resources += 1;
                    }
                    if self.exclusions.contains(&block.type_name) {
                        stats.excluded += 1;
                    }
                    out.extend(self.render(&block));
                }
                None => {
                    if block::parse_derive_line(&lines[index]).is_some() {
                        tracing::trace!(line = index + 1, "derive line left unchanged");
                    }
                    out.push(lines[index].clone());
                }
            }
        }

        (out, stats)
    }

    /// Re-emit a block's derive line from the decision table
    pub fn render(&self, block: &DeclarationBlock) -> Vec<String> {
        let rule = Rule::for_block(block.shape, block.custom_resource);
        let excluded = self.exclusions.contains(&block.type_name);

        let mut always: Vec<Capability> = block
            .derives
            .iter()
            .filter(|c| c.gate().is_none())
            .cloned()
            .collect();
        if rule.equality {
            push_unique(&mut always, Capability::Equality);
        }
        if rule.default_value && !excluded {
            push_unique(&mut always, Capability::DefaultValue);
        }
        if excluded {
            always.retain(|c| *c != Capability::DefaultValue);
        }

        let indent = &block.indent;
        let names: Vec<&str> = always.iter().map(Capability::derive_name).collect();
        let mut lines = vec![format!("{indent}#[derive({})]", names.join(", "))];

        for gate in rule.gated {
            lines.push(format!(
                "{indent}#[cfg_attr(feature = \"{}\", derive({}))]",
                gate.feature(),
                gate.capability().derive_name()
            ));
        }
        if rule.schema_disabled {
            lines.push(format!(
                "{indent}#[cfg_attr(not(feature = \"{}\"), kube(schema = \"disabled\"))]",
                capability::FeatureGate::Schemars.feature()
            ));
        }

        lines
    }
}

fn push_unique(list: &mut Vec<Capability>, capability: Capability) {
    if !list.contains(&capability) {
        list.push(capability);
    }
}

/// Rewrite one unit with the given exclusions
pub fn rewrite_unit(unit: &str, exclusions: &ExclusionSet) -> String {
    Rewriter::new(exclusions.clone()).rewrite(unit).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "Serialize, Deserialize, Clone, Debug";

    fn derive_line(extra: &str) -> String {
        format!("#[derive({extra}{BASE}, TypedBuilder, JsonSchema)]")
    }

    fn exclusions(names: &[&str]) -> ExclusionSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_plain_struct() {
        let unit = format!("{}\npub struct WidgetSpec {{\n    pub size: i64,\n}}\n", derive_line(""));
        let out = rewrite_unit(&unit, &ExclusionSet::new());
        let expected = r#"#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "builder", derive(TypedBuilder))]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub struct WidgetSpec {
    pub size: i64,
}
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_excluded_struct_has_no_default() {
        let unit = format!("{}\npub struct WidgetStatusConditions {{\n}}", derive_line(""));
        let out = rewrite_unit(&unit, &exclusions(&["WidgetStatusConditions"]));
        assert!(out.starts_with("#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]\n"));
        assert!(!out.contains("Default"));
        assert!(out.contains("derive(TypedBuilder)"));
    }

    #[test]
    fn test_exclusion_is_exact() {
        let unit = format!("{}\npub struct WidgetStatusConditions {{\n}}", derive_line(""));
        for near_miss in ["WidgetStatus", "widgetstatusconditions", "WidgetStatusConditionsX"] {
            let out = rewrite_unit(&unit, &exclusions(&[near_miss]));
            assert!(out.contains("PartialEq, Default)]"), "{near_miss} should not match");
        }
    }

    #[test]
    fn test_exclusion_removes_existing_default() {
        let unit = "#[derive(Clone, Default, TypedBuilder, JsonSchema)]\npub struct Quiet {\n}";
        let out = rewrite_unit(unit, &exclusions(&["Quiet"]));
        assert!(out.starts_with("#[derive(Clone, PartialEq)]\n"));
    }

    #[test]
    fn test_enum_gets_no_builder() {
        let unit = format!("{}\npub enum WidgetPhase {{\n    Pending,\n}}", derive_line(""));
        let out = rewrite_unit(&unit, &ExclusionSet::new());
        let expected = r#"#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
pub enum WidgetPhase {
    Pending,
}"#;
        assert_eq!(out, expected);
        assert!(!out.contains("TypedBuilder"));
        assert!(!out.contains("\"builder\""));
    }

    #[test]
    fn test_custom_resource_struct() {
        let unit = format!(
            "{}\n#[kube(group = \"example.io\", version = \"v1\", kind = \"Widget\", plural = \"widgets\")]\npub struct WidgetSpec {{\n}}",
            derive_line("CustomResource, ")
        );
        let out = rewrite_unit(&unit, &ExclusionSet::new());
        let expected = r#"#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "builder", derive(TypedBuilder))]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[cfg_attr(not(feature = "schemars"), kube(schema = "disabled"))]
#[kube(group = "example.io", version = "v1", kind = "Widget", plural = "widgets")]
pub struct WidgetSpec {
}"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_existing_equality_not_duplicated() {
        let unit = "#[derive(Clone, PartialEq, TypedBuilder, JsonSchema)]\npub struct Pair {\n}";
        let out = rewrite_unit(unit, &ExclusionSet::new());
        assert!(out.starts_with("#[derive(Clone, PartialEq, Default)]\n"));
    }

    #[test]
    fn test_unrecognized_blocks_pass_through() {
        let unit = "#[derive(Serialize, Deserialize, Clone, Debug)]\npub struct Plain {\n}\n\n#[derive(Clone, JsonSchema, TypedBuilder)]\npub struct Swapped {\n}";
        assert_eq!(rewrite_unit(unit, &ExclusionSet::new()), unit);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let unit = format!(
            "use schemars::JsonSchema;\nuse typed_builder::TypedBuilder;\n\n{}\npub struct WidgetSpec {{\n    #[builder(default)]\n    pub size: Option<i64>,\n}}\n\n{}\npub enum WidgetPhase {{\n    Pending,\n}}\n",
            derive_line(""),
            derive_line("")
        );
        let once = rewrite_unit(&unit, &ExclusionSet::new());
        let twice = rewrite_unit(&once, &ExclusionSet::new());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_stats() {
        let unit = format!(
            "{}\npub struct WidgetSpec {{\n}}\n{}\npub struct WidgetStatusConditions {{\n}}\n{}\npub enum WidgetPhase {{\n}}\n{}\npub struct Widget {{\n}}",
            derive_line("CustomResource, "),
            derive_line(""),
            derive_line(""),
            "#[derive(Clone)]"
        );
        let rewriter = Rewriter::new(exclusions(&["WidgetStatusConditions"]));
        let (_, stats) = rewriter.rewrite(&unit);
        assert_eq!(
            stats,
            RewriteStats {
                structs: 2,
                enums: 1,
                custom_resources: 1,
                excluded: 1,
            }
        );
        assert_eq!(stats.blocks(), 3);
    }

    #[test]
    fn test_indented_blocks_keep_indent() {
        let unit = "mod nested {\n    #[derive(Clone, TypedBuilder, JsonSchema)]\n    pub enum Mode {\n    }\n}";
        let out = rewrite_unit(unit, &ExclusionSet::new());
        assert!(out.contains("\n    #[derive(Clone, PartialEq)]\n    #[cfg_attr(feature = \"schemars\", derive(JsonSchema))]\n    pub enum Mode {"));
    }
}
