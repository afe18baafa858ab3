use super::capability::FeatureGate;

/// Imports that only exist to provide an optional capability
const GATED_IMPORTS: [(&str, FeatureGate); 2] = [
    ("use typed_builder::TypedBuilder;", FeatureGate::Builder),
    ("use schemars::JsonSchema;", FeatureGate::Schemars),
];

const CUSTOM_RESOURCE_IMPORT: &str = "use kube::CustomResource;";
const CUSTOM_RESOURCE_IMPORT_DERIVE: &str = "use kube_derive::CustomResource;";

pub fn cfg_line(gate: FeatureGate) -> String {
    format!("#[cfg(feature = \"{}\")]", gate.feature())
}

/// Gate capability-providing imports behind their feature flags
///
/// Also moves the `CustomResource` import to `kube_derive`. An import whose
/// previous line already carries its gate is left alone.
pub fn gate_imports(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + GATED_IMPORTS.len());

    for line in lines {
        let trimmed = line.trim();
        let (visibility, statement) = match trimmed.strip_prefix("pub ") {
            Some(rest) => ("pub ", rest),
            None => ("", trimmed),
        };
        let indent = &line[..line.len() - line.trim_start().len()];

        if statement == CUSTOM_RESOURCE_IMPORT {
            out.push(format!(
                "{indent}{visibility}{CUSTOM_RESOURCE_IMPORT_DERIVE}"
            ));
            continue;
        }

        if let Some((_, gate)) = GATED_IMPORTS.iter().find(|(import, _)| *import == statement) {
            let cfg = cfg_line(*gate);
            let already_gated = out.last().is_some_and(|prev| prev.trim() == cfg);
            if !already_gated {
                out.push(format!("{indent}{cfg}"));
            }
        }
        out.push(line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> String {
        gate_imports(text.lines().map(String::from).collect()).join("\n")
    }

    #[test]
    fn test_gates_optional_imports() {
        let input = "use kube::CustomResource;\nuse schemars::JsonSchema;\nuse serde::{Serialize, Deserialize};\nuse typed_builder::TypedBuilder;";
        let expected = "use kube_derive::CustomResource;\n#[cfg(feature = \"schemars\")]\nuse schemars::JsonSchema;\nuse serde::{Serialize, Deserialize};\n#[cfg(feature = \"builder\")]\nuse typed_builder::TypedBuilder;";
        assert_eq!(run(input), expected);
    }

    #[test]
    fn test_gate_is_idempotent() {
        let once = run("use schemars::JsonSchema;\nuse typed_builder::TypedBuilder;");
        let twice = run(&once);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("#[cfg(feature = \"schemars\")]").count(), 1);
        assert_eq!(twice.matches("#[cfg(feature = \"builder\")]").count(), 1);
    }

    #[test]
    fn test_prelude_style_imports() {
        let input = "mod prelude {\n    pub use kube::CustomResource;\n    pub use typed_builder::TypedBuilder;\n}";
        let expected = "mod prelude {\n    pub use kube_derive::CustomResource;\n    #[cfg(feature = \"builder\")]\n    pub use typed_builder::TypedBuilder;\n}";
        assert_eq!(run(input), expected);
    }

    #[test]
    fn test_other_lines_untouched() {
        let input = "use std::collections::BTreeMap;\n// use schemars::JsonSchema;\nuse kube::api::ObjectMeta;";
        assert_eq!(run(input), input);
    }
}
