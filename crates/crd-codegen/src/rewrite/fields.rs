use super::capability::FeatureGate;

/// Wrap field-level `#[builder(...)]` attributes in the builder gate
pub fn gate_builder_fields(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| match gate_builder_attribute(&line) {
            Some(gated) => gated,
            None => line,
        })
        .collect()
}

fn gate_builder_attribute(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let args = trimmed.strip_prefix("#[builder(")?.strip_suffix(")]")?;
    let indent = &line[..line.len() - line.trim_start().len()];
    Some(format!(
        "{indent}#[cfg_attr(feature = \"{}\", builder({args}))]",
        FeatureGate::Builder.feature()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> String {
        gate_builder_fields(text.lines().map(String::from).collect()).join("\n")
    }

    #[test]
    fn test_gates_builder_attribute() {
        let input = "    #[builder(default, setter(into, strip_option))]\n    pub hostname: Option<String>,";
        let expected = "    #[cfg_attr(feature = \"builder\", builder(default, setter(into, strip_option)))]\n    pub hostname: Option<String>,";
        assert_eq!(run(input), expected);
    }

    #[test]
    fn test_already_gated_untouched() {
        let input = "    #[cfg_attr(feature = \"builder\", builder(default))]";
        assert_eq!(run(input), input);
    }

    #[test]
    fn test_other_attributes_untouched() {
        let input = "    #[serde(default, skip_serializing_if = \"Option::is_none\")]";
        assert_eq!(run(input), input);
    }
}
