//! Declaration block IR
//!
//! A declaration block is a `#[derive(...)]` line as emitted by the base
//! generator plus the `struct`/`enum` line it decorates. Only the derive line
//! is parsed with `syn`; the declaration line is read by its leading tokens.

use super::capability::Capability;
use syn::parse::Parser;
use syn::punctuated::Punctuated;

/// Derives the base generator always appends, in order
pub const GENERATOR_TRAILER: [&str; 2] = ["TypedBuilder", "JsonSchema"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Struct,
    Enum,
}

/// One classified declaration block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationBlock {
    /// Index of the derive line within the unit
    pub line: usize,
    /// Leading whitespace of the derive line
    pub indent: String,
    pub derives: Vec<Capability>,
    pub shape: Shape,
    pub type_name: String,
    pub custom_resource: bool,
}

/// Parse a single-line `#[derive(...)]` attribute into its derive names
///
/// Returns `None` for anything that is not exactly one derive attribute.
pub fn parse_derive_line(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with("#[derive") {
        return None;
    }

    let attrs = syn::Attribute::parse_outer.parse_str(trimmed).ok()?;
    let [attr] = attrs.as_slice() else {
        return None;
    };
    if !attr.path().is_ident("derive") {
        return None;
    }

    let paths = attr
        .parse_args_with(Punctuated::<syn::Path, syn::Token![,]>::parse_terminated)
        .ok()?;
    Some(paths.iter().map(path_name).collect())
}

fn path_name(path: &syn::Path) -> String {
    let segments = path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{}", segments)
    } else {
        segments
    }
}

/// Whether a derive list carries the generator trailer after at least one base derive
pub fn has_generator_trailer(derives: &[String]) -> bool {
    derives.len() > GENERATOR_TRAILER.len() && derives.ends_with(&GENERATOR_TRAILER.map(String::from))
}

/// Read `[vis] struct|enum Name` off a declaration line
pub fn parse_declaration(line: &str) -> Option<(Shape, String)> {
    let rest = strip_visibility(line.trim_start());
    let (keyword, rest) = rest.split_once(char::is_whitespace)?;
    let shape = match keyword {
        "struct" => Shape::Struct,
        "enum" => Shape::Enum,
        _ => return None,
    };

    let name: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        return None;
    }
    Some((shape, name))
}

fn strip_visibility(s: &str) -> &str {
    match s.strip_prefix("pub") {
        Some(rest) if rest.starts_with('(') => rest
            .split_once(')')
            .map_or(s, |(_, after)| after.trim_start()),
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => s,
    }
}

/// Classify the block opened by the derive line at `index`
///
/// Returns `None` (pattern mismatch) when the line is not a generator derive
/// or no `struct`/`enum` declaration follows it.
pub fn classify(lines: &[String], index: usize) -> Option<DeclarationBlock> {
    let line = lines.get(index)?;
    let derives = parse_derive_line(line)?;
    if !has_generator_trailer(&derives) {
        return None;
    }

    let (shape, type_name) = find_declaration(&lines[index + 1..])?;
    let derives: Vec<Capability> = derives.iter().map(|d| Capability::from_derive(d)).collect();
    let custom_resource = derives.contains(&Capability::CustomResource);
    let indent = line[..line.len() - line.trim_start().len()].to_string();

    Some(DeclarationBlock {
        line: index,
        indent,
        derives,
        shape,
        type_name,
        custom_resource,
    })
}

/// Skip blank lines, attributes and comments up to the declaration line
fn find_declaration(lines: &[String]) -> Option<(Shape, String)> {
    let mut depth = 0usize;
    for line in lines {
        let trimmed = line.trim();
        if depth > 0 {
            depth = bracket_depth(depth, trimmed);
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.starts_with("#[") {
            depth = bracket_depth(0, trimmed);
            continue;
        }
        return parse_declaration(trimmed);
    }
    None
}

// Tracks attributes spanning several lines
fn bracket_depth(start: usize, line: &str) -> usize {
    line.chars().fold(start, |depth, c| match c {
        '[' => depth + 1,
        ']' => depth.saturating_sub(1),
        _ => depth,
    })
}
