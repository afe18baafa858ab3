use crate::fetch::sources::{HttpSource, LocalSource, Source, SourceType};
use crate::format::FormatterKind;
use crate::rewrite::ExclusionSet;
use miette::{IntoDiagnostic, Result, miette};
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST: &str = "lib.rs";

/// Everything a run needs, read from `crds.kdl`
#[derive(Debug, Clone)]
pub struct Config {
    pub output: OutputConfig,
    pub generator: GeneratorConfig,
    pub formatter: FormatterKind,
    /// Processed in declaration order
    pub sources: Vec<Source>,
    pub not_defaulted: ExclusionSet,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// File name of the manifest inside `dir`
    pub manifest: String,
    /// Suffix stripped from `metadata.name` to get the module name
    pub strip_suffix: Option<String>,
    /// Text placed above the module declarations in the manifest
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub command: String,
    /// Arguments after `-f <file>`
    pub args: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: "kopium".to_string(),
            args: vec![
                "--schema=derived".to_string(),
                "--docs".to_string(),
                "-b".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).into_diagnostic()?;
        Self::from_kdl(&text)
    }

    pub fn from_kdl(text: &str) -> Result<Self> {
        let doc = text
            .parse::<kdl::KdlDocument>()
            .map_err(|e| miette!("Failed to parse KDL: {}", e))?;

        let mut output: Option<OutputConfig> = None;
        let mut generator: Option<GeneratorConfig> = None;
        let mut formatter = FormatterKind::default();
        let mut sources = Vec::new();
        let mut not_defaulted = ExclusionSet::new();

        for node in doc.nodes() {
            match node.name().value() {
                "output" => {
                    if output.is_some() {
                        return Err(miette!("Multiple output blocks found"));
                    }
                    output = Some(parse_output(node)?);
                }
                "generator" => {
                    if generator.is_some() {
                        return Err(miette!("Multiple generator blocks found"));
                    }
                    generator = Some(parse_generator(node)?);
                }
                "formatter" => {
                    let val = first_string(node, "formatter")?;
                    formatter = val.parse().map_err(|e| miette!("{}", e))?;
                }
                "source" => {
                    sources.push(parse_source(node)?);
                }
                "not-defaulted" => {
                    for entry in node.entries() {
                        let name = entry
                            .value()
                            .as_string()
                            .ok_or_else(|| miette!("not-defaulted expects string values"))?;
                        not_defaulted.insert(name);
                    }
                }
                other => {
                    return Err(miette!("Unknown config node: {}", other));
                }
            }
        }

        let output = output.ok_or_else(|| miette!("Missing output block"))?;

        Ok(Config {
            output,
            generator: generator.unwrap_or_default(),
            formatter,
            sources,
            not_defaulted,
        })
    }
}

fn first_string<'a>(node: &'a kdl::KdlNode, what: &str) -> Result<&'a str> {
    node.entries()
        .get(0)
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| miette!("{} expects a string value", what))
}

fn parse_output(node: &kdl::KdlNode) -> Result<OutputConfig> {
    let children = node
        .children()
        .ok_or_else(|| miette!("output block has no children"))?;

    let mut dir: Option<PathBuf> = None;
    let mut manifest: Option<String> = None;
    let mut strip_suffix: Option<String> = None;
    let mut header: Option<String> = None;

    for child in children.nodes() {
        match child.name().value() {
            "dir" => {
                dir = Some(PathBuf::from(first_string(child, "dir")?));
            }
            "manifest" => {
                manifest = Some(first_string(child, "manifest")?.to_string());
            }
            "strip-suffix" => {
                strip_suffix = Some(first_string(child, "strip-suffix")?.to_string());
            }
            "header" => {
                header = Some(first_string(child, "header")?.to_string());
            }
            other => {
                return Err(miette!("Unknown output field: {}", other));
            }
        }
    }

    Ok(OutputConfig {
        dir: dir.ok_or_else(|| miette!("Missing output directory"))?,
        manifest: manifest.unwrap_or_else(|| DEFAULT_MANIFEST.to_string()),
        strip_suffix,
        header: header.unwrap_or_default(),
    })
}

fn parse_generator(node: &kdl::KdlNode) -> Result<GeneratorConfig> {
    let children = node
        .children()
        .ok_or_else(|| miette!("generator block has no children"))?;

    let mut config = GeneratorConfig::default();

    for child in children.nodes() {
        match child.name().value() {
            "command" => {
                config.command = first_string(child, "command")?.to_string();
            }
            "args" => {
                config.args = child
                    .entries()
                    .iter()
                    .map(|e| {
                        e.value()
                            .as_string()
                            .map(str::to_string)
                            .ok_or_else(|| miette!("args expects string values"))
                    })
                    .collect::<Result<Vec<_>>>()?;
            }
            other => {
                return Err(miette!("Unknown generator field: {}", other));
            }
        }
    }

    Ok(config)
}

fn parse_source(node: &kdl::KdlNode) -> Result<Source> {
    let name = node
        .entries()
        .get(0)
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| miette!("source expects a name as first argument"))?
        .to_string();

    let type_str = node
        .get("type")
        .and_then(|v| v.as_string())
        .ok_or_else(|| miette!("source {} missing type attribute", name))?;

    let children = node
        .children()
        .ok_or_else(|| miette!("source {} has no children", name))?;

    let source_type = match type_str {
        "http" => parse_http_source(children)?,
        "local" => parse_local_source(children)?,
        other => return Err(miette!("Unknown source type: {}", other)),
    };

    Ok(Source { name, source_type })
}

fn parse_http_source(children: &kdl::KdlDocument) -> Result<SourceType> {
    let mut url: Option<String> = None;

    for child in children.nodes() {
        match child.name().value() {
            "url" => {
                url = Some(first_string(child, "url")?.to_string());
            }
            other => {
                return Err(miette!("Unknown http source field: {}", other));
            }
        }
    }

    Ok(SourceType::Http(HttpSource {
        url: url.ok_or_else(|| miette!("Missing url"))?,
    }))
}

fn parse_local_source(children: &kdl::KdlDocument) -> Result<SourceType> {
    let mut path: Option<PathBuf> = None;

    for child in children.nodes() {
        match child.name().value() {
            "path" => {
                path = Some(PathBuf::from(first_string(child, "path")?));
            }
            other => {
                return Err(miette!("Unknown local source field: {}", other));
            }
        }
    }

    Ok(SourceType::Local(LocalSource {
        path: path.ok_or_else(|| miette!("Missing path"))?,
    }))
}
