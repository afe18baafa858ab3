use clap::Parser;
use crd_codegen::cli::CrdCodegenArgs;
use crd_codegen::config::Config;
use crd_codegen::pipeline::Pipeline;
use miette::{Result, miette};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CrdCodegenArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_env_filter(
            EnvFilter::try_from_env("CRD_CODEGEN_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = %args.config.display(), "reading config");
    let mut config = Config::load(&args.config)?;

    if let Some(output) = args.output {
        config.output.dir = output;
    }
    if let Some(formatter) = args.formatter {
        config.formatter = formatter.parse().map_err(|e| miette!("{}", e))?;
    }
    if let Some(generator) = args.generator {
        config.generator.command = generator;
    }

    tracing::info!(
        sources = config.sources.len(),
        not_defaulted = config.not_defaulted.len(),
        output = %config.output.dir.display(),
        "generating modules"
    );

    let pipeline = Pipeline::from_config(&config);
    let summary = pipeline.run(&config.sources).await?;

    println!(
        "Generated {} modules to {:?}",
        summary.modules.len(),
        config.output.dir
    );

    Ok(())
}
