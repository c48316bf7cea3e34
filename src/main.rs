use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use snippet_registry::cli::{CliArgs, Command, GenerateArgs};
use snippet_registry::codegen;
use snippet_registry::syntax::Highlighter;

fn main() {
    snippet_registry::tracing::init();

    let args = CliArgs::parse();
    let result = match args.command {
        Command::Generate(generate) => run_generate(generate),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let config = args.into_config().context("Failed to load configuration")?;
    tracing::debug!("Generating with {:?}", config);

    let generated = codegen::generate(&config, Arc::new(Highlighter::new()))
        .context("Registry generation failed")?;

    let compilation = &generated.compilation;
    tracing::info!(
        "{} snippets, {} files, {} descriptor modules -> {}",
        compilation.snippet_count,
        compilation.file_count,
        compilation.descriptor_files.len(),
        config.out_dir.display()
    );
    Ok(())
}
