use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod github;
mod loader;
mod model;
mod pdf;
mod render;
mod templates;
mod workflow;

use cli::RootArgs;
use github::GithubProjects;
use pdf::{SystemEngine, ENGINE_ENV};
use workflow::{generate, github_token_from_env, GenerateOptions};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let engine_command = args.engine.clone().or_else(|| {
        env::var(ENGINE_ENV)
            .ok()
            .filter(|raw| !raw.trim().is_empty())
    });
    let engine = SystemEngine::new(engine_command);
    let options = GenerateOptions {
        data_path: args.data,
        out_path: args.out,
        skip_enrichment: args.skip_github,
        github_token: github_token_from_env(),
    };

    let report = generate(&options, &GithubProjects::default(), &engine)
        .context("resume generation failed")?;
    tracing::info!(
        output = %report.output_path.display(),
        bytes = report.bytes_written,
        projects_added = ?report.projects_added,
        "resume generated"
    );
    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` selects info-level pipeline logs.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
