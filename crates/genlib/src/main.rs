#![allow(unused)]

use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod cache;
mod error;
mod prelude;
mod store;
mod synth;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate Python modules with an LLM the first time they are referenced"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Directory holding generated modules
    #[clap(long, env = "GENLIB_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "GENLIB_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Return the code for a dotted name, generating and caching it on first use
    Resolve(crate::synth::resolve::ResolveOptions),

    /// Print the prompt that would be sent for a dotted name
    Prompt(crate::synth::PromptOptions),

    /// Inspect and manage generated modules
    Cache(crate::cache::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Resolve(options) => crate::synth::resolve::run(options, app.global).await,
        SubCommands::Prompt(options) => crate::synth::run_prompt(options, app.global).await,
        SubCommands::Cache(sub_app) => crate::cache::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
