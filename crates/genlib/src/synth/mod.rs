use crate::prelude::{eprintln, println, *};
use crate::store::FileStore;
use genlib_core::synth::{capitalized_is_class, CallerInfo, GenerationRequest, NamingRule, SymbolKind};
use std::path::PathBuf;
use std::time::Duration;

pub mod client;
pub mod pipeline;
pub mod resolve;

pub use client::{CompletionService, OpenAiClient, ServiceConfig, DEFAULT_MODEL};
pub use pipeline::{generate, prepare_prompt, try_generate, PreparedPrompt};

/// How the kind of a requested symbol is inferred from its name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum NamingConvention {
    /// Capitalized names are classes, everything else is a function
    #[default]
    Capitalized,
    /// Always generate a function
    Function,
    /// Always generate a class
    Class,
}

impl NamingConvention {
    pub fn rule(self) -> NamingRule {
        fn always_function(_: &str) -> SymbolKind {
            SymbolKind::Function
        }

        fn always_class(_: &str) -> SymbolKind {
            SymbolKind::Class
        }

        match self {
            NamingConvention::Capitalized => capitalized_is_class,
            NamingConvention::Function => always_function,
            NamingConvention::Class => always_class,
        }
    }
}

/// What to generate.
#[derive(Debug, Clone, clap::Args)]
pub struct RequestArgs {
    /// Dotted name of the module or symbol, e.g. `lib.totp.generate`
    pub dotted_name: String,

    /// What the module or symbol should do
    #[clap(long, short)]
    pub description: String,

    /// Source file that imports the requested name
    #[clap(long)]
    pub caller: Option<PathBuf>,

    /// File with the current source of the module being extended
    #[clap(long)]
    pub existing: Option<PathBuf>,

    /// How to decide between generating a function and a class
    #[clap(long, value_enum, default_value_t = NamingConvention::Capitalized)]
    pub naming: NamingConvention,
}

impl RequestArgs {
    /// Read the caller and existing-code files into a request.
    pub async fn into_request(self) -> Result<GenerationRequest> {
        let caller = match &self.caller {
            Some(path) => {
                let code = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| eyre!("Failed to read caller file '{}': {}", path.display(), e))?;
                Some(CallerInfo {
                    filename: Some(path.display().to_string()),
                    code,
                })
            }
            None => None,
        };

        let existing_code = match &self.existing {
            Some(path) => Some(
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| eyre!("Failed to read existing code '{}': {}", path.display(), e))?,
            ),
            None => None,
        };

        Ok(GenerationRequest {
            dotted_name: self.dotted_name,
            description: self.description,
            existing_code,
            caller,
        })
    }
}

/// Generation service settings.
#[derive(Debug, Clone, clap::Args)]
pub struct ServiceArgs {
    /// API key for the generation service
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Alternate OpenAI-compatible endpoint
    #[clap(long, env = "OPENAI_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Model used for code generation
    #[clap(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Request timeout in seconds (no timeout when omitted)
    #[clap(long)]
    pub timeout: Option<u64>,
}

impl From<ServiceArgs> for ServiceConfig {
    fn from(args: ServiceArgs) -> Self {
        ServiceConfig {
            api_key: args.api_key,
            base_url: args.base_url,
            model: args.model,
            timeout: args.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct PromptOptions {
    #[clap(flatten)]
    pub request: RequestArgs,
}

/// Print the system and user prompts without contacting the service.
pub async fn run_prompt(options: PromptOptions, global: crate::Global) -> Result<()> {
    let store = FileStore::open(global.cache_dir.clone())?;
    let naming_rule = options.request.naming.rule();
    let request = options.request.into_request().await?;

    let prompt = prepare_prompt(&store, &request, naming_rule)?;

    if global.verbose {
        eprintln!("Cache directory: {}", store.dir().display());
        eprintln!("Template: {:?}", prompt.shape);
        eprintln!("Namespace only: {}", prompt.namespace_only);
        eprintln!();
    }

    println!("--- system ---\n{}\n\n--- user ---\n{}", prompt.system, prompt.user);

    Ok(())
}
