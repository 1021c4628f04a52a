use super::client::{CompletionService, OpenAiClient, ServiceConfig};
use super::pipeline::generate;
use super::{RequestArgs, ServiceArgs};
use crate::prelude::{eprintln, println, *};
use crate::store::{FileStore, ModuleStore};
use genlib_core::synth::{CachedModule, DottedName, GenerationRequest, NamingRule};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, clap::Parser)]
pub struct ResolveOptions {
    #[clap(flatten)]
    pub request: RequestArgs,

    #[clap(flatten)]
    pub service: ServiceArgs,

    /// Neither serve from nor write to the module cache
    #[clap(long)]
    pub no_cache: bool,

    /// Output as JSON
    #[clap(long)]
    pub json: bool,
}

/// A resolved dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub dotted_name: String,
    pub code: String,
    pub from_cache: bool,
}

pub async fn run(options: ResolveOptions, global: crate::Global) -> Result<()> {
    let store = FileStore::open(global.cache_dir.clone())?;
    let naming_rule = options.request.naming.rule();
    let request = options.request.into_request().await?;
    let config = ServiceConfig::from(options.service);

    if global.verbose {
        eprintln!("Cache directory: {}", store.dir().display());
        eprintln!("Model: {}", config.model);
    }

    let client = OpenAiClient::new(config);
    let resolved = resolve(&store, &client, request, naming_rule, !options.no_cache)
        .await?
        .ok_or_eyre("Code generation failed, see the log for details")?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        print!("{}", resolved.code);
    }

    Ok(())
}

/// Serve `request` from the store, or generate, validate and persist it.
///
/// Returns `Ok(None)` when generation produced nothing; store failures are
/// errors. Nothing is written unless the code passed validation.
pub async fn resolve<C: CompletionService>(
    store: &FileStore,
    service: &C,
    mut request: GenerationRequest,
    naming_rule: NamingRule,
    use_cache: bool,
) -> Result<Option<Resolved>> {
    if use_cache {
        if let Some(hit) = store.get(&request.dotted_name)? {
            info!("Serving {} from cache", request.dotted_name);
            return Ok(Some(Resolved {
                dotted_name: request.dotted_name,
                code: hit.code,
                from_cache: true,
            }));
        }
    }

    let name = match DottedName::parse(&request.dotted_name) {
        Ok(name) => name,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(None);
        }
    };

    if request.existing_code.is_none() && name.is_nested() {
        request.existing_code = store
            .get(&name.module_path())?
            .map(|module| module.code)
            .filter(|code| !code.is_empty());
    }

    let Some(code) = generate(store, service, &request, naming_rule).await else {
        return Ok(None);
    };

    if use_cache {
        persist(store, &name, &request.description, &code)?;
    }

    Ok(Some(Resolved {
        dotted_name: request.dotted_name,
        code,
        from_cache: false,
    }))
}

fn persist(store: &FileStore, name: &DottedName, description: &str, code: &str) -> Result<()> {
    let module_path = name.module_path();
    let created_at = Some(chrono::Utc::now().to_rfc3339());

    let prompt = store
        .cached_prompt(&module_path)?
        .unwrap_or_else(|| description.to_string());

    store.put(
        &module_path,
        &CachedModule {
            module_name: module_path.clone(),
            code: code.to_string(),
            prompt: Some(prompt),
            created_at: created_at.clone(),
        },
    )?;

    if name.is_nested() {
        store.put(
            name.as_str(),
            &CachedModule {
                module_name: name.to_string(),
                code: code.to_string(),
                prompt: Some(description.to_string()),
                created_at,
            },
        )?;
    }

    debug!("Persisted {}", name);

    Ok(())
}
