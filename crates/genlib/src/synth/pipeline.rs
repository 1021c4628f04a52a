use super::client::CompletionService;
use crate::error::GenerationError;
use crate::store::ModuleStore;
use genlib_core::synth::{
    build_prompt, caller_context, codebase_context, is_namespace_only, is_valid_python,
    prompt_shape, strip_fences, DottedName, GenerationRequest, NamingRule, PromptInputs,
    PromptShape, SYSTEM_PROMPT,
};
use log::{debug, error, warn};
use std::collections::BTreeMap;

/// The messages that would be sent for a request.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub name: DottedName,
    pub shape: PromptShape,
    pub namespace_only: bool,
    pub system: &'static str,
    pub user: String,
}

/// Assemble context and build the prompt for `request`.
///
/// Store read failures are logged and treated as an empty store.
pub fn prepare_prompt<S: ModuleStore>(
    store: &S,
    request: &GenerationRequest,
    naming_rule: NamingRule,
) -> Result<PreparedPrompt, GenerationError> {
    let name = DottedName::parse(&request.dotted_name)?;

    let namespace_only = is_namespace_only(&name, request.caller.as_ref());
    if namespace_only {
        debug!("{} looks like a namespace-only import", name);
    }

    let cached_description = store.cached_prompt(&name.module_path()).unwrap_or_else(|e| {
        warn!("Could not read cached prompt for {}: {}", name.module_path(), e);
        None
    });

    let modules = store.all_modules().unwrap_or_else(|e| {
        warn!("Could not read cached modules: {}", e);
        BTreeMap::new()
    });
    let codebase = codebase_context(&modules);

    let caller = match &request.caller {
        Some(caller) => {
            debug!("Including caller context from {}", caller.filename_or_unknown());
            caller_context(caller, &name)
        }
        None => String::new(),
    };

    let inputs = PromptInputs {
        name: &name,
        description: &request.description,
        cached_description: cached_description.as_deref(),
        existing_code: request.existing_code.as_deref(),
        codebase_context: &codebase,
        caller_context: &caller,
        namespace_only,
        naming_rule,
    };

    let shape = prompt_shape(&inputs);
    let user = build_prompt(&inputs);

    Ok(PreparedPrompt {
        name,
        shape,
        namespace_only,
        system: SYSTEM_PROMPT,
        user,
    })
}

/// Run the whole pipeline and return validated source or the reason it failed.
pub async fn try_generate<S: ModuleStore, C: CompletionService>(
    store: &S,
    service: &C,
    request: &GenerationRequest,
    naming_rule: NamingRule,
) -> Result<String, GenerationError> {
    DottedName::parse(&request.dotted_name)?;
    service.ensure_configured()?;

    let prompt = prepare_prompt(store, request, naming_rule)?;
    debug!(
        "Generating {} as {:?} ({} prompt chars)",
        prompt.name,
        prompt.shape,
        prompt.user.len()
    );

    let raw = service.complete(prompt.system, &prompt.user).await?;
    let code = strip_fences(&raw);

    if !is_valid_python(&code) {
        return Err(GenerationError::Validation);
    }

    Ok(code)
}

/// Generate source for `request`, or `None` when anything fails.
///
/// Failures are logged, never raised. Nothing is written to the store.
pub async fn generate<S: ModuleStore, C: CompletionService>(
    store: &S,
    service: &C,
    request: &GenerationRequest,
    naming_rule: NamingRule,
) -> Option<String> {
    match try_generate(store, service, request, naming_rule).await {
        Ok(code) => Some(code),
        Err(e) => {
            error!("{}: {}", request.dotted_name, e);
            None
        }
    }
}
