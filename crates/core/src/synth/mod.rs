pub mod context;
pub mod extract;
pub mod namespace;
pub mod prompt;
pub mod types;
pub mod validate;

pub use context::{caller_context, codebase_context, relevant_snippets};
pub use extract::strip_fences;
pub use namespace::is_namespace_only;
pub use prompt::{build_prompt, prompt_shape, PromptInputs, PromptShape, SYSTEM_PROMPT};
pub use types::{
    capitalized_is_class, CachedModule, CallerInfo, DottedName, GenerationRequest, NameError,
    NamingRule, SymbolKind,
};
pub use validate::is_valid_python;
