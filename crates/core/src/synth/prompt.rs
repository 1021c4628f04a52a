use super::types::{DottedName, NamingRule};

/// System instructions sent with every generation request.
pub const SYSTEM_PROMPT: &str = "\
You are an expert Python code generator that creates modules on demand.
You analyze the surrounding context and produce Python code that fits the existing codebase.

1. CONTEXT ANALYSIS:
- Study the caller code to learn the exact data structures, types and usage patterns.
- Look at how the imported function or class is used: parameter types and return values.
- Follow the naming conventions, coding style and error handling of the existing code.
- Decide whether the import is only structural (a nested module) that needs no real code.

2. CODE GENERATION:
- Follow PEP 8 with consistent formatting.
- Use only the Python standard library, no third-party packages.
- Only import modules that are already defined within this library.
- Handle edge cases.

3. EMPTY MODULES:
- When the import is nested/structural and the caller never uses the intermediate module,
  return an empty module with explanatory comments only.
- For example, `from lib.crypto.hash import md5` without any use of `lib.crypto` suggests
  that `crypto` is only organizational.

RESPONSE FORMAT:
Respond with ONLY valid Python code. No explanations, no markdown, no surrounding text.
The code must be ready to execute.";

const RESPONSE_RULE: &str =
    "Your response must be ONLY valid Python code without any explanations or markdown.";

const MINIMAL_RULE: &str = "If analysis suggests this is purely for structural imports with no actual functionality needed,\n   provide minimal implementation with appropriate comments";

/// Everything the prompt depends on. Identical inputs give identical prompts.
#[derive(Debug, Clone)]
pub struct PromptInputs<'a> {
    pub name: &'a DottedName,
    /// Description supplied with this request.
    pub description: &'a str,
    /// Description stored for the two-segment module, if it was generated before.
    pub cached_description: Option<&'a str>,
    pub existing_code: Option<&'a str>,
    pub codebase_context: &'a str,
    pub caller_context: &'a str,
    pub namespace_only: bool,
    pub naming_rule: NamingRule,
}

impl PromptInputs<'_> {
    /// The library purpose: the cached description wins over the request's.
    pub fn purpose(&self) -> &str {
        self.cached_description.unwrap_or(self.description)
    }
}

/// Which template [`build_prompt`] picks for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptShape {
    ExtendModule,
    NewModule,
    NewPackage,
}

pub fn prompt_shape(inputs: &PromptInputs) -> PromptShape {
    match (inputs.name.symbol_name(), inputs.existing_code) {
        (Some(_), Some(_)) => PromptShape::ExtendModule,
        (Some(_), None) => PromptShape::NewModule,
        (None, _) => PromptShape::NewPackage,
    }
}

/// Build the user prompt for a generation request.
pub fn build_prompt(inputs: &PromptInputs) -> String {
    let module_name = inputs.name.module_name();

    let mut parts = match (prompt_shape(inputs), inputs.name.symbol_name()) {
        (PromptShape::ExtendModule, Some(symbol)) => {
            let kind = (inputs.naming_rule)(symbol);
            vec![
                format!("You are extending an existing Python module named '{module_name}'."),
                purpose_block(inputs.purpose()),
                format!(
                    "Here is the existing code for this module:\n```python\n{}\n```",
                    inputs.existing_code.unwrap_or_default()
                ),
                inputs.codebase_context.to_string(),
                inputs.caller_context.to_string(),
                namespace_block(inputs),
                format!(
                    "I need you to add a new {} named '{}' that implements the following functionality:\n{}",
                    kind.as_str(),
                    symbol,
                    inputs.description
                ),
                requirements(&[
                    "Maintain consistency with the existing code style, naming patterns, and error handling",
                    "Keep all existing functions and classes intact",
                    "Add comprehensive docstrings with parameters, returns, and exceptions",
                    "Use type hints for better code clarity when appropriate",
                    "Analyze the caller code carefully to ensure the new code works with existing data structures",
                    MINIMAL_RULE,
                ]),
                format!(
                    "Return the COMPLETE module code including both existing functionality and the new {}.\n{}",
                    kind.as_str(),
                    RESPONSE_RULE
                ),
            ]
        }
        (PromptShape::NewModule, Some(symbol)) => {
            let kind = (inputs.naming_rule)(symbol);
            vec![
                format!(
                    "Create a Python module named '{}' with a {} named '{}' that implements the following functionality:\n{}",
                    module_name,
                    kind.as_str(),
                    symbol,
                    inputs.description
                ),
                cached_purpose_block(inputs),
                inputs.codebase_context.to_string(),
                inputs.caller_context.to_string(),
                namespace_block(inputs),
                requirements(&[
                    "Start with a clear module docstring explaining the purpose",
                    "Include detailed docstrings with parameters, returns, and exceptions",
                    "Use type hints when appropriate for clarity",
                    "Implement robust error handling with specific exception types",
                    "Follow strict PEP 8 style guidelines",
                    "Analyze the caller context carefully to match the expected usage pattern",
                    MINIMAL_RULE,
                ]),
                RESPONSE_RULE.to_string(),
            ]
        }
        _ => vec![
            format!(
                "Create a Python package named '{}' that implements the following functionality:\n{}",
                module_name, inputs.description
            ),
            cached_purpose_block(inputs),
            inputs.codebase_context.to_string(),
            inputs.caller_context.to_string(),
            namespace_block(inputs),
            requirements(&[
                "Start with a clear module docstring explaining the purpose",
                "Implement functions/classes that fulfill the described purpose",
                "Include detailed docstrings with parameters, returns, and exceptions",
                "Use type hints when appropriate for clarity",
                "Follow strict PEP 8 style guidelines",
                "Analyze the caller context to structure the package in a way that matches expected usage",
                MINIMAL_RULE,
            ]),
            "Do not generate any additional Python files. Provide only the Python code without explanations."
                .to_string(),
        ],
    };

    parts.retain(|part| !part.is_empty());
    parts.join("\n\n")
}

fn purpose_block(purpose: &str) -> String {
    format!("The overall purpose of this library is:\n{purpose}")
}

// The new-module and package templates already state the request's
// description, so the purpose only needs repeating when it differs.
fn cached_purpose_block(inputs: &PromptInputs) -> String {
    match inputs.cached_description {
        Some(cached) if cached != inputs.description => purpose_block(cached),
        _ => String::new(),
    }
}

fn namespace_block(inputs: &PromptInputs) -> String {
    if !inputs.namespace_only {
        return String::new();
    }

    format!(
        "IMPORTANT: Based on the calling code analysis, this module '{}' appears to be\n\
         primarily used for namespacing/structural purposes rather than for its own functionality.\n\n\
         If appropriate, you may generate a minimal module with just necessary imports and docstrings,\n\
         but without substantial implementation if the code doesn't show direct usage of this module.",
        inputs.name
    )
}

fn requirements(items: &[&str]) -> String {
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect();

    format!("IMPORTANT REQUIREMENTS:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::types::{capitalized_is_class, SymbolKind};

    fn inputs<'a>(name: &'a DottedName, existing_code: Option<&'a str>) -> PromptInputs<'a> {
        PromptInputs {
            name,
            description: "Time-based one-time passwords",
            cached_description: None,
            existing_code,
            codebase_context: "",
            caller_context: "",
            namespace_only: false,
            naming_rule: capitalized_is_class,
        }
    }

    #[test]
    fn test_extend_existing_module() {
        let name = DottedName::parse("lib.totp.verify").unwrap();
        let existing = "def generate(secret):\n    return 42";
        let prompt = build_prompt(&inputs(&name, Some(existing)));

        assert!(prompt.starts_with("You are extending an existing Python module named 'totp'."));
        assert!(prompt.contains("```python\ndef generate(secret):\n    return 42\n```"));
        assert!(prompt.contains("Keep all existing functions and classes intact"));
        assert!(prompt.contains("add a new function named 'verify'"));
        assert!(prompt.contains("Return the COMPLETE module code"));
    }

    #[test]
    fn test_new_module_with_class() {
        let name = DottedName::parse("lib.totp.Generator").unwrap();
        let prompt = build_prompt(&inputs(&name, None));

        assert_eq!(prompt_shape(&inputs(&name, None)), PromptShape::NewModule);
        assert!(prompt.starts_with(
            "Create a Python module named 'totp' with a class named 'Generator'"
        ));
        assert!(prompt.contains("Time-based one-time passwords"));
        assert!(prompt.ends_with(RESPONSE_RULE));
    }

    #[test]
    fn test_new_package_forbids_extra_files() {
        let name = DottedName::parse("lib.totp").unwrap();
        // Existing code alone does not select the extend template.
        let prompt = build_prompt(&inputs(&name, Some("x = 1")));

        assert!(prompt.starts_with("Create a Python package named 'totp'"));
        assert!(prompt.contains("Do not generate any additional Python files."));
        assert!(!prompt.contains("x = 1"));
    }

    #[test]
    fn test_cached_description_takes_precedence() {
        let name = DottedName::parse("lib.totp.verify").unwrap();
        let mut request = inputs(&name, Some("def generate(): pass"));
        request.cached_description = Some("RFC 6238 helpers");

        let prompt = build_prompt(&request);

        assert!(prompt.contains("The overall purpose of this library is:\nRFC 6238 helpers"));
        assert!(prompt.contains("functionality:\nTime-based one-time passwords"));
    }

    #[test]
    fn test_cached_description_in_new_module() {
        let name = DottedName::parse("lib.totp.verify").unwrap();
        let mut request = inputs(&name, None);
        request.cached_description = Some("RFC 6238 helpers");

        let prompt = build_prompt(&request);
        assert!(prompt.contains("The overall purpose of this library is:\nRFC 6238 helpers"));
    }

    #[test]
    fn test_embeds_context_blocks() {
        let name = DottedName::parse("lib.totp.verify").unwrap();
        let mut request = inputs(&name, None);
        request.codebase_context = "Here is the existing codebase for reference:\n\n# Module: lib.a";
        request.caller_context = "Here is the code that is importing this module/function:";

        let prompt = build_prompt(&request);

        assert!(prompt.contains("# Module: lib.a"));
        assert!(prompt.contains("Here is the code that is importing this module/function:"));
        assert!(!prompt.contains("\n\n\n"));
    }

    #[test]
    fn test_namespace_instruction_only_when_detected() {
        let name = DottedName::parse("lib.crypto.hash.md5").unwrap();
        let mut request = inputs(&name, None);

        assert!(!build_prompt(&request).contains("namespacing/structural"));

        request.namespace_only = true;
        let prompt = build_prompt(&request);
        assert!(prompt.contains("this module 'lib.crypto.hash.md5' appears to be"));
        assert!(prompt.contains("minimal module"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let name = DottedName::parse("lib.crypto.hash").unwrap();
        let mut request = inputs(&name, Some("import hashlib"));
        request.caller_context = "from lib.crypto import hash";
        request.namespace_only = true;

        assert_eq!(build_prompt(&request), build_prompt(&request.clone()));
    }

    #[test]
    fn test_custom_naming_rule() {
        fn always_class(_: &str) -> SymbolKind {
            SymbolKind::Class
        }

        let name = DottedName::parse("lib.shapes.circle").unwrap();
        let mut request = inputs(&name, None);
        request.naming_rule = always_class;

        assert!(build_prompt(&request).contains("with a class named 'circle'"));
    }
}
