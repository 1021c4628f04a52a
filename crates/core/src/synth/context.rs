use std::collections::BTreeMap;

use super::types::{CachedModule, CallerInfo, DottedName};

const CODEBASE_HEADER: &str = "Here is the existing codebase for reference:";

const USAGE_HINT: &str = "Pay special attention to parameter types, return values, and expected behavior.";

/// Render every previously generated module as a fenced block.
///
/// Returns an empty string when there is nothing to show, so prompts never
/// claim an existing codebase that does not exist. Modules without code are
/// skipped.
pub fn codebase_context(modules: &BTreeMap<String, CachedModule>) -> String {
    let blocks: Vec<String> = modules
        .iter()
        .filter(|(_, module)| !module.code.is_empty())
        .map(|(name, module)| format!("# Module: {}\n```python\n{}\n```", name, module.code))
        .collect();

    if blocks.is_empty() {
        return String::new();
    }

    format!("{}\n\n{}", CODEBASE_HEADER, blocks.join("\n\n"))
}

/// Lines of the caller source that look related to `name`.
///
/// First the lines importing from the two-segment prefix, then the lines
/// mentioning the symbol name that are not import statements. Plain substring
/// matching: it can miss or over-include lines.
pub fn relevant_snippets(code: &str, name: &DottedName) -> Vec<String> {
    let import_prefix = format!("from {}.{}", name.root(), name.module_name());

    let mut lines: Vec<String> = code
        .lines()
        .filter(|line| line.contains(&import_prefix))
        .map(str::to_string)
        .collect();

    if let Some(symbol) = name.symbol_name() {
        let usages: Vec<String> = code
            .lines()
            .filter(|line| line.contains(symbol))
            .filter(|line| !line.starts_with("import ") && !line.starts_with("from "))
            .filter(|line| !line.contains(&import_prefix))
            .map(str::to_string)
            .collect();
        lines.extend(usages);
    }

    lines
}

/// Build the caller-context block of the prompt.
///
/// Falls back to the full caller source when no relevant line is found.
pub fn caller_context(caller: &CallerInfo, name: &DottedName) -> String {
    if caller.code.is_empty() {
        return String::new();
    }

    let filename = caller.filename_or_unknown();
    let snippets = relevant_snippets(&caller.code, name);

    if snippets.is_empty() {
        return format!(
            "Here is the code that is importing this module/function:\n\
             ```python\n# File: {}\n{}\n```\n\n\
             Analyze how the requested functionality will be used in this code.\n{}",
            filename, caller.code, USAGE_HINT
        );
    }

    format!(
        "Here is the code that is importing and using this module/function:\n\
         ```python\n# File: {}\n# --- Relevant snippets ---\n{}\n```\n\n\
         And here is the full context:\n```python\n{}\n```\n\n\
         Analyze how the requested functionality will be used in the code snippets above.\n{}",
        filename,
        snippets.join("\n"),
        caller.code,
        USAGE_HINT
    )
}
