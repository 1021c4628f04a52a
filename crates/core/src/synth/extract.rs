const FENCE: &str = "```";

/// Strip one pair of markdown code fences from a model response.
///
/// Removes the opening fence (with or without a language tag such as
/// `python`) and the first fence after it, then trims surrounding whitespace.
/// Text that does not start with a fence is only trimmed.
pub fn strip_fences(response: &str) -> String {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed.to_string();
    };

    let body = match rest.split_once('\n') {
        Some((tag, body)) if is_language_tag(tag) => body,
        _ => rest,
    };

    // The first fence after the opening one closes the block.
    body.replacen(FENCE, "", 1).trim().to_string()
}

fn is_language_tag(tag: &str) -> bool {
    tag.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}
