use super::types::{CallerInfo, DottedName};

/// Decide whether a nested request looks like a namespace-only import.
///
/// True only when the name is nested, the caller source is available, every
/// caller line touching `<module>.` is an import statement, and at least one
/// line imports from the two-segment prefix. Without caller evidence the
/// answer is always `false`.
pub fn is_namespace_only(name: &DottedName, caller: Option<&CallerInfo>) -> bool {
    let Some(caller) = caller else {
        return false;
    };

    if !name.is_nested() || caller.code.is_empty() {
        return false;
    }

    let module_ref = format!("{}.", name.module_name());
    let direct_usage = caller
        .code
        .lines()
        .any(|line| line.contains(&module_ref) && !is_import_line(line));

    if direct_usage {
        return false;
    }

    let parent_import = format!("from {}.{}", name.root(), name.module_name());

    caller
        .code
        .lines()
        .any(|line| line.contains(&parent_import) && is_import_line(line))
}

fn is_import_line(line: &str) -> bool {
    line.contains("import")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(code: &str) -> CallerInfo {
        CallerInfo {
            filename: Some("main.py".to_string()),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_namespace_import_without_usage() {
        let name = DottedName::parse("lib.crypto.hash.md5").unwrap();
        let info = caller("from lib.crypto import hash\n\nprint('ready')");
        assert!(is_namespace_only(&name, Some(&info)));
    }

    #[test]
    fn test_direct_usage_is_not_namespace() {
        let name = DottedName::parse("lib.crypto.hash.md5").unwrap();
        let info = caller("from lib.crypto import hash\ndigest = crypto.hash.md5(x)");
        assert!(!is_namespace_only(&name, Some(&info)));
    }

    #[test]
    fn test_nested_from_import_counts_as_import() {
        let name = DottedName::parse("lib.crypto.hash").unwrap();
        let info = caller("from lib.crypto.hash import md5\nmd5(b'abc')");
        assert!(is_namespace_only(&name, Some(&info)));
    }

    #[test]
    fn test_absent_caller_is_false() {
        let name = DottedName::parse("lib.crypto.hash.md5").unwrap();
        assert!(!is_namespace_only(&name, None));
    }

    #[test]
    fn test_empty_caller_code_is_false() {
        let name = DottedName::parse("lib.crypto.hash.md5").unwrap();
        assert!(!is_namespace_only(&name, Some(&caller(""))));
    }

    #[test]
    fn test_two_segments_is_false() {
        let name = DottedName::parse("lib.crypto").unwrap();
        let info = caller("from lib.crypto import hash");
        assert!(!is_namespace_only(&name, Some(&info)));
    }

    #[test]
    fn test_no_parent_import_is_false() {
        let name = DottedName::parse("lib.crypto.hash").unwrap();
        let info = caller("import lib\nprint(1)");
        assert!(!is_namespace_only(&name, Some(&info)));
    }
}
