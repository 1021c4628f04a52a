use serde::{Deserialize, Serialize};

/// Errors produced while parsing a dotted name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("dotted name '{0}' needs at least two segments")]
    TooShort(String),

    #[error("dotted name '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// A validated, dot-separated path such as `lib.crypto.hash.md5`.
///
/// Segment 0 is the library root, segment 1 the module name and segment 2
/// (when present) the symbol requested from that module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedName {
    raw: String,
    segments: Vec<String>,
}

impl DottedName {
    /// Parse a dotted name, requiring at least two non-empty segments.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let segments: Vec<String> = name.split('.').map(str::to_string).collect();

        if segments.len() < 2 {
            return Err(NameError::TooShort(name.to_string()));
        }

        if segments.iter().any(|s| s.is_empty()) {
            return Err(NameError::EmptySegment(name.to_string()));
        }

        Ok(Self {
            raw: name.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    pub fn module_name(&self) -> &str {
        &self.segments[1]
    }

    pub fn symbol_name(&self) -> Option<&str> {
        self.segments.get(2).map(String::as_str)
    }

    /// The two-segment prefix, e.g. `lib.crypto` for `lib.crypto.hash.md5`.
    pub fn module_path(&self) -> String {
        format!("{}.{}", self.segments[0], self.segments[1])
    }

    /// True when the name points below the module, not at the module itself.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 2
    }
}

impl std::fmt::Display for DottedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// What kind of symbol the model is asked to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
    Class,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
        }
    }
}

/// Naming-convention predicate that maps an identifier to its symbol kind.
pub type NamingRule = fn(&str) -> SymbolKind;

/// Default convention: identifiers starting with an uppercase letter are classes.
pub fn capitalized_is_class(identifier: &str) -> SymbolKind {
    match identifier.chars().next() {
        Some(c) if c.is_uppercase() => SymbolKind::Class,
        _ => SymbolKind::Function,
    }
}

/// Source of the code that triggered a generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    #[serde(default)]
    pub filename: Option<String>,
    pub code: String,
}

impl CallerInfo {
    pub fn filename_or_unknown(&self) -> &str {
        self.filename.as_deref().unwrap_or("unknown")
    }
}

/// A previously generated module as persisted by the module store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedModule {
    pub module_name: String,
    #[serde(default)]
    pub code: String,
    /// Description the module was first generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A request to synthesize a module or a symbol inside one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub dotted_name: String,
    pub description: String,
    pub existing_code: Option<String>,
    pub caller: Option<CallerInfo>,
}
