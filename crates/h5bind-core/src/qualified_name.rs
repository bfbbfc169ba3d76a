//! Parser for `::`-separated C++ qualified type names
//!
//! Splitting only happens at template depth zero, so
//! `geo::Grid<std::array<int, 3>>` splits into the namespace `geo` and the
//! type name `Grid<std::array<int, 3>>`.
//!
//! ## Usage
//!
//! ```
//! use h5bind_core::qualified_name::QualifiedName;
//!
//! let name = QualifiedName::parse("A::B::C").unwrap();
//! assert_eq!(name.namespaces(), ["A", "B"]);
//! assert_eq!(name.type_name(), "C");
//! assert_eq!(name.sanitized(), "A_B_C");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

const SEPARATOR: &str = "::";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    original: String,
    /// Enclosing scopes, outermost first
    namespaces: Vec<String>,
    type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualifiedNameError {
    #[error("Empty qualified name")]
    Empty,

    #[error("Missing type name in qualified name: {0}")]
    MissingTypeName(String),
}

impl QualifiedName {
    pub fn parse(name: &str) -> Result<Self, QualifiedNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(QualifiedNameError::Empty);
        }

        let mut components: Vec<String> = split_top_level(trimmed)
            .into_iter()
            .map(|part| part.trim().to_string())
            .collect();

        // A leading `::` (global scope) produces an empty first component
        if components.first().is_some_and(|first| first.is_empty()) {
            components.remove(0);
        }

        let type_name = match components.pop() {
            Some(last) if !last.is_empty() => last,
            _ => return Err(QualifiedNameError::MissingTypeName(name.to_string())),
        };

        Ok(Self {
            original: trimmed.to_string(),
            namespaces: components,
            type_name,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Number of enclosing scopes; equals the number of blocks to close
    pub fn depth(&self) -> usize {
        self.namespaces.len()
    }

    /// Identifier-safe form of the full name: `A::B::C` becomes `A_B_C`
    pub fn sanitized(&self) -> String {
        sanitize_identifier(&self.original.replace(SEPARATOR, "_"))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Last `::` component of a qualified name, ignoring separators nested in
/// template arguments
pub fn short_name(name: &str) -> &str {
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    &name[start..]
}

/// Replace every character that cannot appear in a C++ identifier with `_`
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

fn split_top_level(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&name[start..i]);
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&name[start..]);
    parts
}
