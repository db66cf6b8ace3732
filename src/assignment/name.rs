//! Syntax check for parameter names.

use thiserror::Error;

/// Characters that may not appear anywhere in a name.
const FORBIDDEN: &[char] = &['\t', '\n', '\r', ' '];

/// Namespace separator every name must contain.
const NAMESPACE_SEPARATOR: char = '.';

/// Why a name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("name contains whitespace {0:?}")]
    Whitespace(char),

    #[error("name has no '.' separator")]
    NoDot,
}

/// Check that `name` is a syntactically well-formed parameter name.
///
/// Whether the name actually exists is a separate, advisory question; see
/// [`super::NamespaceProbe`].
pub fn validate(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(NameError::Whitespace(c));
    }
    if !name.contains(NAMESPACE_SEPARATOR) {
        return Err(NameError::NoDot);
    }
    Ok(())
}
