#![forbid(unsafe_code)]

use std::fmt;

/// Identifier of a term. Zero is never a valid id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u64);

impl TermId {
    pub fn new(value: u64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Taxonomy(String);

impl Taxonomy {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, TaxonomyError> {
        let value = value.into();
        validate_taxonomy(&value)?;
        Ok(Self(value))
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("taxonomy key must not be empty")]
    Empty,
    #[error("taxonomy key is too long")]
    TooLong,
    #[error("taxonomy key contains invalid character {ch:?} at {index}")]
    InvalidChar { ch: char, index: usize },
}

const MAX_TAXONOMY_LEN: usize = 32;

fn validate_taxonomy(value: &str) -> Result<(), TaxonomyError> {
    if value.is_empty() {
        return Err(TaxonomyError::Empty);
    }
    if value.len() > MAX_TAXONOMY_LEN {
        return Err(TaxonomyError::TooLong);
    }
    for (index, ch) in value.chars().enumerate() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-') {
            continue;
        }
        return Err(TaxonomyError::InvalidChar { ch, index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_id_rejects_zero() {
        assert!(TermId::new(0).is_none());
        assert_eq!(TermId::new(7).map(TermId::get), Some(7));
    }

    #[test]
    fn taxonomy_validation() {
        assert_eq!(Taxonomy::try_new("").unwrap_err(), TaxonomyError::Empty);
        assert_eq!(
            Taxonomy::try_new("x".repeat(33)).unwrap_err(),
            TaxonomyError::TooLong
        );
        assert_eq!(
            Taxonomy::try_new("Category").unwrap_err(),
            TaxonomyError::InvalidChar { ch: 'C', index: 0 }
        );
        assert_eq!(
            Taxonomy::try_new("post tag").unwrap_err(),
            TaxonomyError::InvalidChar { ch: ' ', index: 4 }
        );
        assert!(Taxonomy::try_new("post_tag").is_ok());
        assert!(Taxonomy::try_new("product-cat2").is_ok());
    }
}
