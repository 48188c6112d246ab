//! Relation references with strict identifier validation.
//!
//! Every table and column name that ends up inside a SQL statement passes
//! through [`validate_identifier`] first, so statements can be assembled from
//! configuration values without opening an injection path.

use serde::{Deserialize, Serialize};

/// Maximum identifier length in bytes (common SQL engine limit).
const MAX_IDENTIFIER_LEN: usize = 63;

/// Rejection reasons for table/column identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,

    #[error("identifier '{0}' exceeds maximum length of {MAX_IDENTIFIER_LEN} bytes (got {1})")]
    TooLong(String, usize),

    #[error("identifier '{0}' must start with a letter or underscore")]
    BadLeadingChar(String),

    #[error("identifier '{0}' contains invalid character '{1}'")]
    BadChar(String, char),

    #[error("relation name '{0}' must be qualified as schema.table")]
    NotQualified(String),
}

/// Validate a single table or column identifier against the allow-list:
/// ASCII letters, digits and underscores, leading letter or underscore,
/// at most 63 bytes.
///
/// # Errors
///
/// Returns an [`IdentifierError`] describing the first violation found.
pub fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    if name.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong(name.to_string(), name.len()));
    }

    let mut chars = name.chars();
    let first = chars.next().expect("non-empty identifier");
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(IdentifierError::BadLeadingChar(name.to_string()));
    }
    for ch in chars {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(IdentifierError::BadChar(name.to_string(), ch));
        }
    }
    Ok(())
}

/// A fully-qualified `schema.table` reference into the external store.
///
/// Construction validates both parts, so a `RelationRef` is safe to splice
/// into SQL text. The underlying data belongs entirely to the store; the
/// engine passes relations around by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationRef {
    schema: String,
    table: String,
}

impl RelationRef {
    /// Parse and validate a `schema.table` name.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] if the name is not exactly two
    /// dot-separated parts or either part fails validation.
    pub fn parse(qualified: &str) -> Result<Self, IdentifierError> {
        let mut parts = qualified.split('.');
        let (Some(schema), Some(table), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(IdentifierError::NotQualified(qualified.to_string()));
        };
        validate_identifier(schema)?;
        validate_identifier(table)?;
        Ok(Self {
            schema: schema.to_string(),
            table: table.to_string(),
        })
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The `schema.table` form.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

impl std::fmt::Display for RelationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

impl TryFrom<String> for RelationRef {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RelationRef> for String {
    fn from(value: RelationRef) -> Self {
        value.qualified()
    }
}
