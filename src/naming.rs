//! File-name conventions used to derive table and schema names.
//!
//! Source files are expected to look like `Fecom Inc Customer Orders.csv`: a fixed-length
//! company prefix in front of the meaningful name. Table names drop the first
//! [`NamingConvention::table_prefix_len`] characters of the file stem and replace spaces with
//! underscores (`Customer_Orders`); schema names drop the literal
//! [`NamingConvention::schema_prefix`] (`Customer Orders`).
//!
//! What happens when a file does not follow the convention is controlled by [`PrefixPolicy`].

use std::path::Path;

use crate::error::{EdaError, EdaResult};

/// Default number of leading characters dropped from a file stem to form a table name.
pub const DEFAULT_TABLE_PREFIX_LEN: usize = 10;

/// Default literal prefix dropped from a file stem to form a schema name.
pub const DEFAULT_SCHEMA_PREFIX: &str = "Fecom Inc ";

/// Behavior when a file name does not carry the expected prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixPolicy {
    /// Drop the prefix length regardless of what the characters are.
    Strip,
    /// Keep the raw stem and flag the name as a fallback.
    #[default]
    Preserve,
    /// Fail with [`EdaError::NamingConvention`].
    Reject,
}

/// Naming rules shared by the bulk loader and the schema deriver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    /// Characters dropped from the start of a file stem for table names.
    pub table_prefix_len: usize,
    /// Literal dropped from the start of a file stem for schema names.
    pub schema_prefix: String,
    /// What to do when a name is too short or lacks the literal prefix.
    pub policy: PrefixPolicy,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            table_prefix_len: DEFAULT_TABLE_PREFIX_LEN,
            schema_prefix: DEFAULT_SCHEMA_PREFIX.to_string(),
            policy: PrefixPolicy::default(),
        }
    }
}

/// A name derived from a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    /// The derived name.
    pub name: String,
    /// The file stem the name was derived from.
    pub stem: String,
    /// False when the convention was violated and [`PrefixPolicy`] decided the outcome.
    pub follows_convention: bool,
}

/// File name without directory or extension.
pub fn file_stem(path: impl AsRef<Path>) -> EdaResult<String> {
    let path = path.as_ref();
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| EdaError::NoFileName(path.to_path_buf()))
}

impl NamingConvention {
    /// Derive a table name: drop the fixed-length prefix, then replace spaces with `_`.
    ///
    /// A stem no longer than the prefix violates the convention.
    pub fn table_name(&self, path: impl AsRef<Path>) -> EdaResult<DerivedName> {
        let stem = file_stem(path)?;
        let follows = stem.chars().count() > self.table_prefix_len;
        let stripped: String = stem.chars().skip(self.table_prefix_len).collect();

        let base = self.resolve(&stem, stripped, follows, || {
            format!(
                "expected more than {} characters before the table name",
                self.table_prefix_len
            )
        })?;

        Ok(DerivedName {
            name: base.replace(' ', "_"),
            stem,
            follows_convention: follows,
        })
    }

    /// Derive a schema name by dropping the literal prefix from the file stem.
    pub fn schema_name(&self, path: impl AsRef<Path>) -> EdaResult<DerivedName> {
        let stem = file_stem(path)?;
        let (follows, stripped) = match stem.strip_prefix(self.schema_prefix.as_str()) {
            Some(rest) => (!rest.is_empty(), rest.to_string()),
            // Same slice a length-based strip would take.
            None => (
                false,
                stem.chars().skip(self.schema_prefix.chars().count()).collect(),
            ),
        };

        let name = self.resolve(&stem, stripped, follows, || {
            format!("expected prefix '{}'", self.schema_prefix)
        })?;

        Ok(DerivedName {
            name,
            stem,
            follows_convention: follows,
        })
    }

    fn resolve(
        &self,
        stem: &str,
        stripped: String,
        follows: bool,
        message: impl FnOnce() -> String,
    ) -> EdaResult<String> {
        if follows {
            return Ok(stripped);
        }
        match self.policy {
            PrefixPolicy::Strip => Ok(stripped),
            PrefixPolicy::Preserve => Ok(stem.to_string()),
            PrefixPolicy::Reject => Err(EdaError::NamingConvention {
                name: stem.to_string(),
                message: message(),
            }),
        }
    }
}
