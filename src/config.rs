//! Runtime configuration.
//!
//! Read from an optional JSON file; every field has a default, so `{}` and
//! a missing file both give the stock setup:
//!
//! ```json
//! {
//!   "recommendation_limit": 3,
//!   "seed": 42,
//!   "field_delimiter": ",",
//!   "genre_delimiter": "/",
//!   "author_affinity": 1,
//!   "co_borrow_affinity": 2,
//!   "page_size": 10
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    affinity::{AUTHOR_AFFINITY, CO_BORROW_AFFINITY},
    error::{LibraryError, Result},
};

/// Number of recommendations produced when no limit is given
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

/// Library settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// How many books `recommend` returns by default
    pub recommendation_limit: usize,
    /// Seed for the random fallback; OS entropy when absent
    pub seed: Option<u64>,
    /// Separator between the fields of a catalog record
    pub field_delimiter: char,
    /// Separator between the segments of a genre path
    pub genre_delimiter: char,
    /// Edge weight per pair of books sharing an author
    pub author_affinity: u32,
    /// Edge weight per pair of books held at the same time
    pub co_borrow_affinity: u32,
    /// Lines per page in console listings
    pub page_size: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            seed: None,
            field_delimiter: ',',
            genre_delimiter: '/',
            author_affinity: AUTHOR_AFFINITY,
            co_borrow_affinity: CO_BORROW_AFFINITY,
            page_size: 10,
        }
    }
}

impl LibraryConfig {
    /// Parse and validate a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Config` if the JSON is invalid or the
    /// settings are inconsistent.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| LibraryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or defaults when no path is given
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Io` if the file cannot be read and
    /// `LibraryError::Config` if its contents are rejected.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::from_json(&fs::read_to_string(path)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check settings that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Config` when the delimiters coincide, an
    /// affinity weight is zero or the page size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.field_delimiter == self.genre_delimiter {
            return Err(LibraryError::Config(format!(
                "field and genre delimiters must differ, both are {:?}",
                self.field_delimiter
            )));
        }
        if self.author_affinity == 0 || self.co_borrow_affinity == 0 {
            return Err(LibraryError::Config("affinity weights must be at least 1".to_string()));
        }
        if self.page_size == 0 {
            return Err(LibraryError::Config("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
