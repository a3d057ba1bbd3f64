//! Domain types shared by the scanner, renderer, and publisher.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};

use crate::error::BranchNameError;

// ---------------------------------------------------------------------------
// Repository record
// ---------------------------------------------------------------------------

/// One discovered target repository and the version reference found in its
/// build configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    /// Repository root on disk.
    pub path: PathBuf,
    /// Value of the version key; empty when the key is absent or blank.
    pub version_ref: String,
}

impl RepositoryRecord {
    pub fn new(path: impl Into<PathBuf>, version_ref: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version_ref: version_ref.into(),
        }
    }

    /// Directory name of the repository, used for display.
    pub fn name(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Branch descriptor
// ---------------------------------------------------------------------------

/// Name of the branch that carries one repository's pending change.
///
/// Derived from wall-clock time at second resolution; two publishes to the
/// same repository within one second produce the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(pub String);

impl BranchName {
    /// `<prefix><timestamp formatted with format>`.
    ///
    /// `format` is a chrono `strftime` pattern; an unknown specifier is an error.
    pub fn at<Tz>(
        prefix: &str,
        format: &str,
        when: &DateTime<Tz>,
    ) -> Result<Self, BranchNameError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        validate_timestamp_format(format)?;
        Ok(Self(format!("{prefix}{}", when.format(format))))
    }

    /// Branch name for the current local time.
    pub fn now(prefix: &str, format: &str) -> Result<Self, BranchNameError> {
        Self::at(prefix, format, &chrono::Local::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reject `strftime` patterns chrono cannot format.
pub fn validate_timestamp_format(format: &str) -> Result<(), BranchNameError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(BranchNameError::InvalidTimestampFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
