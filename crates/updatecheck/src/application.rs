use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the host program being checked, e.g. `granted`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Application(String);

impl Application {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier reduced to characters that are safe in a file name.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .0
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                    ch
                } else {
                    '_'
                }
            })
            .collect();

        match stem.as_str() {
            "" | "." | ".." => format!("_{stem}"),
            _ => stem,
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Application {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Application {
    fn from(value: String) -> Self {
        Self(value)
    }
}
