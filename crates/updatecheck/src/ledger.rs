use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use updatecheck_platform::{ConfigPaths, PathsError};

use crate::application::Application;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    ConfigDir(#[from] PathsError),
    #[error("failed to create ledger directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read ledger {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse ledger {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode ledger record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write ledger {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the ledger remembers about an application's last update check.
///
/// Only the weekday is kept, so the gate re-arms on any other day of the
/// week. `None` means the application has never been checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    #[serde(
        rename = "lastCheckForUpdates",
        default,
        with = "weekday_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_check: Option<Weekday>,
}

impl LedgerRecord {
    #[must_use]
    pub fn checked_on(day: Weekday) -> Self {
        Self {
            last_check: Some(day),
        }
    }

    #[must_use]
    pub fn was_checked_on(&self, day: Weekday) -> bool {
        self.last_check == Some(day)
    }
}

/// Weekdays are stored as 0-6 with Sunday as 0.
mod weekday_number {
    use chrono::Weekday;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const WEEKDAYS: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(day: &Option<Weekday>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        day.map(|day| day.num_days_from_sunday()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Weekday>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(number) = Option::<u64>::deserialize(deserializer)? else {
            return Ok(None);
        };
        usize::try_from(number)
            .ok()
            .and_then(|index| WEEKDAYS.get(index).copied())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("weekday out of range: {number}")))
    }
}

/// Per-application record files under the shared update-check directory.
#[derive(Debug, Clone)]
pub struct Ledger {
    paths: Option<ConfigPaths>,
}

impl Ledger {
    /// Ledger in the current user's config directory. When that directory
    /// cannot be determined every load reports "never checked" and every
    /// save fails.
    #[must_use]
    pub fn user() -> Self {
        match ConfigPaths::new() {
            Ok(paths) => Self { paths: Some(paths) },
            Err(error) => {
                debug!("error loading user config dir: {error}");
                Self { paths: None }
            }
        }
    }

    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            paths: Some(ConfigPaths::at(dir)),
        }
    }

    #[must_use]
    pub fn record_path(&self, app: &Application) -> Option<PathBuf> {
        self.paths
            .as_ref()
            .map(|paths| paths.ledger_file(&app.file_stem()))
    }

    /// Best-effort read of the record for `app`. Any failure is logged and
    /// treated as "never checked".
    #[must_use]
    pub fn load(&self, app: &Application) -> LedgerRecord {
        match self.try_load(app) {
            Ok(Some(record)) => record,
            Ok(None) => LedgerRecord::default(),
            Err(error) => {
                debug!("error loading update check ledger for {app}: {error}");
                LedgerRecord::default()
            }
        }
    }

    /// Read the record for `app`, returning `None` when no file exists yet.
    ///
    /// # Errors
    /// Returns an error when the config directory is unavailable or cannot be
    /// created, or when the record file cannot be read or parsed.
    pub fn try_load(&self, app: &Application) -> Result<Option<LedgerRecord>, LedgerError> {
        let paths = self.ensured_paths()?;
        let path = paths.ledger_file(&app.file_stem());

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!("update check ledger does not exist: {}", path.display());
                return Ok(None);
            }
            Err(source) => return Err(LedgerError::Read { path, source }),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| LedgerError::Decode { path, source })
    }

    /// Persist `record` for `app`, replacing any previous record.
    ///
    /// # Errors
    /// Returns an error when the config directory is unavailable or the file
    /// cannot be written.
    pub fn save(&self, app: &Application, record: &LedgerRecord) -> Result<(), LedgerError> {
        let paths = self.ensured_paths()?;
        let path = paths.ledger_file(&app.file_stem());
        let data = serde_json::to_vec(record).map_err(LedgerError::Encode)?;

        write_atomic(&path, &data).map_err(|source| LedgerError::Write { path, source })
    }

    fn ensured_paths(&self) -> Result<&ConfigPaths, LedgerError> {
        let paths = self
            .paths
            .as_ref()
            .ok_or(PathsError::ConfigDirUnavailable)?;
        paths.ensure_dir().map_err(|source| LedgerError::CreateDir {
            path: paths.config_dir.clone(),
            source,
        })?;
        Ok(paths)
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "ledger path has no parent")
    })?;

    // Removed on drop unless persisted.
    let mut file = tempfile::Builder::new()
        .prefix(".ledger-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    file.write_all(data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| error.error)?;
    Ok(())
}
