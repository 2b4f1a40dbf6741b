//! XML profile storage.
//!
//! Each profile lives in its own file:
//!
//! ```text
//! <data-dir>/<product>/UserProfiles/<name>.xml
//! ```
//!
//! ```xml
//! <UserProfile Name="Default" Version="1">
//!   <Stats Exp="1234" Level="7" Tokens="3"/>
//! </UserProfile>
//! ```
//!
//! A missing file is not an error: [`ProfileStore::load`] returns `Ok(None)`
//! so the caller can start a fresh profile. The `Version` attribute is written
//! on save and logged on load, but not checked against
//! [`PROFILE_FORMAT_VERSION`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PersistenceConfig;
use crate::error::{Result, TurntableError};
use crate::profile::Profile;

/// Format version written into every saved profile.
pub const PROFILE_FORMAT_VERSION: &str = "1";

/// Folder under the product directory that holds profile files.
pub const PROFILES_FOLDER: &str = "UserProfiles";

const PROFILE_EXTENSION: &str = "xml";

// ---------------------------------------------------------------------------
// On-disk document
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "UserProfile")]
struct ProfileDocument {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "@Version")]
    version: String,
    #[serde(rename = "Stats")]
    stats: StatsNode,
}

#[derive(Debug, Serialize, Deserialize)]
struct StatsNode {
    #[serde(rename = "@Exp")]
    experience: u64,
    #[serde(rename = "@Level")]
    level: u32,
    #[serde(rename = "@Tokens")]
    tokens: u32,
}

/// Encode `profile` as an XML document tagged with `name`.
///
/// # Errors
///
/// Returns [`TurntableError::Serialize`] if the encoder fails.
pub fn to_xml(name: &str, profile: &Profile) -> Result<String> {
    let document = ProfileDocument {
        name: name.to_string(),
        version: PROFILE_FORMAT_VERSION.to_string(),
        stats: StatsNode {
            experience: profile.experience,
            level: profile.level,
            tokens: profile.tokens,
        },
    };

    let mut xml = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| TurntableError::Serialize(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Decode a profile document.
///
/// `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`TurntableError::Parse`] on malformed XML, missing attributes,
/// non-integer stats, or a level below 1.
pub fn from_xml(xml: &str, origin: &str) -> Result<Profile> {
    let document: ProfileDocument =
        quick_xml::de::from_str(xml).map_err(|e| TurntableError::Parse {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;

    debug!(
        name = %document.name,
        version = %document.version,
        "Decoded profile document"
    );

    let stats = document.stats;
    if stats.level == 0 {
        return Err(TurntableError::Parse {
            path: origin.to_string(),
            reason: "Level must be at least 1".to_string(),
        });
    }
    Ok(Profile::from_parts(stats.experience, stats.level, stats.tokens))
}

// ---------------------------------------------------------------------------
// ProfileStore
// ---------------------------------------------------------------------------

/// A directory of profile files.
///
/// # Usage
///
/// ```no_run
/// # use turntable_core::persistence::ProfileStore;
/// # use turntable_core::config::PersistenceConfig;
/// # use turntable_core::profile::Profile;
/// let store = ProfileStore::from_config(&PersistenceConfig::default())?;
/// store.save("Default", &Profile::new())?;
/// let loaded = store.load("Default")?;
/// # Ok::<(), turntable_core::error::TurntableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// Use `root` directly as the folder holding `<name>.xml` files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `<data-dir>/<product>/UserProfiles` from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::NoDataDirectory`] if no override is set and
    /// the platform has no data directory.
    pub fn from_config(config: &PersistenceConfig) -> Result<Self> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir().ok_or(TurntableError::NoDataDirectory)?,
        };
        Ok(Self::new(data_dir.join(&config.product).join(PROFILES_FOLDER)))
    }

    /// The folder holding profile files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the file for profile `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::InvalidProfileName`] if `name` is empty or
    /// could escape the profile folder.
    pub fn profile_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{PROFILE_EXTENSION}")))
    }

    /// Write `profile` under `name`, creating missing directories.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::InvalidProfileName`],
    /// [`TurntableError::Serialize`], or [`TurntableError::Io`].
    pub fn save(&self, name: &str, profile: &Profile) -> Result<PathBuf> {
        let start = Instant::now();
        let path = self.profile_path(name)?;
        let xml = to_xml(name, profile)?;

        fs::create_dir_all(&self.root)?;
        fs::write(&path, xml.as_bytes())?;

        info!(
            profile = name,
            path = %path.display(),
            experience = profile.experience,
            level = profile.level,
            tokens = profile.tokens,
            elapsed_us = start.elapsed().as_micros(),
            "Saved profile"
        );
        Ok(path)
    }

    /// Load profile `name`.
    ///
    /// Returns `Ok(None)` if no file exists for it.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::Parse`] if the file is malformed,
    /// [`TurntableError::InvalidProfileName`], or [`TurntableError::Io`] on
    /// read failures other than "not found".
    pub fn load(&self, name: &str) -> Result<Option<Profile>> {
        let path = self.profile_path(name)?;

        let xml = match fs::read_to_string(&path) {
            Ok(xml) => xml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(profile = name, path = %path.display(), "No saved profile");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let profile = from_xml(&xml, &path.display().to_string())?;
        info!(
            profile = name,
            experience = profile.experience,
            level = profile.level,
            tokens = profile.tokens,
            "Loaded profile"
        );
        Ok(Some(profile))
    }

    /// Whether a file exists for profile `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::InvalidProfileName`].
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.profile_path(name)?.is_file())
    }

    /// Delete profile `name`. Returns `true` if a file was removed.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::InvalidProfileName`] or [`TurntableError::Io`].
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.profile_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(profile = name, "Deleted profile");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Names of all stored profiles, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`TurntableError::Io`] if the folder exists but cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == PROFILE_EXTENSION) && path.is_file() {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(TurntableError::InvalidProfileName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
