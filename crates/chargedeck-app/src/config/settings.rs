//! Settings parser and session store
//!
//! Settings live in `~/.config/chargedeck/config.toml` (overridable with
//! `--config`); the signed-in session is persisted next to it as
//! `session.json` so restarting the console does not force a new login.

use std::path::{Path, PathBuf};

use chargedeck_core::prelude::*;
use chargedeck_core::AuthSession;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const SESSION_FILENAME: &str = "session.json";

/// Platform config directory for chargedeck.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chargedeck")
}

/// Load settings from the given path, or from the default location.
/// A missing file yields defaults; a malformed file is an error (silently
/// ignoring a typo'd config helps nobody).
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_dir().join(CONFIG_FILENAME),
    };

    if !path.exists() {
        if explicit.is_some() {
            return Err(Error::ConfigNotFound { path });
        }
        debug!("No config file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let text = std::fs::read_to_string(&path)?;
    toml::from_str(&text).map_err(|e| Error::config(format!("{}: {e}", path.display())))
}

/// Path of the persisted session file.
pub fn session_path() -> PathBuf {
    config_dir().join(SESSION_FILENAME)
}

/// Load the persisted session, if any. Malformed content is treated as
/// absent -- the user just signs in again.
pub fn load_session(path: &Path) -> Option<AuthSession> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Discarding unreadable session file: {e}");
            None
        }
    }
}

/// Persist the session after login/refresh.
pub fn save_session(path: &Path, session: &AuthSession) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(session)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Remove the persisted session (logout / expiry).
pub fn clear_session(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove session file: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargedeck_core::{Role, UserProfile};
    use chrono::{Duration, Utc};

    fn sample_session() -> AuthSession {
        AuthSession {
            token: "tok".into(),
            refresh_token: "ref".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: UserProfile {
                id: "u1".into(),
                email: "a@b.c".into(),
                full_name: "A".into(),
            },
            role: Role::Admin,
            operator_id: None,
        }
    }

    #[test]
    fn test_load_settings_missing_default_path_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        // explicit missing path errors
        assert!(matches!(
            load_settings(Some(&missing)),
            Err(Error::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_load_settings_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\npage_size = 25\n").unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.ui.page_size, 25);
    }

    #[test]
    fn test_load_settings_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\npage_size =").unwrap();
        assert!(load_settings(Some(&path)).is_err());
    }

    #[test]
    fn test_session_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        assert!(load_session(&path).is_none());

        let session = sample_session();
        save_session(&path, &session).unwrap();
        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.role, Role::Admin);

        clear_session(&path);
        assert!(load_session(&path).is_none());
    }

    #[test]
    fn test_malformed_session_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_session(&path).is_none());
    }
}
