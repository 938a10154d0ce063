//! Persisted session store.
//!
//! One typed record per profile, kept behind a single accessor type --
//! no component touches raw storage keys. Token material goes to the
//! system keyring when one is available, with a file fallback for
//! headless environments; the profile fields live in a JSON file under
//! the sessions directory.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use parkdeck_core::{ActiveSession, Role, SessionTokens};

use crate::ConfigError;

const KEYRING_SERVICE: &str = "parkdeck";

/// The persisted identity fields of a session (everything except the
/// token material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub email: String,
    /// "partner" or "admin".
    pub role: String,
    #[serde(default)]
    pub partner_id: Option<i64>,
    #[serde(default)]
    pub registration_id: Option<Uuid>,
    #[serde(default)]
    pub registration_status: Option<String>,
}

impl From<&ActiveSession> for StoredSession {
    fn from(session: &ActiveSession) -> Self {
        Self {
            email: session.email.clone(),
            role: match session.role {
                Role::Partner => "partner".into(),
                Role::Admin => "admin".into(),
            },
            partner_id: session.partner_id,
            registration_id: session.registration_id,
            registration_status: session.registration_status.clone(),
        }
    }
}

impl StoredSession {
    /// Rebuild the in-memory session identity.
    pub fn to_active(&self) -> Result<ActiveSession, ConfigError> {
        Ok(ActiveSession {
            email: self.email.clone(),
            role: crate::parse_role(&self.role)?,
            partner_id: self.partner_id,
            registration_id: self.registration_id,
            registration_status: self.registration_status.clone(),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct StoredTokens {
    access: String,
    refresh: String,
}

/// Accessor for one profile's persisted session.
pub struct SessionStore {
    profile: String,
    dir: PathBuf,
}

impl SessionStore {
    pub fn for_profile(profile: &str) -> Self {
        Self {
            profile: profile.to_owned(),
            dir: crate::sessions_dir(),
        }
    }

    /// Store rooted at an explicit directory (tests).
    pub fn at(dir: PathBuf, profile: &str) -> Self {
        Self {
            profile: profile.to_owned(),
            dir,
        }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.profile))
    }

    fn tokens_path(&self) -> PathBuf {
        self.dir.join(format!("{}.tokens.json", self.profile))
    }

    // ── Session identity ─────────────────────────────────────────────

    pub fn save(&self, session: &StoredSession) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| ConfigError::Session(e.to_string()))?;
        std::fs::write(self.session_path(), json)?;
        Ok(())
    }

    pub fn load(&self) -> Option<StoredSession> {
        let contents = std::fs::read_to_string(self.session_path()).ok()?;
        serde_json::from_str(&contents).ok()
    }

    // ── Token material ───────────────────────────────────────────────

    /// Persist the token pair: keyring first, file fallback.
    pub fn save_tokens(&self, tokens: &SessionTokens) -> Result<(), ConfigError> {
        let payload = StoredTokens {
            access: tokens.access.expose_secret().to_owned(),
            refresh: tokens.refresh.expose_secret().to_owned(),
        };
        let json =
            serde_json::to_string(&payload).map_err(|e| ConfigError::Session(e.to_string()))?;

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/tokens", self.profile))
        {
            if entry.set_password(&json).is_ok() {
                debug!(profile = %self.profile, "tokens stored in keyring");
                // A stale file copy must not outlive the keyring write.
                let _ = std::fs::remove_file(self.tokens_path());
                return Ok(());
            }
        }

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.tokens_path(), json)?;
        debug!(profile = %self.profile, "tokens stored in session file");
        Ok(())
    }

    /// Load the token pair: keyring first, file fallback.
    pub fn load_tokens(&self) -> Option<SessionTokens> {
        let json = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/tokens", self.profile))
            .ok()
            .and_then(|entry| entry.get_password().ok())
            .or_else(|| std::fs::read_to_string(self.tokens_path()).ok())?;

        let stored: StoredTokens = serde_json::from_str(&json).ok()?;
        Some(SessionTokens {
            access: SecretString::from(stored.access),
            refresh: SecretString::from(stored.refresh),
        })
    }

    /// Remove everything this profile persisted (logout).
    pub fn clear(&self) {
        let _ = std::fs::remove_file(self.session_path());
        let _ = std::fs::remove_file(self.tokens_path());
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/tokens", self.profile))
        {
            let _ = entry.delete_credential();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> StoredSession {
        StoredSession {
            email: "partner@example.com".into(),
            role: "partner".into(),
            partner_id: Some(42),
            registration_id: None,
            registration_status: Some("APPROVED".into()),
        }
    }

    #[test]
    fn session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().to_path_buf(), "default");

        assert!(store.load().is_none());
        store.save(&sample()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.email, "partner@example.com");
        assert_eq!(loaded.partner_id, Some(42));

        let active = loaded.to_active().unwrap();
        assert_eq!(active.role, Role::Partner);
    }

    #[test]
    fn clear_removes_the_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().to_path_buf(), "default");
        store.save(&sample()).unwrap();
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn unknown_stored_role_fails_restoration() {
        let mut session = sample();
        session.role = "mystery".into();
        assert!(session.to_active().is_err());
    }
}
