// ── End-user domain type ──

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An end user of the platform, as seen by admins and partners.
///
/// Fetched lazily by id and held in the session-lived lookup cache --
/// profile fields may be sparse depending on what the user filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
