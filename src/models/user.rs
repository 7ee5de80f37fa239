//! User profile kept next to the session token.

use super::Role;
use serde::{Deserialize, Serialize};

/// User profile as persisted under `user_data`.
///
/// Built from token claims at login, or replaced wholesale by the fuller
/// profile the backend returns at registration. Also the shape of the
/// customer records listed in the admin panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
