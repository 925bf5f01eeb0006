//! Authenticated user profile and registration form.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tillpoint_core::UserId;

/// The signed-in user, as returned by `auth/profile/`.
///
/// This is also the document persisted under the `user` key of the token
/// store so a restarted client can show who is signed in before the first
/// network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl UserProfile {
    /// Full name, falling back to the username when no name is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// New account registration.
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirmation: SecretString,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id": 3, "username": "ama"}"#).unwrap();
        assert_eq!(profile.id, UserId::new(3));
        assert!(profile.is_active);
        assert!(!profile.is_staff);
        assert_eq!(profile.display_name(), "ama");
    }

    #[test]
    fn test_display_name_uses_full_name() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 1, "username": "kofi", "first_name": "Kofi", "last_name": "Mensah"}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), "Kofi Mensah");
    }

    #[test]
    fn test_registration_debug_redacts() {
        let reg = Registration {
            username: "a".to_string(),
            email: "a@b.c".to_string(),
            password: SecretString::from("hunter2"),
            password_confirmation: SecretString::from("hunter2"),
        };
        assert!(!format!("{reg:?}").contains("hunter2"));
    }
}
