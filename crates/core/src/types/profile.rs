//! Cached user profile shape.

use serde::{Deserialize, Deserializer, Serialize};

/// The locally cached profile of the signed-in user.
///
/// There is no dedicated "fetch current user" endpoint; this shape is
/// updated only from login/signup responses and from the session-check
/// payload. Older backends sent the avatar under `image`, and some send
/// both spellings at once; either way it lands in [`Self::avatar_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Email address as reported by the backend.
    pub email: String,
    /// Whether the email address has been verified.
    pub verified_email: bool,
    /// Avatar URL, if one is set.
    pub avatar_url: Option<String>,
}

impl<'de> Deserialize<'de> for UserProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize, Default)]
        struct Raw {
            #[serde(default)]
            name: String,
            #[serde(default)]
            email: String,
            #[serde(default)]
            verified_email: bool,
            #[serde(default)]
            avatar_url: Option<String>,
            #[serde(default)]
            image: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self {
            name: raw.name,
            email: raw.email,
            verified_email: raw.verified_email,
            avatar_url: raw.avatar_url.or(raw.image),
        })
    }
}

impl UserProfile {
    /// Returns `true` if every field is at its default, i.e. the payload
    /// carried nothing recognizable as a user.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.avatar_url.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_avatar_url() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@acme.io","avatar_url":"https://cdn.acme.io/a.png"}"#)
                .unwrap();
        assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn.acme.io/a.png"));
    }

    #[test]
    fn test_deserialize_legacy_image_field() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@acme.io","image":"https://cdn.acme.io/a.png"}"#)
                .unwrap();
        assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn.acme.io/a.png"));
    }

    #[test]
    fn test_both_avatar_spellings_present() {
        // Stored profiles can carry both keys; the canonical one wins.
        let profile: UserProfile = serde_json::from_str(
            r#"{"name":"Ada","avatar_url":"https://cdn.acme.io/new.png","image":"https://cdn.acme.io/old.png"}"#,
        )
        .unwrap();
        assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn.acme.io/new.png"));
    }

    #[test]
    fn test_missing_fields_default() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.is_empty());
        assert!(!profile.verified_email);
    }
}
