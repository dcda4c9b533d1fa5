//! Profile fields and preference flags stored in the user's metadata object.

use crate::session::User;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the serialized [`Preferences`].
pub const PREFERENCES_KEY: &str = "preferences";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub location: String,
}

impl Profile {
    pub fn from_user(user: &User) -> Self {
        let read = |key: &str| user.metadata_str(key).unwrap_or_default().to_string();
        Self {
            name: read("name"),
            bio: read("bio"),
            location: read("location"),
        }
    }

    /// Metadata payload for an update; values are trimmed.
    pub fn to_metadata(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("name".into(), Value::String(self.name.trim().to_string()));
        data.insert("bio".into(), Value::String(self.bio.trim().to_string()));
        data.insert("location".into(), Value::String(self.location.trim().to_string()));
        data
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Private,
    Friends,
}

impl ProfileVisibility {
    pub const ALL: [Self; 3] = [Self::Public, Self::Private, Self::Friends];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Friends => "friends",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "Public - Anyone can see your profile",
            Self::Private => "Private - Only you can see your profile",
            Self::Friends => "Friends - Only connections can see your profile",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|visibility| visibility.as_str() == value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub marketing_emails: bool,
    pub profile_visibility: ProfileVisibility,
    pub data_collection: bool,
    pub third_party_sharing: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            email_notifications: true,
            push_notifications: false,
            marketing_emails: false,
            profile_visibility: ProfileVisibility::Public,
            data_collection: true,
            third_party_sharing: false,
        }
    }
}

impl Preferences {
    /// Reads stored preferences, falling back to defaults for anything
    /// missing or malformed.
    pub fn from_user(user: &User) -> Self {
        user.user_metadata
            .get(PREFERENCES_KEY)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    pub fn to_metadata(&self) -> Map<String, Value> {
        let mut data = Map::new();
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        data.insert(PREFERENCES_KEY.to_string(), value);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::sample_user;
    use serde_json::json;

    #[test]
    fn profile_reads_and_trims_metadata() {
        let mut user = sample_user();
        user.user_metadata.insert("bio".into(), json!("  hello  "));
        let profile = Profile::from_user(&user);
        assert_eq!(profile.name, "Test User");
        assert_eq!(profile.location, "");

        let data = profile.to_metadata();
        assert_eq!(data.get("bio"), Some(&json!("hello")));
        assert_eq!(data.get("location"), Some(&json!("")));
    }

    #[test]
    fn preferences_default_when_missing_or_partial() {
        let mut user = sample_user();
        assert_eq!(Preferences::from_user(&user), Preferences::default());

        user.user_metadata.insert(
            PREFERENCES_KEY.into(),
            json!({ "darkMode": true, "profileVisibility": "friends" }),
        );
        let prefs = Preferences::from_user(&user);
        assert!(prefs.dark_mode);
        assert!(prefs.email_notifications);
        assert_eq!(prefs.profile_visibility, ProfileVisibility::Friends);

        user.user_metadata.insert(PREFERENCES_KEY.into(), json!("garbage"));
        assert_eq!(Preferences::from_user(&user), Preferences::default());
    }

    #[test]
    fn preferences_serialize_under_their_key() {
        let data = Preferences::default().to_metadata();
        assert_eq!(data[PREFERENCES_KEY]["emailNotifications"], json!(true));
        assert_eq!(data[PREFERENCES_KEY]["profileVisibility"], json!("public"));
    }
}
