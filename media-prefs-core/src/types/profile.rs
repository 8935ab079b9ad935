//! Profile name and scoped key derivation

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Account;

const ANONYMOUS_PROFILE_NAME: &str = "anonymous";

/// Name of the active settings profile.
///
/// Profile-scoped keys are stored as `"<profile>_<key>"`. The format is part of the
/// on-disk layout and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileName(String);

impl ProfileName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Profile used when multi-profile mode is on but no account is selected.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_PROFILE_NAME.to_string())
    }

    /// Derive the profile from an account display name, spaces become underscores.
    ///
    /// Returns `None` for an account without a name.
    #[must_use]
    pub fn from_account(account: &Account) -> Option<Self> {
        account
            .name
            .as_deref()
            .map(|name| Self(name.replace(' ', "_")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_PROFILE_NAME
    }

    /// Prefix `key` with this profile. An empty profile name leaves the key unscoped.
    #[must_use]
    pub fn scoped_key(&self, key: &str) -> String {
        if self.0.is_empty() {
            key.to_string()
        } else {
            format!("{}_{key}", self.0)
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        let profile = ProfileName::from_account(&Account::named("John Doe")).unwrap();
        assert_eq!(profile.as_str(), "John_Doe");

        let profile = ProfileName::from_account(&Account::named(" a  b ")).unwrap();
        assert_eq!(profile.as_str(), "_a__b_");
    }

    #[test]
    fn nameless_account_has_no_profile() {
        assert!(ProfileName::from_account(&Account::default()).is_none());
    }

    #[test]
    fn scoped_key_prefixes_profile() {
        let profile = ProfileName::new("alice");
        assert_eq!(profile.scoped_key("volume"), "alice_volume");
    }

    #[test]
    fn empty_profile_does_not_scope() {
        let profile = ProfileName::new("");
        assert_eq!(profile.scoped_key("volume"), "volume");
    }

    #[test]
    fn anonymous_sentinel() {
        let profile = ProfileName::anonymous();
        assert!(profile.is_anonymous());
        assert_eq!(profile.scoped_key("x"), "anonymous_x");
        assert_eq!(profile.to_string(), "anonymous");
    }
}
