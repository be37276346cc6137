use std::fmt::Display;

use egui::WidgetText;
use secrecy::SecretString;

use crate::errors::ConversionError;

/// Represents an email address. Only the shape is checked client-side, the
/// backend remains the authority on deliverability.
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Email(String);

/// Represents a username and is constrained to not be an empty string
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Username(String);

/// Third party identity provider supported for sign-in
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Twitter,
}

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct UserId(u64);

/// Profile record as served by the backend profile endpoint (the backend is
/// authoritative, the credential payload is never decoded client-side)
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub provider: Option<AuthProvider>,
}

/// Credential payload returned by login, register and the OAuth upsert
#[derive(Debug, serde::Deserialize, Clone)]
pub struct LoginResponse {
    pub token: SecretString,
}

impl Email {
    pub const MAX_LENGTH: usize = 254;
}

impl Username {
    pub const MAX_LENGTH: usize = 30;
}

impl TryFrom<String> for Email {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        if !value.contains('@') {
            return Err(ConversionError::InvalidFormat("missing '@'"));
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Email {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for Username {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Username {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Email> for WidgetText {
    fn from(value: &Email) -> Self {
        (&value.0).into()
    }
}

impl From<&Username> for WidgetText {
    fn from(value: &Username) -> Self {
        (&value.0).into()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::no_at_sign("ada.example.com".to_string(), ConversionError::InvalidFormat("missing '@'"))]
    #[case::too_long(format!("{}@x.com", "a".repeat(250)), ConversionError::MaxExceeded{max: 254, actual: 256})]
    fn illegal_email(#[case] email: String, #[case] expect: ConversionError) {
        // Act
        let actual: Result<Email, ConversionError> = email.try_into();

        // Assert
        assert_eq!(actual.unwrap_err(), expect);
    }

    #[rstest]
    #[case::empty("", ConversionError::Empty)]
    #[case::too_long("a".repeat(31), ConversionError::MaxExceeded{max: 30, actual: 31})]
    fn illegal_username(#[case] name: String, #[case] expect: ConversionError) {
        // Act
        let actual: Result<Username, ConversionError> = name.try_into();

        // Assert
        assert_eq!(actual.unwrap_err(), expect);
    }

    #[rstest]
    #[case::google(AuthProvider::Google, "google")]
    #[case::twitter(AuthProvider::Twitter, "twitter")]
    fn provider_tags_use_the_wire_spelling(#[case] provider: AuthProvider, #[case] expect: &str) {
        assert_eq!(provider.to_string(), expect);
        assert_eq!(expect.parse::<AuthProvider>().unwrap(), provider);
    }
}
