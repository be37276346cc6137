//! This module stores the expected format of the arguments for the requests.
//! The structure is supposed to match the endpoints in
//! [`const_config::path`](crate::const_config::path). Some structs are not
//! serializable but are still included here to know what needs to be sent.

use std::fmt::Debug;

use secrecy::{ExposeSecret, SecretString};

use crate::{
    company::Cik,
    user::{AuthProvider, Email},
};

#[derive(serde::Deserialize, Clone)]
pub struct LoginReqArgs {
    pub email: String,
    pub password: SecretString,
}

#[derive(serde::Deserialize, Clone)]
pub struct RegisterReqArgs {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

/// Upsert payload for provider sign-in. The backend creates the account on
/// first contact and signs in on subsequent ones, from the same request.
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct OauthSyncReqArgs {
    pub email: Email,
    pub name: String,
    pub provider: AuthProvider,
}

#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
pub struct TrackCompaniesReqArgs {
    pub ciks: Vec<Cik>,
}

#[derive(Debug, serde::Serialize, Clone, Copy, PartialEq, Eq)]
pub struct UntrackCompanyReqArgs {
    pub cik: Cik,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(email: S, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

impl RegisterReqArgs {
    pub fn new<S: Into<String>>(username: S, email: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password,
        }
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

impl Debug for RegisterReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReqArgs")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_debug_never_shows_the_password() {
        // Arrange
        let args = LoginReqArgs::new("ada@example.com", SecretString::from("hunter2"));

        // Act
        let printed = format!("{args:?}");

        // Assert
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("has_password: true"));
    }

    #[test]
    fn untrack_serializes_to_the_expected_body() {
        let args = UntrackCompanyReqArgs { cik: 320193.into() };
        let actual = serde_json::to_value(args).unwrap();
        assert_eq!(actual, serde_json::json!({"cik": 320193}));
    }
}
