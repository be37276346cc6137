//! Provider sign-in bridge.
//!
//! The browser does the actual provider round trip against the hosted
//! authorization endpoints. This module owns what happens around it: building
//! the URL to hand the browser, turning the callback parameters into an
//! identity the backend accepts and tracking the upsert request. No provider
//! secrets or token exchanges happen client-side.

use fintrack_shared::{
    const_config::oauth::authorize_url,
    errors::ApiResult,
    req_args::OauthSyncReqArgs,
    user::{AuthProvider, Email},
};
use futures::channel::oneshot;

use crate::{client::UiCallBack, Client};

/// Parameters delivered back to the app when the provider redirects to us
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthCallbackArgs {
    pub provider: AuthProvider,
    pub provider_account_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Identity as the backend upsert expects it, always complete even when the
/// provider withheld profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthIdentity {
    pub email: Email,
    pub name: String,
    pub provider: AuthProvider,
}

/// Where the provider sign-in currently stands. The app polls this every
/// frame like any other in-flight request.
#[derive(Debug, Default)]
pub enum OauthSignIn {
    #[default]
    Idle,
    /// The browser has been handed off to the provider
    ProviderRedirect { provider: AuthProvider },
    /// Waiting on the backend upsert to confirm the identity
    BackendSync {
        provider: AuthProvider,
        rx: oneshot::Receiver<ApiResult<()>>,
    },
    Authenticated { provider: AuthProvider },
    Denied { reason: String },
}

impl From<OauthCallbackArgs> for OauthIdentity {
    fn from(args: OauthCallbackArgs) -> Self {
        let email = args
            .email
            .and_then(|email| Email::try_from(email).ok())
            .unwrap_or_else(|| {
                // Providers are allowed to withhold the email, the account is
                // then keyed on a synthesized placeholder address
                Email::try_from(format!(
                    "{}@{}.user",
                    args.provider_account_id, args.provider
                ))
                .expect("synthesized placeholder is always a valid email")
            });
        let name = args.name.unwrap_or_else(|| "User".to_string());
        Self {
            email,
            name,
            provider: args.provider,
        }
    }
}

impl OauthSignIn {
    /// Returns the URL the browser must navigate to and records the hand-off
    pub fn start_redirect(&mut self, server_address: &str, provider: AuthProvider) -> String {
        *self = Self::ProviderRedirect { provider };
        authorize_url(server_address, provider)
    }

    /// Starts the backend upsert for a completed provider round trip
    #[tracing::instrument(skip(self, client, ui_notify))]
    pub fn begin_sync<F: UiCallBack>(
        &mut self,
        client: &Client,
        args: OauthCallbackArgs,
        ui_notify: F,
    ) {
        let identity: OauthIdentity = args.into();
        let provider = identity.provider;
        let rx = client.oauth_sync(
            OauthSyncReqArgs {
                email: identity.email,
                name: identity.name,
                provider,
            },
            ui_notify,
        );
        *self = Self::BackendSync { provider, rx };
    }

    /// Records a sign-in the provider or the user aborted. Fails closed, no
    /// credential is stored.
    pub fn deny(&mut self, reason: String) {
        *self = Self::Denied { reason };
    }

    /// Call once per frame, advances out of [`Self::BackendSync`] when the
    /// upsert resolves
    pub fn poll(&mut self) {
        if let Self::BackendSync { provider, rx } = self {
            let provider = *provider;
            match rx.try_recv() {
                Ok(None) => {} // Still in flight
                Ok(Some(result)) => *self = Self::settle(provider, result),
                Err(oneshot::Canceled) => {
                    *self = Self::Denied {
                        reason: "sign-in request was dropped".to_string(),
                    }
                }
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    fn settle(provider: AuthProvider, result: ApiResult<()>) -> Self {
        match result {
            Ok(()) => Self::Authenticated { provider },
            Err(e) => Self::Denied {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use fintrack_shared::errors::ApiError;

    use super::*;

    #[rstest]
    #[case::all_fields_present(
        Some("ada@example.com".to_string()),
        Some("Ada".to_string()),
        "ada@example.com",
        "Ada"
    )]
    #[case::email_withheld(None, Some("Ada".to_string()), "12345@google.user", "Ada")]
    #[case::name_withheld(Some("ada@example.com".to_string()), None, "ada@example.com", "User")]
    #[case::unusable_email(Some("not-an-email".to_string()), None, "12345@google.user", "User")]
    fn identity_is_complete_even_with_withheld_fields(
        #[case] email: Option<String>,
        #[case] name: Option<String>,
        #[case] expected_email: &str,
        #[case] expected_name: &str,
    ) {
        // Arrange
        let args = OauthCallbackArgs {
            provider: AuthProvider::Google,
            provider_account_id: "12345".to_string(),
            email,
            name,
        };

        // Act
        let identity: OauthIdentity = args.into();

        // Assert
        assert_eq!(identity.email.as_ref(), expected_email);
        assert_eq!(identity.name, expected_name);
        assert_eq!(identity.provider, AuthProvider::Google);
    }

    #[test]
    fn failed_upsert_lands_in_denied_with_the_reason() {
        // Act
        let actual = OauthSignIn::settle(AuthProvider::Twitter, Err(ApiError::Auth));

        // Assert
        assert!(matches!(actual, OauthSignIn::Denied { reason } if reason.contains("authenticated")));
    }

    #[test]
    fn denied_sign_in_stores_no_credential() {
        // Arrange
        let client = Client::default();
        let mut sign_in = OauthSignIn::default();

        // Act
        sign_in.deny("user cancelled at the provider".to_string());

        // Assert
        assert!(!sign_in.is_authenticated());
        assert!(!client.is_signed_in());
    }
}
