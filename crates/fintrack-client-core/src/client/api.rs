use fintrack_shared::{
    const_config::path::{PATH_USERS_OAUTH, PATH_USERS_REGISTER},
    errors::{ApiError, ApiResult},
    req_args::{OauthSyncReqArgs, RegisterReqArgs},
    user::Email,
};
use futures::channel::oneshot;
use secrecy::ExposeSecret as _;

use crate::client::{process_sign_in, send_to_ui, UiCallBack};
use crate::Client;

pub mod companies;
pub mod queries;

impl Client {
    /// Creates the account and signs the new user in from the same request
    #[tracing::instrument(skip(args, ui_notify))]
    pub fn register<F: UiCallBack>(
        &self,
        args: RegisterReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<()>> {
        let (tx, rx) = oneshot::channel();
        let email: Email = match args.email.clone().try_into() {
            Ok(email) => email,
            Err(e) => {
                send_to_ui(tx, Err(ApiError::Validation(e.to_string())));
                ui_notify();
                return rx;
            }
        };
        let body = serde_json::json!({
            "username": args.username,
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_sign_in(resp, client, email, None).await;
            send_to_ui(tx, msg);
            ui_notify();
        };

        self.initiate_request(PATH_USERS_REGISTER, &body, on_done);
        rx
    }

    /// Upserts the provider identity on the backend and signs in with the
    /// returned credential
    #[tracing::instrument(skip(ui_notify))]
    pub fn oauth_sync<F: UiCallBack>(
        &self,
        args: OauthSyncReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<()>> {
        let (tx, rx) = oneshot::channel();
        let email = args.email.clone();
        let provider = args.provider;
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_sign_in(resp, client, email, Some(provider)).await;
            send_to_ui(tx, msg);
            ui_notify();
        };

        self.initiate_request(PATH_USERS_OAUTH, &args, on_done);
        rx
    }

    /// Discards the credential and session locally. The backend holds no
    /// session state for bearer credentials so there is nothing to tell it.
    #[tracing::instrument]
    pub fn logout(&self) {
        self.token_store.clear();
        self.inner.lock().expect("mutex poisoned").session = None;
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use fintrack_shared::user::AuthProvider;

    use super::*;

    #[tokio::test]
    async fn failed_provider_upsert_reports_the_error_and_stays_signed_out() {
        // Arrange - nothing listens on this address
        let client = Client::new("http://127.0.0.1:9".to_string());
        let args = OauthSyncReqArgs {
            email: "ada@example.com".try_into().expect("valid email"),
            name: "Ada".to_string(),
            provider: AuthProvider::Google,
        };

        // Act
        let result = client.oauth_sync(args, || {}).await;

        // Assert
        let error = result
            .expect("request completion must be delivered")
            .expect_err("no server is listening");
        assert!(matches!(error, ApiError::Network(_)));
        assert!(!client.is_signed_in());
        assert!(client.session().is_none());
    }
}
