use anyhow::Context;
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use fintrack_shared::{
    const_config::{
        client::CLIENT_DEFAULT_SERVER_ADDRESS,
        path::{PathSpec, PATH_HEALTH_CHECK, PATH_USERS_LOGIN},
    },
    errors::{ApiError, ApiResult},
    req_args::LoginReqArgs,
    user::{AuthProvider, Email, LoginResponse},
};
use futures::channel::oneshot;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret as _, SecretString};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::session::{SessionInfo, TokenStore};

pub mod api;

pub use api::queries::QueryRow;

pub const DUMMY_ARGUMENT: &[(&str, &str)] = &[("", "")];

#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    token_store: TokenStore,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    server_address: String,
    session: Option<Arc<SessionInfo>>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(CLIENT_DEFAULT_SERVER_ADDRESS.to_string())
    }
}

impl ClientInner {
    #[tracing::instrument]
    fn new(server_address: String) -> Self {
        Self {
            server_address,
            session: None,
        }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE")]
    pub fn new(server_address: String) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            token_store: TokenStore::default(),
            inner: Arc::new(Mutex::new(ClientInner::new(server_address))),
        }
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
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
            "email": args.email,
            "password": args.password.expose_secret(),
        });
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_sign_in(resp, client, email, None).await;
            send_to_ui(tx, msg);
            ui_notify();
        };

        self.initiate_request(PATH_USERS_LOGIN, &body, on_done);
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn health_check<F>(&self, ui_notify: F) -> oneshot::Receiver<ApiResult<()>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_empty(PATH_HEALTH_CHECK, &DUMMY_ARGUMENT, ui_notify)
    }

    /// Stores a credential obtained outside of the normal login request, used
    /// when restoring a persisted session and by the provider sign-in flow
    pub fn complete_sign_in(
        &self,
        token: SecretString,
        email: Email,
        provider: Option<AuthProvider>,
    ) {
        self.token_store.set(token);
        self.inner.lock().expect("mutex poisoned").session =
            Some(Arc::new(SessionInfo { email, provider }));
    }

    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it may contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let is_get_method = path_spec.method == Method::GET;
        let mut request = self
            .api_client
            .request(path_spec.method, self.path_to_url(path_spec.path));
        if let Some(token) = self.token_store.get() {
            request = request.bearer_auth(token.expose_secret());
        }
        request = if is_get_method {
            request.query(&args)
        } else {
            request.json(&args)
        };
        reqwest_cross::fetch(request, on_done)
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<U>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
        U: Send + std::fmt::Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let token_store = self.token_store.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_json_body(resp, token_store).await;
            send_to_ui(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    fn send_request_expect_empty<F, T>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<()>>
    where
        T: serde::Serialize + std::fmt::Debug,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let token_store = self.token_store.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_empty(resp, token_store).await;
            send_to_ui(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            &self
                .inner
                .lock()
                .expect("failed to unlock client mutex")
                .server_address
        )
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    pub fn server_address(&self) -> String {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .server_address
            .clone()
    }

    pub fn session(&self) -> Option<Arc<SessionInfo>> {
        self.inner.lock().expect("mutex poisoned").session.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token_store.is_present()
    }
}

/// Forwards the result to the view that asked for it. A dropped receiver means
/// the view was torn down while the request was in flight and the result is
/// discarded without treating it as an error.
fn send_to_ui<T: Debug>(tx: oneshot::Sender<T>, msg: T) {
    if let Err(unwanted) = tx.send(msg) {
        tracing::debug!(?unwanted, "response discarded, receiver was dropped");
    }
}

#[tracing::instrument(ret, err(Debug), skip(token_store))]
async fn process_empty(
    response: reqwest::Result<reqwest::Response>,
    token_store: TokenStore,
) -> ApiResult<()> {
    let (response, status) = extract_response(response)?;
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(handle_error(response, token_store).await)
    }
}

#[tracing::instrument(ret, err(Debug), skip(token_store))]
async fn process_json_body<T>(
    response: reqwest::Result<reqwest::Response>,
    token_store: TokenStore,
) -> ApiResult<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => Ok(response
            .json()
            .await
            .context("failed to parse result as json")?),
        _ => Err(handle_error(response, token_store).await),
    }
}

#[tracing::instrument(ret, err(Debug), skip(client))]
async fn process_sign_in(
    response: reqwest::Result<reqwest::Response>,
    client: Client,
    email: Email,
    provider: Option<AuthProvider>,
) -> ApiResult<()> {
    let (response, status) = extract_response(response)?;
    match status {
        StatusCode::OK => {
            let login_response: LoginResponse = response
                .json()
                .await
                .context("failed to parse result as json")?;
            client.complete_sign_in(login_response.token, email, provider);
            Ok(())
        }
        _ => Err(handle_error(response, client.token_store.clone()).await),
    }
}

#[tracing::instrument(ret, skip(token_store))]
async fn handle_error(response: reqwest::Response, token_store: TokenStore) -> ApiError {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = response.text().await.unwrap_or_default();
    classify_error(status, body, &token_store)
}

fn classify_error(status: StatusCode, body: String, token_store: &TokenStore) -> ApiError {
    let error = ApiError::from_status(status, body);
    if error.is_auth() {
        // Stale credential, drop it so the app falls back to the login page
        token_store.clear();
    }
    error
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> ApiResult<(reqwest::Response, StatusCode)> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_response_empties_the_token_store() {
        // Arrange
        let token_store = TokenStore::default();
        token_store.set(SecretString::from("stale"));

        // Act
        let error = classify_error(
            StatusCode::UNAUTHORIZED,
            "token expired".to_string(),
            &token_store,
        );

        // Assert
        assert!(error.is_auth());
        assert!(!token_store.is_present());
    }

    #[test]
    fn other_failures_leave_the_credential_alone() {
        // Arrange
        let token_store = TokenStore::default();
        token_store.set(SecretString::from("still good"));

        // Act
        let error = classify_error(
            StatusCode::NOT_FOUND,
            "no such company".to_string(),
            &token_store,
        );

        // Assert
        assert!(error.is_not_found());
        assert!(token_store.is_present());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
