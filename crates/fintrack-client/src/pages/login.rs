use super::register::UiRegister;
use crate::{app::wake_fn, ui_helpers::ui_password_edit, DataShared};
use fintrack_client_core::OauthSignIn;
use fintrack_shared::{
    errors::ApiResult, internal_error, req_args::LoginReqArgs, user::AuthProvider,
};
use futures::channel::oneshot;
use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;
use tracing::{error, info};

#[derive(Debug)]
pub struct UiLogin {
    email: String,
    password: SecretString,
    login_attempt_status: LoginAttemptStatus,
    register_page: Option<UiRegister>,
}

type LoginAwaitingType = oneshot::Receiver<ApiResult<()>>;

#[derive(Default)]
enum LoginAttemptStatus {
    #[default]
    NotAttempted,
    AwaitingResponse(LoginAwaitingType),
    Failed(String),
    Success,
}

impl Debug for LoginAttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAttempted => write!(f, "NotAttempted"),
            Self::AwaitingResponse(_) => write!(f, "AwaitingResponse"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
            Self::Success => write!(f, "Success"),
        }
    }
}

impl LoginAttemptStatus {
    fn is_allowed_to_login(&self) -> bool {
        match self {
            LoginAttemptStatus::NotAttempted | LoginAttemptStatus::Failed(_) => true,
            LoginAttemptStatus::AwaitingResponse(_) | LoginAttemptStatus::Success => false,
        }
    }
}

impl UiLogin {
    fn is_password_set(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    fn login_prompt(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let email_widget = egui::TextEdit::singleline(&mut self.email).hint_text("Email");
        let mut lost_focus = ui.add(email_widget).lost_focus();

        lost_focus =
            ui_password_edit(ui, &mut self.password, "Password").lost_focus() || lost_focus;

        if lost_focus
            && is_allowed_to_login(self)
            && ui.input(|i| i.key_pressed(egui::Key::Enter))
        {
            self.send_login_attempt(ui, data_shared)
        }
    }

    fn check_login_attempt_status(&mut self, ui: &mut egui::Ui) {
        match &mut self.login_attempt_status {
            LoginAttemptStatus::NotAttempted => {
                // No special UI needed
            }
            LoginAttemptStatus::Success => {
                // The app routes to the workspace, nothing to add here
                ui.ctx().request_repaint(); // Repaint with new value
            }
            LoginAttemptStatus::AwaitingResponse(rx) => match rx.try_recv() {
                Ok(recv_opt) => match recv_opt {
                    Some(outcome_result) => match outcome_result {
                        Ok(()) => {
                            info!("login confirmed by client-core");
                            self.login_attempt_status = LoginAttemptStatus::Success;
                            // Repaint with new value
                            ui.ctx().request_repaint();
                        }
                        Err(e) => {
                            info!("error returned from client-core: {e:?}");
                            self.login_attempt_status = LoginAttemptStatus::Failed(e.to_string())
                        }
                    },
                    None => {
                        ui.spinner();
                    }
                },
                Err(e) => {
                    error!("Error receiving on channel. Canceled: {e:?}");
                    self.login_attempt_status = LoginAttemptStatus::Failed(internal_error!(e));
                }
            },
            LoginAttemptStatus::Failed(e) => {
                let err_msg = format!("Login attempt failed: {e}");
                ui.separator();
                ui.colored_label(ui.visuals().error_fg_color, err_msg);
                if ui.button("Clear error status").clicked() {
                    self.login_attempt_status = LoginAttemptStatus::NotAttempted;
                }
                ui.separator();
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, data_shared: &mut DataShared) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(register_page) = &mut self.register_page {
                let mut back_to_login = false;
                ui.vertical_centered(|ui| {
                    register_page.show(ui, data_shared);
                    if ui.button("Back to sign in").clicked() {
                        back_to_login = true;
                    }
                });
                if back_to_login {
                    self.register_page = None;
                }
            } else {
                ui.vertical_centered(|ui| {
                    ui.heading("Sign in to FinTrack");

                    self.login_prompt(ui, data_shared);

                    self.check_login_attempt_status(ui);

                    self.login_button(ui, data_shared);

                    if ui.button("Create an account").clicked() {
                        self.register_page = Some(Default::default());
                    }

                    self.ui_oauth_section(ui, data_shared);
                });
            }
        });
    }

    fn login_button(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        if ui
            .add_enabled(is_allowed_to_login(self), egui::Button::new("Sign in"))
            .clicked()
        {
            self.send_login_attempt(ui, data_shared);
        }
    }

    fn send_login_attempt(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let args = LoginReqArgs::new(self.email.clone(), self.password.clone());

        let rx = data_shared.client.login(args, wake_fn(ui.ctx().clone()));
        self.login_attempt_status = LoginAttemptStatus::AwaitingResponse(rx);
    }

    fn ui_oauth_section(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.separator();
        ui.label("Or continue with");
        ui.horizontal(|ui| {
            ui_oauth_button(ui, data_shared, AuthProvider::Google);
            ui_oauth_button(ui, data_shared, AuthProvider::Twitter);
        });
        match &data_shared.oauth {
            OauthSignIn::Idle | OauthSignIn::Authenticated { .. } => {}
            OauthSignIn::ProviderRedirect { provider } => {
                ui.spinner();
                ui.label(format!("Continuing at {provider}..."));
            }
            OauthSignIn::BackendSync { provider, .. } => {
                ui.spinner();
                ui.label(format!("Completing {provider} sign-in..."));
            }
            OauthSignIn::Denied { reason } => {
                let err_msg = format!("Sign-in denied: {reason}");
                ui.colored_label(ui.visuals().error_fg_color, err_msg);
                if ui.button("Dismiss").clicked() {
                    data_shared.oauth = OauthSignIn::default();
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn ui_oauth_button(ui: &mut egui::Ui, data_shared: &mut DataShared, provider: AuthProvider) {
    if ui.button(format!("Sign in with {provider}")).clicked() {
        let url = data_shared
            .oauth
            .start_redirect(&data_shared.client.server_address(), provider);
        let Some(window) = web_sys::window() else {
            error!("No window found");
            return;
        };
        if let Err(e) = window.location().set_href(&url) {
            data_shared
                .oauth
                .deny(internal_error!(format!("failed to navigate: {e:?}")));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn ui_oauth_button(ui: &mut egui::Ui, _data_shared: &mut DataShared, provider: AuthProvider) {
    ui.add_enabled(false, egui::Button::new(format!("Sign in with {provider}")))
        .on_disabled_hover_text("Provider sign-in is only available in the web client");
}

impl Default for UiLogin {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(""),
            login_attempt_status: Default::default(),
            register_page: Default::default(),
        }
    }
}

fn is_allowed_to_login(data: &UiLogin) -> bool {
    !data.email.is_empty()
        && data.is_password_set()
        && data.login_attempt_status.is_allowed_to_login()
}
