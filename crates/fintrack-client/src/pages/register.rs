use super::data_state::{AwaitingType, DataState};
use crate::{app::wake_fn, ui_helpers::ui_password_edit, DataShared};
use egui::Button;
use fintrack_shared::{
    req_args::RegisterReqArgs,
    user::{Email, Username},
};
use secrecy::{ExposeSecret as _, SecretString};

/// Account creation form, shown from the login screen before any credential
/// exists which is why it is not one of the workspace pages
#[derive(Debug)]
pub struct UiRegister {
    username: String,
    email: String,
    password: SecretString,
    confirmation_password: SecretString,
    data_state: DataState<()>,
}

impl UiRegister {
    pub fn show(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.heading("Create your FinTrack account");
        match &mut self.data_state {
            DataState::None => self.show_controls(ui, data_shared),
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = DataState::await_data(Some(ui), rx) {
                    self.data_state = new_state;
                }
            }
            DataState::Present(()) => {
                // The app routes to the workspace on its own
                ui.label("Account created");
            }
            DataState::Failed(e) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Registration failed: {e}"),
                );
                if ui.button("Try again").clicked() {
                    self.data_state = DataState::default();
                }
            }
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        let mut has_errors = false;

        egui::Grid::new("Register Grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Username");
                ui.text_edit_singleline(&mut self.username);
                if let Err(e) = Username::try_from(self.username.clone()) {
                    has_errors = true;
                    ui.colored_label(ui.visuals().error_fg_color, e.to_string());
                }
                ui.end_row();

                //----------------------------------------------------------------------
                ui.label("Email");
                ui.text_edit_singleline(&mut self.email);
                if let Err(e) = Email::try_from(self.email.clone()) {
                    has_errors = true;
                    ui.colored_label(ui.visuals().error_fg_color, e.to_string());
                }
                ui.end_row();

                //----------------------------------------------------------------------
                ui.label("Password");
                ui_password_edit(ui, &mut self.password, "Password");
                if self.password.expose_secret().is_empty() {
                    has_errors = true;
                    ui.colored_label(ui.visuals().error_fg_color, "Required".to_string());
                }
                ui.end_row();

                //----------------------------------------------------------------------
                ui.label("Confirm Password");
                ui_password_edit(ui, &mut self.confirmation_password, "Same password again");
                if self.confirmation_password.expose_secret() != self.password.expose_secret() {
                    has_errors = true;
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        "Passwords do not match".to_string(),
                    );
                }
                ui.end_row();
            });

        if ui
            .add_enabled(!has_errors, Button::new("Create account"))
            .clicked()
        {
            let args = RegisterReqArgs::new(
                self.username.clone(),
                self.email.clone(),
                self.password.clone(),
            );
            let rx = data_shared.client.register(args, wake_fn(ui.ctx().clone()));
            self.data_state = DataState::AwaitingResponse(AwaitingType(rx));
        }
    }
}

impl Default for UiRegister {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: SecretString::from(""),
            confirmation_password: SecretString::from(""),
            data_state: Default::default(),
        }
    }
}
