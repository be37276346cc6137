use egui::ScrollArea;
use fintrack_client_core::{OauthCallbackArgs, OauthSignIn, UiCallBack};
use fintrack_shared::const_config::client::CLIENT_POST_LOGIN_PAGE;
use fintrack_shared::user::{AuthProvider, Email};
use secrecy::SecretString;
use tracing::{info, warn};

use crate::pages::{profile::UiProfile, queries::UiQueries, UiLogin, UiPage};
use crate::DisplayablePage;

/// Result of the provider round trip as delivered back to the app. `Err`
/// carries the denial reason and never results in a stored credential.
pub type OauthCallback = Result<OauthCallbackArgs, String>;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct FinTrackApp {
    #[serde(skip)]
    login_page: Option<UiLogin>,
    data_shared: DataShared,
    active_pages: Vec<UiPage>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DataShared {
    /// Persisted copy of the signed-in session so a restart stays signed in
    saved_session: Option<SavedSession>,

    #[serde(skip)]
    pub client: fintrack_client_core::Client,
    #[serde(skip)]
    pub oauth: OauthSignIn,
}

/// What app storage keeps between runs. The email and provider ride along
/// with the credential so the restored session still knows who it belongs to.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct SavedSession {
    token: String,
    email: String,
    provider: Option<AuthProvider>,
}

/// Which surface the app shows, decided once per frame from whether a
/// credential is present
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Login,
    Workspace,
}

fn route_for(credential_present: bool) -> Route {
    if credential_present {
        Route::Workspace
    } else {
        Route::Login
    }
}

impl DataShared {
    pub fn is_signed_in(&self) -> bool {
        self.client.is_signed_in()
    }

    /// Puts a session restored from app storage back into the client
    fn restore_session(&mut self) {
        let Some(saved) = &self.saved_session else {
            return;
        };
        match Email::try_from(saved.email.clone()) {
            Ok(email) => {
                info!("Restoring persisted session");
                self.client.complete_sign_in(
                    SecretString::from(saved.token.clone()),
                    email,
                    saved.provider,
                );
            }
            Err(e) => {
                warn!("Discarding persisted session, stored email failed validation: {e}");
                self.saved_session = None;
            }
        }
    }

    /// Mirrors the live session into the persisted field. Also picks up a
    /// credential cleared by an authentication failure.
    fn capture_session(&mut self) {
        self.saved_session = match (
            self.client.token_store().expose_for_persistence(),
            self.client.session(),
        ) {
            (Some(token), Some(session)) => Some(SavedSession {
                token,
                email: session.email.to_string(),
                provider: session.provider,
            }),
            _ => None,
        };
    }
}

impl eframe::App for FinTrackApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.data_shared.capture_session();
        info!("Saving with key: {}", eframe::APP_KEY);
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per
    /// second. Put your widgets into a `SidePanel`, `TopPanel`,
    /// `CentralPanel`, `Window` or `Area`.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.data_shared.oauth.poll();
        self.top_panel(ctx);
        self.bottom_panel(ctx);
        self.show_pages(ctx);

        // Request repaint after 1 second
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }
}

impl FinTrackApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        server_address: Option<String>,
        oauth_callback: Option<OauthCallback>,
    ) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let mut app: Self = if let Some(storage) = cc.storage {
            info!("Storage found. Loading...");
            match eframe::get_value(storage, eframe::APP_KEY) {
                Some(value) => {
                    info!("Loaded succeeded");
                    value
                }
                None => {
                    warn!("Load failed");
                    Default::default()
                }
            }
        } else {
            info!("No storage found");
            Default::default()
        };

        if let Some(server_address) = server_address {
            app.data_shared.client = fintrack_client_core::Client::new(server_address);
        }
        app.data_shared.restore_session();

        match oauth_callback {
            Some(Ok(args)) => {
                let client = app.data_shared.client.clone();
                app.data_shared
                    .oauth
                    .begin_sync(&client, args, wake_fn(cc.egui_ctx.clone()));
            }
            Some(Err(reason)) => app.data_shared.oauth.deny(reason),
            None => {}
        }

        app
    }

    fn is_signed_in(&self) -> bool {
        self.data_shared.is_signed_in()
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.style_mut().wrap_mode = Some(egui::TextWrapMode::Extend);
        self.ui_menu_file(ui, ctx);
        self.ui_menu_pages(ui);
    }

    fn ui_menu_pages(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Pages", |ui| {
            self.ui_menu_page_btn::<UiProfile>(ui);
            self.ui_menu_page_btn::<UiQueries>(ui);

            ui.separator();
            if ui.button("Open All Pages").clicked() {
                self.open_all_pages();
                ui.close_menu();
            }
            if ui.button("Close All Pages").clicked() {
                self.close_all_pages();
                ui.close_menu();
            }
            if ui.button("Deactivate All Pages").clicked() {
                self.deactivate_all_pages();
                ui.close_menu();
            }
            if ui.button("Sort Pages By Name").clicked() {
                self.sort_pages_by_name();
                ui.close_menu();
            }
        });
    }

    fn top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                if self.is_signed_in() {
                    ui.separator();
                    self.menu(ui, ctx);
                }
            });
        });
    }

    fn bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::BOTTOM), |ui| {
                if self.is_signed_in() {
                    if ui.button("Logout").clicked() {
                        self.logout();
                    }
                    if let Some(session) = self.data_shared.client.session() {
                        ui.label(format!("Signed in as {}", session.email));
                    }
                }
                egui::warn_if_debug_build(ui);
            });
        });
    }

    fn show_pages(&mut self, ctx: &egui::Context) {
        match route_for(self.is_signed_in()) {
            Route::Login => {
                self.login_page
                    .get_or_insert(Default::default())
                    .show(ctx, &mut self.data_shared);
            }
            Route::Workspace => {
                if self.login_page.take().is_some() {
                    // A sign-in just completed on this run
                    self.data_shared.capture_session();
                    self.open_post_login_page();
                }
                self.ui_active_pages_panel(ctx);
                for page in self.active_pages.iter_mut() {
                    page.display_page(ctx, &mut self.data_shared);
                }
            }
        }
    }

    /// Every sign-in lands on the same page no matter how it started
    fn open_post_login_page(&mut self) {
        debug_assert_eq!(UiProfile::title_base(), CLIENT_POST_LOGIN_PAGE);
        let base_title = UiProfile::title_base();
        for page in self.active_pages.iter_mut() {
            if page.title_base() == base_title {
                page.open_page();
                return;
            }
        }
        self.active_pages
            .push(UiPage::new_page_with_unique_number::<UiProfile>(0));
    }

    fn logout(&mut self) {
        self.data_shared.client.logout();
        self.data_shared.saved_session = None;
        self.data_shared.oauth = OauthSignIn::default();

        // Convert pages to json and back to remove state that should only stay when
        // logged in
        let pages =
            serde_json::to_string(&self.active_pages).expect("failed to parse pages to json");
        self.active_pages =
            serde_json::from_str(&pages).expect("failed to convert back into pages from json");
    }

    fn ui_menu_page_btn<T: DisplayablePage>(&mut self, ui: &mut egui::Ui) {
        let base_title = T::title_base();
        if ui.button(base_title).clicked() {
            let mut max_id_found = None;
            for page in self.active_pages.iter_mut() {
                if page.title_base() == base_title {
                    max_id_found = max_id_found.max(Some(page.page_unique_number()))
                }
            }
            let new_num = if let Some(val) = max_id_found {
                val + 1
            } else {
                0
            };
            self.active_pages
                .push(UiPage::new_page_with_unique_number::<T>(new_num));
            ui.close_menu();
        }
    }

    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn ui_menu_file(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("File", |ui| {
            // On the web the browser controls the zoom
            #[cfg(not(target_arch = "wasm32"))]
            {
                egui::gui_zoom::zoom_menu_buttons(ui);
                ui.weak(format!(
                    "Current zoom: {:.0}%",
                    100.0 * ui.ctx().zoom_factor()
                ))
                .on_hover_text("The UI zoom level, on top of the operating system's default value");
                ui.separator();
            }

            if ui.button("Logout").clicked() {
                self.logout();
                ui.close_menu();
            }

            #[cfg(not(target_arch = "wasm32"))] // no File->Quit on web pages!
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn ui_active_pages_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("side_panel")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Active Pages");
                });

                ui.separator();

                self.ui_pages_list(ui);
            });
    }

    fn ui_pages_list(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical().show(ui, |ui| {
            ui.with_layout(egui::Layout::top_down_justified(egui::Align::LEFT), |ui| {
                if self.active_pages.is_empty() {
                    ui.label("NO PAGES ARE ACTIVE.\nUse top menu to activate a page");
                }
                let mut to_deactivate = Vec::new();
                for (i, page) in self.active_pages.iter_mut().enumerate() {
                    let mut is_open = page.is_page_open();
                    ui.horizontal(|ui| {
                        let is_open_before = is_open;
                        if ui.button("x").clicked() {
                            to_deactivate.push(i); // Mark page for removal
                        }
                        if ui.toggle_value(&mut is_open, page.title()).middle_clicked() {
                            to_deactivate.push(i); // Mark page for removal
                        };
                        if is_open != is_open_before {
                            if is_open {
                                page.open_page();
                            } else {
                                page.close_page();
                            }
                        }
                    });
                }

                // Deactivate marked pages
                to_deactivate.sort_unstable(); // Should already be sorted but put here because it is assumed in following loop
                while let Some(marked_index) = to_deactivate.pop() {
                    self.active_pages.remove(marked_index);
                }

                ui.separator();

                if ui.button("Open All Pages").clicked() {
                    self.open_all_pages();
                }
                if ui.button("Close All Pages").clicked() {
                    self.close_all_pages();
                }
                if ui.button("Deactivate All Pages").clicked() {
                    self.deactivate_all_pages();
                }
                if ui.button("Sort Pages by Name").clicked() {
                    self.sort_pages_by_name();
                }
            });
        });
    }

    fn deactivate_all_pages(&mut self) {
        self.active_pages.clear();
    }

    fn close_all_pages(&mut self) {
        self.active_pages
            .iter_mut()
            .for_each(|page| page.close_page())
    }

    fn open_all_pages(&mut self) {
        self.active_pages
            .iter_mut()
            .for_each(|page| page.open_page())
    }

    fn sort_pages_by_name(&mut self) {
        self.active_pages.sort_by_key(|x| x.title());
    }
}

#[inline]
pub fn wake_fn(ctx: egui::Context) -> impl UiCallBack {
    move || ctx.request_repaint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_routes_to_login() {
        assert_eq!(route_for(false), Route::Login);
        assert_eq!(route_for(true), Route::Workspace);
    }

    #[test]
    fn post_login_page_exists_in_the_page_set() {
        // The destination named in the config must stay in sync with an actual page
        assert_eq!(UiProfile::title_base(), CLIENT_POST_LOGIN_PAGE);
    }

    #[test]
    fn restored_session_keeps_its_metadata() {
        // Arrange
        let mut data_shared = DataShared::default();
        data_shared.saved_session = Some(SavedSession {
            token: "persisted".to_string(),
            email: "ada@example.com".to_string(),
            provider: Some(AuthProvider::Google),
        });

        // Act
        data_shared.restore_session();

        // Assert
        assert!(data_shared.is_signed_in());
        let session = data_shared
            .client
            .session()
            .expect("restore keeps the session record");
        assert_eq!(session.email.as_ref(), "ada@example.com");
        assert_eq!(session.provider, Some(AuthProvider::Google));
    }

    #[test]
    fn capture_mirrors_the_live_session() {
        // Arrange
        let mut data_shared = DataShared::default();
        data_shared.client.complete_sign_in(
            SecretString::from("fresh"),
            "ada@example.com".try_into().expect("valid email"),
            None,
        );

        // Act
        data_shared.capture_session();

        // Assert
        let saved = data_shared.saved_session.expect("session should persist");
        assert_eq!(saved.token, "fresh");
        assert_eq!(saved.email, "ada@example.com");
        assert_eq!(saved.provider, None);
    }

    #[test]
    fn corrupt_saved_email_discards_the_whole_session() {
        // Arrange
        let mut data_shared = DataShared::default();
        data_shared.saved_session = Some(SavedSession {
            token: "persisted".to_string(),
            email: "not-an-email".to_string(),
            provider: None,
        });

        // Act
        data_shared.restore_session();

        // Assert - falls back to the login page instead of a half-restored state
        assert!(!data_shared.is_signed_in());
        assert!(data_shared.saved_session.is_none());
    }
}
