use super::{
    data_state::{AwaitingType, DataState},
    DisplayablePage,
};
use crate::{
    app::wake_fn,
    displayable_page_common,
    ui_helpers::{format_financial, get_text_height},
};
use egui::Button;
use egui_extras::{Column, TableBuilder};
use fintrack_client_core::ProfileBundle;
use fintrack_shared::{
    company::{Cik, CompanyCatalog, SavedCompany, TrackOutcome},
    errors::ApiResult,
    internal_error,
    user::UserProfile,
};
use futures::channel::oneshot;

/// The landing page after sign-in. Shows who is signed in and the tracked
/// companies with their latest financials, and is where tracking is changed.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiProfile {
    is_open: bool,
    page_unique_number: usize,
    #[serde(skip)]
    should_refresh: bool,
    #[serde(skip)]
    data_state: DataState<ProfileBundle>,
    #[serde(skip)]
    mutation: MutationState,
    #[serde(skip)]
    search_text: String,
    #[serde(skip)]
    selected_ciks: Vec<Cik>,
}

#[derive(Debug, Default)]
enum MutationState {
    #[default]
    Idle,
    AwaitingUntrack(oneshot::Receiver<ApiResult<()>>),
    AwaitingTrack(oneshot::Receiver<ApiResult<TrackOutcome>>),
    /// Mutation settled but left something the user should see
    Notice(String),
    Failed(String),
}

impl MutationState {
    fn is_in_flight(&self) -> bool {
        matches!(self, Self::AwaitingUntrack(_) | Self::AwaitingTrack(_))
    }
}

impl DisplayablePage for UiProfile {
    displayable_page_common!("Profile");

    fn reset_to_default(&mut self, _: super::private::Token) {
        self.should_refresh = Default::default();
        self.data_state = Default::default();
        self.mutation = Default::default();
        self.search_text = Default::default();
        self.selected_ciks = Default::default();
    }

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        if self.should_refresh {
            // Refetch instead of patching locally, the backend is the
            // authority on what a mutation actually changed
            self.should_refresh = false;
            self.data_state = Default::default();
            self.selected_ciks.clear();
        }
        self.poll_mutation(ui);
        if let DataState::Present(bundle) = &mut self.data_state {
            ui_profile_header(ui, &bundle.profile);
            if ui.button("Refresh Page").clicked() {
                self.should_refresh = true;
                return;
            }
            ui.separator();

            ui.heading("Tracked companies");
            let is_mutating = self.mutation.is_in_flight();
            if let Some(cik) = ui_saved_companies(ui, &bundle.saved, &bundle.catalog, is_mutating)
            {
                // Remove locally right away, the refetch confirms it
                remove_company_locally(&mut bundle.saved, cik);
                let rx = data_shared
                    .client
                    .untrack_company(cik, wake_fn(ui.ctx().clone()));
                self.mutation = MutationState::AwaitingUntrack(rx);
            }

            ui.separator();
            ui.heading("Add companies");
            let add_clicked = ui_add_companies(
                ui,
                &bundle.catalog,
                &bundle.saved,
                &mut self.search_text,
                &mut self.selected_ciks,
                is_mutating,
            );
            if add_clicked {
                let rx = data_shared
                    .client
                    .track_companies(self.selected_ciks.clone(), wake_fn(ui.ctx().clone()));
                self.mutation = MutationState::AwaitingTrack(rx);
            }
        } else {
            let ctx = ui.ctx().clone();
            self.data_state.get(Some(ui), None, || {
                AwaitingType(data_shared.client.profile_bundle(wake_fn(ctx)))
            });
        }
    }
}

impl UiProfile {
    fn poll_mutation(&mut self, ui: &mut egui::Ui) {
        match &mut self.mutation {
            MutationState::Idle => {}
            MutationState::AwaitingUntrack(rx) => match rx.try_recv() {
                Ok(None) => {
                    ui.spinner();
                }
                Ok(Some(Ok(()))) => {
                    self.should_refresh = true;
                    self.mutation = MutationState::Idle;
                }
                Ok(Some(Err(e))) => {
                    // Also refetch, the optimistic removal may have been wrong
                    self.should_refresh = true;
                    self.mutation = MutationState::Failed(format!("Failed to remove: {e}"));
                }
                Err(e) => {
                    self.mutation = MutationState::Failed(internal_error!(e));
                }
            },
            MutationState::AwaitingTrack(rx) => match rx.try_recv() {
                Ok(None) => {
                    ui.spinner();
                }
                Ok(Some(Ok(outcome))) => {
                    self.should_refresh = true;
                    self.mutation = if outcome.skipped.is_empty() {
                        MutationState::Idle
                    } else {
                        MutationState::Notice(format!(
                            "{} compan{} already tracked",
                            outcome.skipped.len(),
                            if outcome.skipped.len() == 1 { "y was" } else { "ies were" }
                        ))
                    };
                }
                Ok(Some(Err(e))) => {
                    self.should_refresh = true;
                    self.mutation = MutationState::Failed(format!("Failed to add: {e}"));
                }
                Err(e) => {
                    self.mutation = MutationState::Failed(internal_error!(e));
                }
            },
            MutationState::Notice(msg) => {
                ui.label(msg.clone());
                if ui.button("Dismiss").clicked() {
                    self.mutation = MutationState::Idle;
                }
            }
            MutationState::Failed(e) => {
                ui.colored_label(ui.visuals().error_fg_color, e.clone());
                if ui.button("Dismiss").clicked() {
                    self.mutation = MutationState::Idle;
                }
            }
        }
    }
}

fn ui_profile_header(ui: &mut egui::Ui, profile: &UserProfile) {
    ui.heading(profile.username.as_ref());
    ui.label(&profile.email);
    if let Some(provider) = profile.provider {
        ui.weak(format!("Signed in via {provider}"));
    }
}

/// Shows the tracked companies and returns the key of a company whose Remove
/// button was clicked this frame
fn ui_saved_companies(
    ui: &mut egui::Ui,
    saved: &[SavedCompany],
    catalog: &CompanyCatalog,
    is_mutating: bool,
) -> Option<Cik> {
    if saved.is_empty() {
        ui.label("No companies tracked yet. Add some below.");
        return None;
    }

    let mut to_remove = None;
    let text_height = get_text_height(ui);
    let table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .min_scrolled_height(0.0);

    table
        .header(text_height, |mut header| {
            header.col(|ui| {
                ui.strong("Company");
            });
            header.col(|ui| {
                ui.strong("As of");
            });
            header.col(|ui| {
                ui.strong("Assets");
            });
            header.col(|ui| {
                ui.strong("Liabilities");
            });
            header.col(|ui| {
                ui.strong("Cash");
            });
            header.col(|ui| {
                ui.strong("Long Term Debt");
            });
            header.col(|ui| {
                ui.strong("");
            });
        })
        .body(|mut body| {
            for company in saved {
                body.row(text_height, |mut row| {
                    row.col(|ui| {
                        ui.label(catalog.display_label(company.cik));
                    });
                    row.col(|ui| {
                        ui.label(format!("{}-{:02}", company.year, company.month));
                    });
                    row.col(|ui| {
                        ui.label(format_financial(company.assets));
                    });
                    row.col(|ui| {
                        ui.label(format_financial(company.liabilities));
                    });
                    row.col(|ui| {
                        ui.label(format_financial(company.cash));
                    });
                    row.col(|ui| {
                        ui.label(format_financial(company.long_term_debt));
                    });
                    row.col(|ui| {
                        if ui
                            .add_enabled(!is_mutating, Button::new("Remove"))
                            .clicked()
                        {
                            to_remove = Some(company.cik);
                        }
                    });
                });
            }
        });
    to_remove
}

/// Search over the reference data with a checkbox per match. Returns true if
/// the track button was clicked this frame.
fn ui_add_companies(
    ui: &mut egui::Ui,
    catalog: &CompanyCatalog,
    saved: &[SavedCompany],
    search_text: &mut String,
    selected_ciks: &mut Vec<Cik>,
    is_mutating: bool,
) -> bool {
    ui.add(egui::TextEdit::singleline(search_text).hint_text("Search by ticker or name"));

    egui::ScrollArea::vertical()
        .max_height(200.0)
        .show(ui, |ui| {
            // Cap what is shown, a narrower search finds the rest
            for company in catalog.search(search_text).take(50) {
                if saved.iter().any(|s| s.cik == company.cik) {
                    continue; // Already tracked
                }
                let mut is_selected = selected_ciks.contains(&company.cik);
                let label = format!("{} ({})", company.name, company.ticker);
                if ui.checkbox(&mut is_selected, label).changed() {
                    if is_selected {
                        selected_ciks.push(company.cik);
                    } else {
                        selected_ciks.retain(|&cik| cik != company.cik);
                    }
                }
            }
        });

    ui.add_enabled(
        !selected_ciks.is_empty() && !is_mutating,
        Button::new(format!("Track selected ({})", selected_ciks.len())),
    )
    .clicked()
}

fn remove_company_locally(saved: &mut Vec<SavedCompany>, cik: Cik) {
    saved.retain(|company| company.cik != cik);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(cik: u32) -> SavedCompany {
        SavedCompany {
            cik: cik.into(),
            year: 2024,
            month: 9,
            accounts_payable: None,
            assets: Some(1.0),
            liabilities: None,
            cash: None,
            accounts_receivable: None,
            inventory: None,
            long_term_debt: None,
        }
    }

    #[test]
    fn local_removal_only_touches_the_requested_company() {
        // Arrange
        let mut list = vec![saved(1), saved(2), saved(3)];

        // Act
        remove_company_locally(&mut list, 2.into());

        // Assert
        assert_eq!(
            list.iter().map(|c| c.cik).collect::<Vec<_>>(),
            vec![1.into(), 3.into()]
        );

        // Act - removing again is a no-op
        remove_company_locally(&mut list, 2.into());

        // Assert
        assert_eq!(list.len(), 2);
    }
}
