use super::{
    data_state::{AwaitingType, DataState},
    DisplayablePage,
};
use crate::{app::wake_fn, displayable_page_common, ui_helpers::get_text_height};
use egui::Button;
use egui_extras::{Column, TableBuilder};
use fintrack_client_core::QueryRow;
use fintrack_shared::const_config::queries::{CuratedQuery, CURATED_QUERIES};

/// Carousel over the canned analysis queries the backend exposes. One query
/// is shown at a time and only runs when asked to.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiQueries {
    is_open: bool,
    page_unique_number: usize,
    #[serde(skip)]
    selected: usize,
    #[serde(skip)]
    results: DataState<Vec<QueryRow>>,
}

impl DisplayablePage for UiQueries {
    displayable_page_common!("Queries");

    fn reset_to_default(&mut self, _: super::private::Token) {
        self.selected = Default::default();
        self.results = Default::default();
    }

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        let query = &CURATED_QUERIES[self.selected];
        self.ui_carousel_header(ui, query);
        ui.separator();

        match &mut self.results {
            DataState::None => {
                if ui.button("Run query").clicked() {
                    let rx = data_shared
                        .client
                        .run_query(query, wake_fn(ui.ctx().clone()));
                    self.results = DataState::AwaitingResponse(AwaitingType(rx));
                }
            }
            DataState::AwaitingResponse(rx) => {
                if let Some(new_state) = DataState::await_data(Some(ui), rx) {
                    self.results = new_state;
                }
            }
            DataState::Present(rows) => {
                ui_query_results(ui, rows);
                if ui.button("Run again").clicked() {
                    self.results = Default::default();
                }
            }
            DataState::Failed(e) => {
                ui.colored_label(ui.visuals().error_fg_color, format!("Query failed: {e}"));
                if ui.button("Retry").clicked() {
                    self.results = Default::default();
                }
            }
        }
    }
}

impl UiQueries {
    fn ui_carousel_header(&mut self, ui: &mut egui::Ui, query: &CuratedQuery) {
        ui.horizontal(|ui| {
            if ui.add(Button::new("\u{2B05}")).clicked() {
                self.selected = prev_index(self.selected, CURATED_QUERIES.len());
                self.results = Default::default(); // Results belong to one query
            }
            ui.vertical_centered(|ui| {
                ui.heading(query.title);
            });
            if ui.add(Button::new("\u{27A1}")).clicked() {
                self.selected = next_index(self.selected, CURATED_QUERIES.len());
                self.results = Default::default();
            }
        });
        ui.label(query.description);
        ui.weak(format!(
            "{} of {}",
            self.selected + 1,
            CURATED_QUERIES.len()
        ));
    }
}

fn ui_query_results(ui: &mut egui::Ui, rows: &[QueryRow]) {
    let Some(first_row) = rows.first() else {
        ui.label("The query returned no rows");
        return;
    };
    // Keys iterate in sorted order so the header line and every row agree
    let column_names: Vec<&String> = first_row.keys().collect();

    let text_height = get_text_height(ui);
    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::LEFT))
        .min_scrolled_height(0.0);
    for _ in 0..column_names.len() {
        table = table.column(Column::auto());
    }

    table
        .header(text_height, |mut header| {
            for name in &column_names {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|mut body| {
            for row_data in rows {
                body.row(text_height, |mut row| {
                    for name in &column_names {
                        row.col(|ui| {
                            ui.label(render_value(row_data.get(*name)));
                        });
                    }
                });
            }
        });
}

fn render_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

fn prev_index(current: usize, len: usize) -> usize {
    (current + len - 1) % len
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::forward_wraps(3, 4, 0)]
    #[case::forward_normal(1, 4, 2)]
    fn next_wraps_around(#[case] current: usize, #[case] len: usize, #[case] expect: usize) {
        assert_eq!(next_index(current, len), expect);
    }

    #[rstest]
    #[case::backward_wraps(0, 4, 3)]
    #[case::backward_normal(2, 4, 1)]
    fn prev_wraps_around(#[case] current: usize, #[case] len: usize, #[case] expect: usize) {
        assert_eq!(prev_index(current, len), expect);
    }

    #[test]
    fn values_render_for_display() {
        assert_eq!(render_value(None), "-");
        assert_eq!(render_value(Some(&serde_json::Value::Null)), "-");
        assert_eq!(render_value(Some(&serde_json::json!("AAPL"))), "AAPL");
        assert_eq!(render_value(Some(&serde_json::json!(0.42))), "0.42");
    }
}
