//! Canned analysis queries with per-query column sets

use fintrack_shared::{const_config::queries::CuratedQuery, errors::ApiResult};
use futures::channel::oneshot;

use crate::client::UiCallBack;
use crate::Client;

/// One result row. Keys double as column headers and iterate in sorted order
/// so every row renders its columns consistently.
pub type QueryRow = serde_json::Map<String, serde_json::Value>;

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn run_query<F>(
        &self,
        query: &CuratedQuery,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<Vec<QueryRow>>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_json(query.spec.clone(), &crate::DUMMY_ARGUMENT, ui_notify)
    }
}
