//! Profile data and the tracked-company mutations

use anyhow::anyhow;
use fintrack_shared::{
    company::{AvailableCompany, Cik, CompanyCatalog, SavedCompany, TrackOutcome},
    const_config::path::{
        PATH_API_STOCKS, PATH_USERS_COMPANIES_DATA, PATH_USERS_COMPANIES_TRACK,
        PATH_USERS_COMPANIES_UNTRACK, PATH_USERS_PROFILE,
    },
    errors::{ApiError, ApiResult},
    req_args::{TrackCompaniesReqArgs, UntrackCompanyReqArgs},
    user::UserProfile,
};
use futures::channel::oneshot;

use crate::client::{process_json_body, send_to_ui, UiCallBack, DUMMY_ARGUMENT};
use crate::Client;

/// Everything the profile page needs, fetched as one logical unit so the page
/// either has a complete view or a single error to show
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBundle {
    pub profile: UserProfile,
    pub saved: Vec<SavedCompany>,
    pub catalog: CompanyCatalog,
}

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn get_profile<F>(&self, ui_notify: F) -> oneshot::Receiver<ApiResult<UserProfile>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_json(PATH_USERS_PROFILE, &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn saved_companies<F>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<Vec<SavedCompany>>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_json(PATH_USERS_COMPANIES_DATA, &DUMMY_ARGUMENT, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn available_companies<F>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<Vec<AvailableCompany>>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_json(PATH_API_STOCKS, &DUMMY_ARGUMENT, ui_notify)
    }

    /// Fetches the profile, the tracked companies and the reference data
    /// concurrently and resolves once all three are in. Any failure fails the
    /// whole bundle, the page retries it as one unit.
    #[tracing::instrument(skip(ui_notify))]
    pub fn profile_bundle<F>(&self, ui_notify: F) -> oneshot::Receiver<ApiResult<ProfileBundle>>
    where
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let profile_rx = self.get_profile(|| {});
        let saved_rx = self.saved_companies(|| {});
        let token_store = self.token_store.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let available = process_json_body::<Vec<AvailableCompany>>(resp, token_store).await;
            let msg = join_bundle(profile_rx, saved_rx, available).await;
            send_to_ui(tx, msg);
            ui_notify();
        };
        self.initiate_request(PATH_API_STOCKS, &DUMMY_ARGUMENT, on_done);
        rx
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn track_companies<F>(
        &self,
        ciks: Vec<Cik>,
        ui_notify: F,
    ) -> oneshot::Receiver<ApiResult<TrackOutcome>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_json(
            PATH_USERS_COMPANIES_TRACK,
            &TrackCompaniesReqArgs { ciks },
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn untrack_company<F>(&self, cik: Cik, ui_notify: F) -> oneshot::Receiver<ApiResult<()>>
    where
        F: UiCallBack,
    {
        self.send_request_expect_empty(
            PATH_USERS_COMPANIES_UNTRACK,
            &UntrackCompanyReqArgs { cik },
            ui_notify,
        )
    }
}

async fn join_bundle(
    profile_rx: oneshot::Receiver<ApiResult<UserProfile>>,
    saved_rx: oneshot::Receiver<ApiResult<Vec<SavedCompany>>>,
    available: ApiResult<Vec<AvailableCompany>>,
) -> ApiResult<ProfileBundle> {
    let profile = recv(profile_rx).await?;
    let saved = recv(saved_rx).await?;
    let catalog = CompanyCatalog::new(available?);
    Ok(ProfileBundle {
        profile,
        saved,
        catalog,
    })
}

async fn recv<T>(rx: oneshot::Receiver<ApiResult<T>>) -> ApiResult<T> {
    match rx.await {
        Ok(result) => result,
        Err(oneshot::Canceled) => Err(ApiError::Unexpected(anyhow!(
            "request dropped before completing"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use fintrack_shared::company::Ticker;
    use futures::executor::block_on;

    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            id: 7.into(),
            username: "ada".try_into().unwrap(),
            email: "ada@example.com".try_into().unwrap(),
            provider: None,
        }
    }

    fn sample_available() -> Vec<AvailableCompany> {
        vec![AvailableCompany {
            ticker: Ticker::try_from("AAPL".to_string()).unwrap(),
            cik: 320193.into(),
            name: "Apple Inc.".to_string(),
        }]
    }

    #[test]
    fn bundle_resolves_once_all_three_parts_are_in() {
        // Arrange
        let (profile_tx, profile_rx) = oneshot::channel();
        let (saved_tx, saved_rx) = oneshot::channel();
        profile_tx.send(Ok(sample_profile())).unwrap();
        saved_tx.send(Ok(Vec::new())).unwrap();

        // Act
        let actual = block_on(join_bundle(profile_rx, saved_rx, Ok(sample_available())));

        // Assert
        let bundle = actual.unwrap();
        assert_eq!(bundle.profile, sample_profile());
        assert!(bundle.saved.is_empty());
        assert_eq!(bundle.catalog.name_of(320193.into()), Some("Apple Inc."));
    }

    #[test]
    fn any_failed_part_fails_the_whole_bundle() {
        // Arrange
        let (profile_tx, profile_rx) = oneshot::channel();
        let (saved_tx, saved_rx) = oneshot::channel();
        profile_tx.send(Ok(sample_profile())).unwrap();
        saved_tx
            .send(Err(ApiError::NotFound("no companies".to_string())))
            .unwrap();

        // Act
        let actual = block_on(join_bundle(profile_rx, saved_rx, Ok(sample_available())));

        // Assert
        assert!(actual.unwrap_err().is_not_found());
    }

    #[test]
    fn a_dropped_part_fails_the_whole_bundle() {
        // Arrange
        let (profile_tx, profile_rx) = oneshot::channel::<ApiResult<UserProfile>>();
        let (_saved_tx, saved_rx) = oneshot::channel();
        drop(profile_tx);

        // Act
        let actual = block_on(join_bundle(profile_rx, saved_rx, Ok(sample_available())));

        // Assert
        assert!(matches!(actual.unwrap_err(), ApiError::Unexpected(_)));
    }
}
