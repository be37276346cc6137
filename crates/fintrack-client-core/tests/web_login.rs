//! IMPORTANT!!!
//! A backend must be started up on localhost separately (Will not work in CI).
//! Only intended for local testing. Expects a database seeded with the test
//! user below. Then from the folder "crates/fintrack-client-core" run one of
//! the following to execute the tests
//! - `wasm-pack test --headless --firefox`
//! - `wasm-pack test --headless --chrome`
use fintrack_client_core::Client;
use fintrack_shared::req_args::LoginReqArgs;
use wasm_bindgen_test::wasm_bindgen_test;
use wasm_bindgen_test::wasm_bindgen_test_configure;

wasm_bindgen_test_configure!(run_in_browser);
fn main() {
    #[wasm_bindgen_test]
    async fn login_round_trip() {
        // Arrange
        // ASSUMING SERVER HAS BEEN STARTED (See module docs comment)
        let client = Client::default();
        let login_args = LoginReqArgs::new("seed_user@example.com", "f".to_string().into());

        // Assert - Ensure not signed in
        assert!(
            !client.is_signed_in(),
            "should not be signed in before logging in"
        );

        // Act - Login
        let login_outcome = client.login(login_args.clone(), no_cb).await.unwrap();

        // Assert - Login successful and credential stored
        login_outcome
            .expect("IMPORTANT!!! ensure server is started properly see module doc comment");
        assert!(client.is_signed_in());
        assert_eq!(
            client.session().unwrap().email.as_ref(),
            login_args.email.as_str()
        );

        // Act - Fetch the profile with the fresh credential
        let profile = client
            .get_profile(no_cb)
            .await
            .unwrap()
            .expect("profile fetch should succeed right after signing in");

        // Assert - The backend agrees on who is signed in
        assert_eq!(profile.email.as_ref(), login_args.email.as_str());
    }
}

#[allow(dead_code)]
fn no_cb() {}
