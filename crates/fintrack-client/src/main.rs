#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use clap::Parser;
    let args = fintrack_client::cli::Cli::parse();

    if let Err(e) = fintrack_client::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let rt = fintrack_client::background_worker::create_runtime();
    let _enter = rt.enter(); // This Guard must be held to call `tokio::spawn` anywhere in the program
    fintrack_client::background_worker::park_runtime(rt); // Keeps the runtime alive for the whole run

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "FinTrack",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(fintrack_client::FinTrackApp::new(
                cc,
                args.server.clone(),
                None, // Provider callbacks only arrive in the web client
            )))
        }),
    )
}

// When compiling to web using trunk
#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;
    use fintrack_client::OauthCallback;
    use fintrack_client_core::OauthCallbackArgs;

    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(fintrack_client::wasm_log_level()).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window found")
            .document()
            .expect("No document found (No DOM)");

        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id was not a HtmlCanvasElement");

        let oauth_callback = oauth_callback_from_location();

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| {
                    Ok(Box::new(fintrack_client::FinTrackApp::new(
                        cc,
                        None,
                        oauth_callback,
                    )))
                }),
            )
            .await;

        // Remove the loading text and spinner:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p> The app has crashed. See the developer console for details. </p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });

    /// Parameters the provider round trip left in the page URL, if any
    fn oauth_callback_from_location() -> Option<OauthCallback> {
        let location = web_sys::window()?.location();
        let search = location.search().ok()?;
        if search.is_empty() {
            return None;
        }
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        if let Some(error) = params.get("error") {
            return Some(Err(error));
        }
        let provider = params.get("provider")?.parse().ok()?;
        let provider_account_id = params.get("account_id")?;
        Some(Ok(OauthCallbackArgs {
            provider,
            provider_account_id,
            email: params.get("email"),
            name: params.get("name"),
        }))
    }
}
