use ask_assistant::{App, config::AppConfig};
use dioxus::{logger::tracing::info, prelude::*};

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().unwrap();
    dioxus::logger::init(config.log_level).unwrap();
    info!("Asking {}", config.ask_endpoint().url);

    LaunchBuilder::new()
        .with_context(config)
        .launch(App)
}
