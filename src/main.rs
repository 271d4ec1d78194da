use school_admin::api::ApiClient;
use school_admin::app::App;
use school_admin::app::state::APP_TITLE;
use school_admin::config::load_config;
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let (config, config_error) = load_config();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(err) = config_error {
        tracing::warn!(error = %err, "config file ignored, using defaults");
    }

    let api = match ApiClient::from_config(&config) {
        Ok(api) => api,
        Err(err) => {
            tracing::error!(error = %err, "cannot build http client");
            std::process::exit(1);
        }
    };
    tracing::info!(api = %api.base_url(), "starting");

    iced::application(APP_TITLE, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size(iced::Size::new(1200.0, 800.0))
        .run_with(move || App::new(config, api))
}
