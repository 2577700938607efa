use shipping_calc::api::{self, ApiState};
use shipping_calc::catalog::Catalog;
use shipping_calc::config::AppConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            warn!("Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    let catalog = match Catalog::load(app_config.catalog.path()) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Could not load catalog: {err}");
            std::process::exit(1);
        }
    };
    info!(
        pallets = catalog.pallet_sizes.len(),
        locations = catalog.locations.len(),
        "Shipping calculator starting..."
    );

    let state = ApiState::new(
        catalog,
        app_config.engine.engine_config(),
        app_config.catalog.default_use_pallet(),
    );

    if let Err(err) = api::start_api_server(&app_config.api, state).await {
        error!("API server terminated with an error: {err}");
        std::process::exit(1);
    }
}
