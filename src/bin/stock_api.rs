use actix_web::server;
use log::info;
use std::env;

use quote_weather_service::settings::{Settings, DEFAULT_CONFIG_PATH};
use quote_weather_service::web::{self, StockState};

fn main() -> Result<(), failure::Error> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "quote_weather_service=info,actix_web=info");
    }

    env_logger::init();

    let config_path = env::var("SERVICE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let settings = Settings::load(&config_path)?;
    let bind = settings.stock_bind.clone();

    let sys = actix::System::new("stock-api");

    server::new(move || web::stock_app(StockState::from_settings(&settings)))
        .bind(&bind)?
        .start();

    info!("Stock API server running on {}", bind);
    sys.run();

    Ok(())
}
