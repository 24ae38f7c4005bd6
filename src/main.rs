use crate::config::Config;
use crate::routes::{router, AppState};
use std::error::Error;

mod config;
mod data;
mod engine;
mod error;
mod news;
mod routes;
mod scorer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = serve().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let addr = config.listen_addr();
    let app = router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
