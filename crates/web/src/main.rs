use std::env;
use std::path::Path;
use std::sync::Arc;

use dashboard::{PositionSimulator, RouteResolver, Session};
use log::{info, warn};
use osrm::OsrmClient;
use tokio::sync::RwLock;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    // configuration
    let osrm_url =
        env::var("OSRM_URL").unwrap_or_else(|_| osrm::OSRM_PUBLIC_URL.to_owned());
    let routes_dir = env::var("ROUTES_DIR").unwrap_or_else(|_| "routes".to_owned());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    // stop lists; a bad route file only drops that route
    let (stop_sets, skipped) = dashboard::stops::load_stop_sets(Path::new(&routes_dir))
        .expect("could not read the routes directory.");
    if !skipped.is_empty() {
        warn!("Skipped {} route file(s).", skipped.len());
    }

    // route resolution and simulation
    let client = OsrmClient::new(&osrm_url).expect("could not build routing client.");
    let session = Session::start(
        RouteResolver::new(client),
        PositionSimulator::new(),
        &stop_sets,
    )
    .await;
    info!(
        "Resolved {} route(s) against '{}'.",
        session.routes().len(),
        osrm_url
    );

    // web server
    let state = WebState {
        session: Arc::new(RwLock::new(session)),
    };
    start_web_server(&bind_addr, state)
        .await
        .expect("web server failed.");
}
