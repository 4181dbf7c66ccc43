use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use dashboard::{map_view, MapView, Session};
use osrm::OsrmClient;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct WebState {
    pub session: Arc<RwLock<Session<OsrmClient>>>,
}

pub async fn start_web_server(bind_addr: &str, state: WebState) -> std::io::Result<()> {
    let routes = Router::new().nest("/api/v1", api_routes(state));

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn api_routes(state: WebState) -> Router {
    Router::new()
        .route("/map", get(get_map))
        .route("/refresh", post(refresh))
        .with_state(state)
}

async fn get_map(State(state): State<WebState>) -> Json<MapView> {
    let session = state.session.read().await;
    Json(map_view(&session))
}

/// The manual refresh trigger. The advance runs behind the write lock, so
/// map readers never observe a half-updated set of bus positions.
async fn refresh(State(state): State<WebState>) -> Json<MapView> {
    let mut session = state.session.write().await;
    session.refresh();
    Json(map_view(&session))
}
