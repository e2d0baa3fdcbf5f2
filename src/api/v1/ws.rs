use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::{instrument, warn};

use crate::{
    api::extract::ActingUser, app::bootstrap::AppState,
    infra::ws::connection::handle_connection_upgrade,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/chatroom/ws", get(ws_handler))
}

#[utoipa::path(
    get,
    path = "/api/v1/chatroom/ws",
    tag = "chatroom",
    responses(
        (status = 101, description = "Switching to the event stream"),
        (status = 401, description = "Missing or unknown X-User-Id"),
        (status = 403, description = "User is banned")
    )
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn ws_handler(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let registry = state.registry.clone();
    let user_id = user.id;
    ws.on_failed_upgrade(|err| warn!(error = %err, "websocket upgrade failed"))
        .on_upgrade(move |socket| handle_connection_upgrade(registry, user_id, socket))
}
