use axum::Router;

use crate::app::bootstrap::AppState;

pub mod admin;
pub mod chatroom;
pub mod information;
pub mod suggestions;
pub mod users;
pub mod ws;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(chatroom::router())
        .merge(admin::router())
        .merge(information::router())
        .merge(suggestions::router())
        .merge(ws::router())
}
