use axum::{response::IntoResponse, Json};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct PingResponse {
    status: &'static str,
}

pub async fn ping() -> impl IntoResponse {
    Json(PingResponse { status: "ok" })
}
