//! 路由模块

use axum::{
    routing::{get, post},
    Router,
};
use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/is_ready", get(handlers::is_ready))
        .route("/fetchAll", post(handlers::fetch_all))
        .route("/insert", post(handlers::insert))
        .route("/execute", post(handlers::execute))
        .route("/fetchScalar", post(handlers::fetch_scalar))
}
