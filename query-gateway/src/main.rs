//! HTTP 到 SQL 的查询网关
//!
//! 为集成测试工具提供基于 HTTP 的临时 SQL 访问：
//! - 接收 `{query, params}` JSON 请求
//! - 通过连接池执行参数化语句
//! - 按端点语义整理结果（结果行、自增 ID、影响行数、标量）

mod decode;
mod executor;
mod handlers;
mod routes;
mod service;
mod shape;
mod state;

use axum::{middleware, routing::get, Json, Router};
use common::config::AppConfig;
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "query-gateway";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "查询网关 API",
        version = "0.1.0",
        description = "HTTP 到 SQL 的查询网关"
    ),
    paths(
        handlers::is_ready,
        handlers::fetch_all,
        handlers::insert,
        handlers::execute,
        handlers::fetch_scalar,
    ),
    components(schemas(
        common::models::QueryRequest,
        common::response::ErrorBody,
        common::response::ReadyBody,
        common::response::ResultHeaderBody,
        common::response::InsertIdBody,
        common::response::AffectedRowsBody,
        common::response::ScalarBody,
        common::response::MessageBody,
    )),
    tags(
        (name = "query", description = "查询执行端点"),
        (name = "health", description = "就绪探针")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);

    // 创建应用状态（连接池延迟建立连接）
    let state = AppState::new(&config);
    info!(database = %config.database.display_target(), "连接池已创建");

    let app = create_router(state.clone());

    // 启动服务
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    state.mark_ready();
    info!(service = %config.service, address = %addr, "启动服务");

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
