//! Handler模块

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};

use common::errors::AppError;
use common::models::QueryRequest;
use common::response::{
    AffectedRowsBody, ErrorBody, GatewayResponse, InsertIdBody, ReadyBody, ScalarBody,
};
use crate::shape::ShapePolicy;
use crate::state::{AppState, Lifecycle};

/// 就绪探针
#[utoipa::path(
    get,
    path = "/is_ready",
    tag = "health",
    responses(
        (status = 200, description = "监听器是否已绑定", body = ReadyBody)
    )
)]
pub async fn is_ready(State(state): State<AppState>) -> Json<ReadyBody> {
    Json(ReadyBody {
        ready: state.lifecycle() == Lifecycle::Ready,
    })
}

/// 返回完整结果集
#[utoipa::path(
    post,
    path = "/fetchAll",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "结果行数组（列名到值的对象）；写语句返回 ResultHeaderBody 形式的 affectedRows 与 insertId", body = Vec<serde_json::Value>),
        (status = 400, description = "请求体不是有效 JSON", body = ErrorBody),
        (status = 500, description = "执行失败", body = ErrorBody)
    )
)]
pub async fn fetch_all(
    State(state): State<AppState>,
    QueryBody(req): QueryBody,
) -> Result<Json<GatewayResponse>, AppError> {
    run(&state, req, ShapePolicy::RawRows).await
}

/// 执行插入并返回自增 ID
#[utoipa::path(
    post,
    path = "/insert",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "自增 ID，没有时为 0", body = InsertIdBody),
        (status = 400, description = "请求体不是有效 JSON", body = ErrorBody),
        (status = 500, description = "执行失败", body = ErrorBody)
    )
)]
pub async fn insert(
    State(state): State<AppState>,
    QueryBody(req): QueryBody,
) -> Result<Json<GatewayResponse>, AppError> {
    run(&state, req, ShapePolicy::InsertId).await
}

/// 执行任意语句
#[utoipa::path(
    post,
    path = "/execute",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "affectedRows、结果行或无数据提示", body = AffectedRowsBody),
        (status = 400, description = "缺少 query", body = ErrorBody),
        (status = 500, description = "执行失败", body = ErrorBody)
    )
)]
pub async fn execute(
    State(state): State<AppState>,
    QueryBody(req): QueryBody,
) -> Result<Json<GatewayResponse>, AppError> {
    run(&state, req, ShapePolicy::RowsOrMessage).await
}

/// 返回首行首列
#[utoipa::path(
    post,
    path = "/fetchScalar",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "标量值、affectedRows 或无数据提示", body = ScalarBody),
        (status = 400, description = "缺少 query", body = ErrorBody),
        (status = 500, description = "执行失败", body = ErrorBody)
    )
)]
pub async fn fetch_scalar(
    State(state): State<AppState>,
    QueryBody(req): QueryBody,
) -> Result<Json<GatewayResponse>, AppError> {
    run(&state, req, ShapePolicy::Scalar).await
}

async fn run(
    state: &AppState,
    req: QueryRequest,
    policy: ShapePolicy,
) -> Result<Json<GatewayResponse>, AppError> {
    let data = state.query_service.execute(req, policy).await?;
    Ok(Json(data))
}

/// Query request body. Empty or non-JSON bodies read as `{}`, so the
/// endpoint's own `query` check decides the outcome.
pub struct QueryBody(pub QueryRequest);

impl<S> FromRequest<S> for QueryBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = is_json_content(req.headers());
        let body = Bytes::from_request(req, state).await?;
        QueryRequest::from_body(is_json, &body).map(QueryBody)
    }
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
