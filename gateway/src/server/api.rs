//! REST API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_common::{HealthResponse, QueryEnvelope, ReportInfo, ReportRequest};
use serde_json::Value;

use super::state::AppState;
use crate::reports;

/// Envelope with a status code, for client-input and handler failures
fn failure(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<QueryEnvelope>) {
    (status, Json(QueryEnvelope::failure(msg)))
}

/// Execute a client query
///
/// A body that is not JSON or has no `sql` key is a 400. Anything else is
/// answered 200 and the envelope's `success` flag carries the outcome,
/// including an `sql` or `params` of the wrong type.
pub async fn execute_query(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<QueryEnvelope>) {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::warn!("Rejected query request body: {}", rejection.body_text());
            return failure(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    let Some(sql) = body.get("sql") else {
        return failure(StatusCode::BAD_REQUEST, "missing SQL statement");
    };

    let (sql, params) = match query_arguments(sql, body.get("params")) {
        Ok(args) => args,
        Err(msg) => {
            tracing::warn!("Rejected query request: {}", msg);
            return failure(StatusCode::OK, msg);
        }
    };

    let envelope = state.executor.execute_query(sql, &params).await;
    (StatusCode::OK, Json(envelope))
}

/// Statement text and positional parameters of a query body
fn query_arguments<'a>(
    sql: &'a Value,
    params: Option<&Value>,
) -> Result<(&'a str, Vec<Value>), String> {
    let Some(sql) = sql.as_str() else {
        return Err(format!("invalid SQL statement: expected a string, got {}", sql));
    };
    let params = match params {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(other) => return Err(format!("invalid params: expected an array, got {}", other)),
    };
    Ok((sql, params))
}

/// Describe the database schema
pub async fn get_schema(State(state): State<AppState>) -> Response {
    let envelope = state.schema.get_table_schema().await;
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(envelope)).into_response()
}

/// Health check endpoint - attempts a fresh connection
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.connections.connect().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                success: true,
                message: "service is running".to_string(),
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                success: false,
                message: "database connection failed".to_string(),
            }),
        )
    }
}

/// List the report catalogue
pub async fn list_reports() -> Json<Vec<ReportInfo>> {
    Json(reports::REPORTS.iter().map(|r| r.info()).collect())
}

/// Run a named report with positional parameters
pub async fn run_report(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> (StatusCode, Json<QueryEnvelope>) {
    let Some(report) = reports::find(&name) else {
        return failure(StatusCode::NOT_FOUND, format!("unknown report: {}", name));
    };

    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return failure(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    if req.params.len() != report.params.len() {
        return failure(
            StatusCode::BAD_REQUEST,
            format!(
                "report {} expects {} parameters ({}), got {}",
                report.name,
                report.params.len(),
                report.params.join(", "),
                req.params.len()
            ),
        );
    }

    let envelope = state.executor.execute_query(report.sql, &req.params).await;
    (StatusCode::OK, Json(envelope))
}

/// Response for a handler that panicked
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}
