//! HTTP adapter over [`AccountService`].
//!
//! A single `/account` resource: `PUT` opens, `POST` deposits (negative amounts
//! withdraw), `DELETE` closes, `GET` reads the balance. Every success body is
//! `{"amount": n}` and every failure body is `{"error": "..."}`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::put,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::{AccountRepository, Error};
use crate::service::AccountService;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Account(#[from] Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Account(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Account(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmountResponse {
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct OpenParams {
    #[serde(rename = "initialAmount", alias = "InitialAmount", alias = "initial_amount")]
    pub initial_amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct DepositParams {
    #[serde(alias = "Amount")]
    pub amount: i64,
}

pub type Result<T> = std::result::Result<T, ApiError>;

pub fn router<R>(service: Arc<AccountService<R>>) -> Router
where
    R: AccountRepository + Send + 'static,
{
    Router::new()
        .route(
            "/account",
            put(open::<R>)
                .post(deposit::<R>)
                .delete(close::<R>)
                .get(balance::<R>),
        )
        .with_state(service)
}

async fn open<R>(
    State(service): State<Arc<AccountService<R>>>,
    params: std::result::Result<Json<OpenParams>, JsonRejection>,
) -> Result<Json<AmountResponse>>
where
    R: AccountRepository + Send + 'static,
{
    let Json(params) = params?;
    run_blocking(service, move |s| s.open(params.initial_amount)).await
}

async fn deposit<R>(
    State(service): State<Arc<AccountService<R>>>,
    params: std::result::Result<Json<DepositParams>, JsonRejection>,
) -> Result<Json<AmountResponse>>
where
    R: AccountRepository + Send + 'static,
{
    let Json(params) = params?;
    run_blocking(service, move |s| s.deposit(params.amount)).await
}

async fn close<R>(State(service): State<Arc<AccountService<R>>>) -> Result<Json<AmountResponse>>
where
    R: AccountRepository + Send + 'static,
{
    run_blocking(service, |s| s.close()).await
}

async fn balance<R>(State(service): State<Arc<AccountService<R>>>) -> Result<Json<AmountResponse>>
where
    R: AccountRepository + Send + 'static,
{
    run_blocking(service, |s| s.balance()).await
}

/// Persistence is synchronous file I/O, so keep it off the async workers.
async fn run_blocking<R, F>(
    service: Arc<AccountService<R>>,
    operation: F,
) -> Result<Json<AmountResponse>>
where
    R: AccountRepository + Send + 'static,
    F: FnOnce(&AccountService<R>) -> std::result::Result<i64, Error> + Send + 'static,
{
    let amount = tokio::task::spawn_blocking(move || operation(service.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(AmountResponse { amount }))
}
