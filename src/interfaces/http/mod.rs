//! HTTP API over a shared [`ReceiptProcessor`].
//!
//! - `POST /receipts/process` takes a receipt and answers `{"id": ...}`.
//! - `GET /receipts/{id}/points` answers `{"points": ...}`.

pub mod error;

use crate::application::processor::ReceiptProcessor;
use crate::domain::receipt::ReceiptId;
use crate::error::Result;
use crate::interfaces::json::receipt_reader::ReceiptReader;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use error::ApiError;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ProcessReceiptResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub points: i64,
}

pub fn router(processor: Arc<ReceiptProcessor>) -> Router {
    Router::new()
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/{id}/points", get(get_points))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(processor)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(processor: Arc<ReceiptProcessor>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(processor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

async fn process_receipt(
    State(processor): State<Arc<ReceiptProcessor>>,
    body: Bytes,
) -> std::result::Result<Json<ProcessReceiptResponse>, ApiError> {
    let receipt = ReceiptReader::new(body.as_ref()).receipt()?;
    let id = processor
        .process(receipt)
        .await
        .map_err(ApiError::processing)?;

    Ok(Json(ProcessReceiptResponse { id: id.to_string() }))
}

async fn get_points(
    State(processor): State<Arc<ReceiptProcessor>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<PointsResponse>, ApiError> {
    let points = processor.points(&ReceiptId::from(id)).await?;
    Ok(Json(PointsResponse { points }))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
