use analytics::ReportError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ingest::IngestError;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidParams(msg) => {
                warn!(error = msg, "invalid request parameters");
                ErrorMessage::from((StatusCode::BAD_REQUEST, msg)).into_response()
            }
            ApiError::Report(ReportError::Policy(e)) => {
                warn!(error = %e, "invalid report policy");
                ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())).into_response()
            }
            ApiError::Report(ReportError::Snapshot(e)) => {
                // a dangling reference got past ingestion; data bug
                warn!(error = %e, "snapshot integrity error");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, "internal server error"))
                    .into_response()
            }
            ApiError::Ingest(e) => {
                warn!(error = %e, "reference data reload failed");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
                    .into_response()
            }
        }
    }
}

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

impl From<(StatusCode, String)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, String)) -> Self {
        Self {
            status_code,
            message,
        }
    }
}

impl From<(StatusCode, &str)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, &str)) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
