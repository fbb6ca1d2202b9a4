//! PDF upload endpoint: extraction → summarization → question suggestion →
//! optional answering, synchronously within the request.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use papyrix_ingestion::extract_from_bytes;
use papyrix_model::{answer_query, suggest_questions, summarize};

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub summary: String,
    pub suggested_questions: Vec<String>,
    /// Absent question field → null.
    pub answer: Option<String>,
}

pub enum ApiError {
    MissingPdf,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingPdf => {
                (StatusCode::BAD_REQUEST, "No PDF file provided".to_string())
            }
            ApiError::Internal(message) => {
                warn!("Upload failed: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn upload_pdf(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut question: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("pdf") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Internal(e.to_string()))?;
                pdf_bytes = Some(bytes.to_vec());
            }
            Some("question") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Internal(e.to_string()))?;
                question = Some(text).filter(|q| !q.trim().is_empty());
            }
            _ => {}
        }
    }

    let pdf_bytes = pdf_bytes.ok_or(ApiError::MissingPdf)?;
    info!(
        pdf_bytes = pdf_bytes.len(),
        has_question = question.is_some(),
        "Processing upload"
    );

    let extracted =
        extract_from_bytes(&pdf_bytes).map_err(|e| ApiError::Internal(e.to_string()))?;

    let summary = summarize(state.generator.as_ref(), &extracted.full_text)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let suggested_questions = suggest_questions(&summary);

    let answer = match &question {
        Some(q) => Some(
            answer_query(state.generator.as_ref(), &extracted.full_text, q)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
        None => None,
    };

    Ok(Json(UploadResponse { summary, suggested_questions, answer }))
}
