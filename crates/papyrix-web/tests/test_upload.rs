//! Upload endpoint tests against a stub generator.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use papyrix_model::{GenerationParams, Result as ModelResult, TextGenerator};
use papyrix_web::router::build_router;
use papyrix_web::state::AppState;

/// Deterministic stand-in for the T5 model.
struct StubGenerator;

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> ModelResult<String> {
        if prompt.starts_with("summarize:") {
            Ok("Glaciers retreat while oceans warm steadily.".to_string())
        } else {
            Ok("Ice loss accelerates sea level rise.".to_string())
        }
    }

    fn model_id(&self) -> &str {
        "stub"
    }
}

fn test_app() -> Router {
    build_router(AppState::new(Arc::new(StubGenerator)))
}

/// Minimal one-page PDF with the given text.
fn build_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

const BOUNDARY: &str = "papyrix-test-boundary";

/// Hand-rolled multipart/form-data body.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_upload(app: Router, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn missing_pdf_field_returns_400_with_exact_body() {
    let body = multipart_body(&[("question", None, b"what happened?")]);
    let (status, json) = post_upload(test_app(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({ "error": "No PDF file provided" }));
}

#[tokio::test]
async fn upload_without_question_has_null_answer() {
    let pdf = build_pdf("Climate report body text");
    let body = multipart_body(&[("pdf", Some("report.pdf"), &pdf)]);
    let (status, json) = post_upload(test_app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["summary"],
        "Glaciers retreat while oceans warm steadily."
    );
    assert!(json["answer"].is_null());

    let questions = json["suggested_questions"].as_array().unwrap();
    assert!(!questions.is_empty());
    assert_eq!(
        questions[0],
        "What is the main idea of glaciers?"
    );
}

#[tokio::test]
async fn upload_with_question_returns_answer() {
    let pdf = build_pdf("Climate report body text");
    let body = multipart_body(&[
        ("pdf", Some("report.pdf"), &pdf),
        ("question", None, b"What about sea levels?"),
    ]);
    let (status, json) = post_upload(test_app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["answer"], "Ice loss accelerates sea level rise.");
}

#[tokio::test]
async fn whitespace_question_is_treated_as_absent() {
    let pdf = build_pdf("Climate report body text");
    let body = multipart_body(&[
        ("pdf", Some("report.pdf"), &pdf),
        ("question", None, b"   "),
    ]);
    let (status, json) = post_upload(test_app(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["answer"].is_null());
}

#[tokio::test]
async fn invalid_pdf_returns_500_error_body() {
    let body = multipart_body(&[("pdf", Some("bad.pdf"), b"not a pdf at all")]);
    let (status, json) = post_upload(test_app(), body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn identical_requests_give_identical_responses() {
    let pdf = build_pdf("Climate report body text");
    let parts: &[(&str, Option<&str>, &[u8])] = &[
        ("pdf", Some("report.pdf"), &pdf),
        ("question", None, b"What about sea levels?"),
    ];

    let (status_a, json_a) = post_upload(test_app(), multipart_body(parts)).await;
    let (status_b, json_b) = post_upload(test_app(), multipart_body(parts)).await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_a, status_b);
    assert_eq!(json_a, json_b);
}
