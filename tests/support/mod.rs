//! In-process mock of the CV-processing backend.
//!
//! Serves the same routes as the real service from a fixed listing. Each
//! backend runs on its own thread and runtime so both `#[tokio::test]`
//! tests and tests that spawn the `cvx` binary can use it.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    records: Vec<Value>,
    plain_text_listing: bool,
    uploads: Vec<String>,
}

type Shared = Arc<Mutex<Inner>>;

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Start a backend serving `records` on an ephemeral port.
    pub fn start(records: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(Inner {
            records,
            ..Inner::default()
        }));
        let app = router(state.clone());

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        let addr = rx.recv().unwrap();
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn set_records(&self, records: Vec<Value>) {
        self.state.lock().unwrap().records = records;
    }

    /// Make `/file/all` answer with a `text/plain` body.
    pub fn serve_plain_text_listing(&self) {
        self.state.lock().unwrap().plain_text_listing = true;
    }

    /// File names received by `/upload`.
    pub fn uploads(&self) -> Vec<String> {
        self.state.lock().unwrap().uploads.clone()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/file/all", get(list_all))
        .route("/file/filter/id/{id}", get(by_id))
        .route("/file/filter/date/{date}", get(by_date))
        .route("/upload", post(upload))
        .route("/download/{id}", get(download))
        .with_state(state)
}

fn no_files() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "No files found"})),
    )
        .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_all(State(state): State<Shared>) -> Response {
    let inner = state.lock().unwrap();
    if inner.plain_text_listing {
        return (
            [(header::CONTENT_TYPE, "text/plain")],
            "maintenance in progress",
        )
            .into_response();
    }
    if inner.records.is_empty() {
        return no_files();
    }
    Json(json!({"data": inner.records})).into_response()
}

async fn by_id(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let inner = state.lock().unwrap();
    match inner.records.iter().find(|r| r["file_id"] == id.as_str()) {
        Some(record) => Json(json!({"data": record})).into_response(),
        None => no_files(),
    }
}

async fn by_date(State(state): State<Shared>, Path(date): Path<String>) -> Response {
    let inner = state.lock().unwrap();
    let matching: Vec<&Value> = inner
        .records
        .iter()
        .filter(|r| r["creation_date"] == date.as_str())
        .collect();
    if matching.is_empty() {
        return no_files();
    }
    Json(json!({"data": matching})).into_response()
}

async fn upload(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));
    let text = String::from_utf8_lossy(&body);
    if !is_multipart || !text.contains("name=\"file\"") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "field 'file' is required"})),
        )
            .into_response();
    }

    let file_name = text
        .split("filename=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or_default()
        .to_string();
    state.lock().unwrap().uploads.push(file_name.clone());

    Json(json!({"message": "File uploaded", "filename": file_name})).into_response()
}

async fn download(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let inner = state.lock().unwrap();
    if !inner.records.iter().any(|r| r["file_id"] == id.as_str()) {
        return no_files();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 mock document {}", id),
    )
        .into_response()
}

/// Three processed CVs:
///
/// | id | name | created | picture | skills |
/// |----|------|---------|---------|--------|
/// | cv-1 | Maria_Garcia_CV.pdf | 05-03-2024 | yes | React, Docker |
/// | cv-2 | John_Smith.pdf | 05-03-2024 | no | Python |
/// | cv-3 | ana_frontend.pdf | 06-03-2024 | yes | React |
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "file_id": "cv-1",
            "name": "Maria_Garcia_CV.pdf",
            "creation_date": "05-03-2024",
            "picture_id": "pic-1",
            "results": [
                {"process": "OCR", "data": "MARIA GARCIA curriculum"},
                {"process": "NER", "data": {
                    "datos_personales": {"nombre": "Maria Garcia", "correo_electronico": "maria@example.com"},
                    "experiencia_laboral": [
                        {"empresa": "Acme", "cargo": "Frontend Dev",
                         "periodo": {"fecha_inicio": "2020", "fecha_fin": "2023"}}
                    ],
                    "habilidades": ["React", "Docker"]
                }}
            ]
        }),
        json!({
            "file_id": "cv-2",
            "name": "John_Smith.pdf",
            "creation_date": "05-03-2024",
            "results": [
                {"process": "NER", "data": {"habilidades": ["Python"]}}
            ]
        }),
        json!({
            "file_id": "cv-3",
            "name": "ana_frontend.pdf",
            "creation_date": "06-03-2024",
            "picture_id": "pic-3",
            "results": [
                {"process": "NER", "data": {"habilidades": ["React"]}}
            ]
        }),
    ]
}
