//! In-process mock of the style-prediction backend.
//!
//! Each test spawns its own axum server on an ephemeral port, configured
//! with canned responses, and inspects what the client sent afterwards.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{DefaultBodyLimit, Form, Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// A canned response: status code plus raw body.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

impl IntoResponse for Canned {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.body).into_response()
    }
}

/// Everything the mock has observed.
#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub predict_calls: usize,
    pub image_file_name: Option<String>,
    pub image_content_type: Option<String>,
    pub image_len: usize,
    pub user_comments: Option<String>,
    pub favorites_added: Vec<String>,
    pub favorites_removed: Vec<String>,
    pub favorite_notes: Vec<(String, String)>,
    pub requested_with: Option<String>,
    pub feedback: Vec<Value>,
}

#[derive(Clone)]
pub struct MockConfig {
    pub predict: Canned,
    pub favorite: Canned,
    pub feedback: Canned,
    pub status: Canned,
    pub stats: Canned,
    /// Frames pushed to each progress-channel subscriber before closing.
    pub progress_frames: Vec<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            predict: Canned::ok(json!({"prediction_id": "pred-1", "primary_style": "Minimalist"})),
            favorite: Canned::ok(json!({"success": true})),
            feedback: Canned::ok(json!({"message": "Feedback recorded successfully"})),
            status: Canned::ok(json!({"status": "success", "message": "OpenAI API connected"})),
            stats: Canned::ok(json!({"accuracy_rate": 80.0, "total_feedback": 5})),
            progress_frames: Vec::new(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    config: Arc<MockConfig>,
    recorded: Arc<Mutex<Recorded>>,
}

pub struct MockBackend {
    pub base_url: String,
    pub ws_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockBackend {
    pub async fn start(config: MockConfig) -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = MockState {
            config: Arc::new(config),
            recorded: Arc::clone(&recorded),
        };

        let app = Router::new()
            .route("/predict", post(predict))
            .route("/favorites/add/{prediction_id}", post(add_favorite))
            .route("/favorites/remove/{favorite_id}", post(remove_favorite))
            .route("/favorites/update/{favorite_id}", post(update_favorite))
            .route("/feedback", post(feedback))
            .route("/api/status", get(status))
            .route("/stats", get(stats))
            .route("/ws", get(progress_ws))
            .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            ws_url: format!("ws://{addr}/ws"),
            recorded,
        }
    }

    pub async fn recorded(&self) -> Recorded {
        self.recorded.lock().await.clone()
    }
}

async fn predict(State(state): State<MockState>, mut multipart: Multipart) -> Canned {
    let mut seen = Recorded::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().unwrap_or("") {
            "image" => {
                seen.image_file_name = field.file_name().map(str::to_string);
                seen.image_content_type = field.content_type().map(str::to_string);
                seen.image_len = field.bytes().await.unwrap().len();
            }
            "user_comments" => {
                seen.user_comments = Some(field.text().await.unwrap());
            }
            _ => {}
        }
    }

    let mut recorded = state.recorded.lock().await;
    recorded.predict_calls += 1;
    recorded.image_file_name = seen.image_file_name;
    recorded.image_content_type = seen.image_content_type;
    recorded.image_len = seen.image_len;
    recorded.user_comments = seen.user_comments;

    state.config.predict.clone()
}

async fn add_favorite(
    State(state): State<MockState>,
    Path(prediction_id): Path<String>,
    headers: HeaderMap,
) -> Canned {
    let mut recorded = state.recorded.lock().await;
    recorded.favorites_added.push(prediction_id);
    recorded.requested_with = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.config.favorite.clone()
}

async fn remove_favorite(State(state): State<MockState>, Path(favorite_id): Path<String>) -> Canned {
    state.recorded.lock().await.favorites_removed.push(favorite_id);
    Canned::ok(json!({"status": "success", "message": "Removed from favorites"}))
}

#[derive(serde::Deserialize)]
struct NotesForm {
    notes: String,
}

async fn update_favorite(
    State(state): State<MockState>,
    Path(favorite_id): Path<String>,
    Form(form): Form<NotesForm>,
) -> Canned {
    state
        .recorded
        .lock()
        .await
        .favorite_notes
        .push((favorite_id, form.notes));
    Canned::ok(json!({"status": "success", "message": "Notes updated"}))
}

async fn feedback(State(state): State<MockState>, Json(body): Json<Value>) -> Canned {
    state.recorded.lock().await.feedback.push(body);
    state.config.feedback.clone()
}

async fn status(State(state): State<MockState>) -> Canned {
    state.config.status.clone()
}

async fn stats(State(state): State<MockState>) -> Canned {
    state.config.stats.clone()
}

async fn progress_ws(ws: WebSocketUpgrade, State(state): State<MockState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| push_frames(socket, state.config))
}

async fn push_frames(mut socket: WebSocket, config: Arc<MockConfig>) {
    for frame in &config.progress_frames {
        if socket.send(Message::Text(frame.clone().into())).await.is_err() {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

/// Encode a small JPEG, padded with trailing bytes up to `total_len`.
///
/// Decoders stop at the end-of-image marker, so the padding only affects
/// the upload size.
pub fn jpeg_of_size(total_len: usize) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(16, 16));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    let mut bytes = buf.into_inner();
    if bytes.len() < total_len {
        bytes.resize(total_len, 0);
    }
    bytes
}
