use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, routes, State};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use common::Config;

use crate::chatbot::Chatbot;
use crate::llm::ChatMessage;
use crate::news::{NewsItem, NewsSource};
use crate::sessions::{SessionStore, SessionSummary, Turn};

/// Application state stored inside Rocket managed state.
/// Chatbot and store sit behind mutexes: one turn fully blocks the
/// interface until its remote calls complete.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Arc<Config>,
    pub chatbot: Arc<Mutex<Chatbot>>,
    pub news: Arc<dyn NewsSource>,
    pub store: Arc<Mutex<SessionStore>>,
}

impl AppState {
    /// Result-count cap for keyword searches
    pub fn max_results(&self) -> usize {
        self.config
            .news
            .as_ref()
            .and_then(|n| n.max_results)
            .unwrap_or(10)
    }
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    title: String,
    description: String,
    model: String,
    active_turns: usize,
    saved_sessions: usize,
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Status endpoint returning simple JSON with uptime and basic config info.
#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let now = Utc::now();
    let uptime = (now - state.started_at).num_seconds();

    let (title, description) = match &state.config.app {
        Some(app) => (
            app.title.clone().unwrap_or_default(),
            app.description.clone().unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };
    let model = state
        .config
        .llm
        .as_ref()
        .and_then(|l| l.model.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let store = state.store.lock().await;
    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        title,
        description,
        model,
        active_turns: store.active().turns.len(),
        saved_sessions: store.saved_count(),
    })
}

/// Saved sessions, newest first
#[get("/api/v1/sessions")]
async fn list_sessions(state: &State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(state.store.lock().await.list())
}

#[derive(Serialize)]
struct NewSessionResponse {
    active_id: String,
    /// Id the previous session was saved under, absent when it was empty
    saved_id: Option<String>,
}

/// Start a new conversation. The previous session is saved only if it has
/// turns; the chatbot history is cleared either way.
#[post("/api/v1/sessions/new")]
async fn new_session(state: &State<AppState>) -> Json<NewSessionResponse> {
    // Lock order everywhere: chatbot before store
    let mut chatbot = state.chatbot.lock().await;
    let mut store = state.store.lock().await;
    let saved_id = store.new_conversation();
    chatbot.reset();
    info!(saved = ?saved_id, "new conversation started");

    Json(NewSessionResponse {
        active_id: store.active().id.clone(),
        saved_id,
    })
}

#[derive(Serialize)]
struct SessionTurns {
    id: String,
    turns: Vec<Turn>,
}

/// Re-activate a saved session and return its turns for replay. The
/// chatbot history is rebuilt from the re-activated turns.
#[post("/api/v1/sessions/<id>/activate")]
async fn activate_session(id: &str, state: &State<AppState>) -> Option<Json<SessionTurns>> {
    let mut chatbot = state.chatbot.lock().await;
    let mut store = state.store.lock().await;
    let session = store.activate(id)?;

    let history: Vec<ChatMessage> = session
        .turns
        .iter()
        .map(|t| ChatMessage {
            role: t.role,
            content: t.content.clone(),
        })
        .collect();
    let response = SessionTurns {
        id: session.id.clone(),
        turns: session.turns.clone(),
    };
    chatbot.set_history(history);
    info!(id = %response.id, "session re-activated");

    Some(Json(response))
}

/// Delete a saved session by id
#[delete("/api/v1/sessions/<id>")]
async fn delete_session(id: &str, state: &State<AppState>) -> Status {
    if state.store.lock().await.delete(id) {
        info!(%id, "session deleted");
        Status::NoContent
    } else {
        Status::NotFound
    }
}

/// Latest headlines from the unfiltered feed
#[get("/api/v1/news/latest?<max_results>")]
async fn latest_news(max_results: Option<usize>, state: &State<AppState>) -> Json<Vec<NewsItem>> {
    let cap = max_results.unwrap_or_else(|| state.max_results());
    Json(state.news.latest(cap).await)
}

/// Launch the Rocket server (blocking until Rocket shuts down)
pub async fn launch_rocket(state: AppState) -> Result<()> {
    let _rocket = rocket::build()
        .manage(state)
        .mount(
            "/",
            routes![
                health,
                status,
                list_sessions,
                new_session,
                activate_session,
                delete_session,
                latest_news,
                crate::sessions::websocket::chat_websocket,
            ],
        )
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}
