use rocket::futures::{SinkExt, StreamExt};
use rocket::{get, State};
use rocket_ws::{Channel, Message, WebSocket};
use serde_json::json;
use tracing::{error, info};

use crate::news::NewsSource;
use crate::orchestrator;
use crate::render;
use crate::server::AppState;
use crate::sessions::Turn;

/// WebSocket chat endpoint for the active session
#[get("/chat")]
pub fn chat_websocket(ws: WebSocket, state: &State<AppState>) -> Channel<'static> {
    let state = state.inner().clone();

    ws.channel(move |mut stream| {
        Box::pin(async move {
            info!("WebSocket connected");

            // Replay the active session on connection
            let turns = state.store.lock().await.active().turns.clone();
            for turn in &turns {
                let payload = json!({
                    "type": "history",
                    "role": turn.role.as_str(),
                    "content": rendered_content(state.news.as_ref(), turn).await,
                    "is_news": turn.is_news,
                    "keyword": turn.keyword,
                });
                if stream.send(Message::Text(payload.to_string())).await.is_err() {
                    return Ok(());
                }
            }

            // Handle incoming messages
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        // Accept both {"message": "..."} envelopes and raw text
                        let user_message = match serde_json::from_str::<serde_json::Value>(&text) {
                            Ok(json) => json["message"].as_str().unwrap_or(&text).to_string(),
                            Err(_) => text,
                        };
                        info!("received message: {}", user_message);

                        let max_results = state.max_results();
                        let turn = {
                            let mut chatbot = state.chatbot.lock().await;
                            let mut store = state.store.lock().await;
                            orchestrator::handle_turn(
                                &mut chatbot,
                                state.news.as_ref(),
                                &mut store,
                                &user_message,
                                max_results,
                            )
                            .await
                        };

                        let payload = json!({
                            "type": "message",
                            "author": "assistant",
                            "message": rendered_content(state.news.as_ref(), &turn).await,
                            "is_news": turn.is_news,
                            "keyword": turn.keyword,
                        });
                        if let Err(e) = stream.send(Message::Text(payload.to_string())).await {
                            error!("Failed to send response: {}", e);
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("WebSocket closed");
                        break;
                    }
                    Err(e) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }

            Ok(())
        })
    })
}

/// News turns are reconstructed (sub-topic tables + analysis) from the
/// tagged keyword; plain turns pass through unchanged.
async fn rendered_content(news: &dyn NewsSource, turn: &Turn) -> String {
    if turn.is_news {
        if let Some(keyword) = &turn.keyword {
            return render::render_news_turn(news, keyword, &turn.content).await;
        }
    }
    turn.content.clone()
}
