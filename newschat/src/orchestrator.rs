use tracing::{info, warn};

use crate::chatbot::Chatbot;
use crate::news::NewsSource;
use crate::sessions::{SessionStore, Turn};

const NO_KEYWORD_MESSAGE: &str = "죄송합니다. 검색 키워드를 추출할 수 없습니다. 다시 시도해주세요.";

/// Process one user turn: classify intent, branch to news retrieval or
/// plain chat, and append both the user and assistant turns to the active
/// session. Returns the assistant turn.
///
/// A news turn issues at most one retrieval (with `max_results`) and one
/// analysis call; every remote call blocks until it completes.
pub async fn handle_turn(
    chatbot: &mut Chatbot,
    news: &dyn NewsSource,
    store: &mut SessionStore,
    message: &str,
    max_results: usize,
) -> Turn {
    store.push_turn(Turn::user(message));

    let turn = if chatbot.is_news_request(message).await {
        news_turn(chatbot, news, message, max_results).await
    } else {
        let reply = chatbot.reply(message, true).await;
        Turn::assistant(reply)
    };

    store.push_turn(turn.clone());
    turn
}

async fn news_turn(
    chatbot: &mut Chatbot,
    news: &dyn NewsSource,
    message: &str,
    max_results: usize,
) -> Turn {
    let keyword = chatbot.extract_keyword(message).await;
    if keyword.is_empty() {
        warn!("no keyword extracted from news request");
        return Turn::assistant(NO_KEYWORD_MESSAGE);
    }

    let items = news.search(&keyword, max_results).await;
    if items.is_empty() {
        // Retrieval failure and zero matches are indistinguishable here
        warn!("no news found for '{}'", keyword);
        return Turn::assistant(format!(
            "죄송합니다. '{}' 관련 뉴스를 찾을 수 없습니다.",
            keyword
        ));
    }

    info!("found {} news items for '{}'", items.len(), keyword);
    let analysis = chatbot.analyze_headlines(&keyword, &items).await;
    let content = format!(
        "'{}' 관련 뉴스 {}개를 찾았습니다.\n\n{}",
        keyword,
        items.len(),
        analysis
    );
    Turn::news(content, keyword)
}
