use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::ChatError;
use crate::llm::{ChatMessage, LlmProvider, LlmRequest};
use crate::news::NewsItem;

/// Binary intent classification prompt. The model is asked for a literal
/// YES/NO; anything without "YES" falls back to plain chat.
const DETECTION_PROMPT: &str = r#"
사용자의 다음 메시지가 뉴스 검색 요청인지 판단하세요.
뉴스 검색 요청이면 "YES"만 응답하고, 일반 대화면 "NO"만 응답하세요.

뉴스 검색 요청의 예:
- "AI 관련 뉴스 찾아줘"
- "최근 기술 뉴스 알려줘"
- "비트코인 뉴스 있어?"
- "스포츠 뉴스 보여줄래?"
- "인공지능 뉴스 10개 찾아"
- "한국 경제 뉴스 뭐 있어?"

일반 대화의 예:
- "안녕하세요"
- "어떻게 지내세요?"
- "파이썬이 뭔가요?"

사용자 메시지: {message}

응답 (YES 또는 NO):
"#;

/// Search keyword extraction prompt
const EXTRACTION_PROMPT: &str = r#"
사용자의 메시지에서 뉴스 검색 키워드를 추출하세요.
** 중요: 가능하면 한국어로 추출하세요. **
키워드만 한 개 반환하세요.

예시:
- "AI 뉴스 찾아줘" → AI
- "비트코인 최신 뉴스" → 비트코인
- "스포츠 뉴스 보여줄래?" → 스포츠
- "로봇 관련 뉴스 있어?" → 로봇
- "파이썬으로 뭐할 수 있어?" → (뉴스 검색 불필요)

사용자 메시지: {message}

키워드:
"#;

/// Extracted keywords at or above this many characters are discarded as noise
const MAX_KEYWORD_CHARS: usize = 50;

/// How many retrieved items feed the analysis prompt
const ANALYSIS_TOP_N: usize = 5;

/// Conversation manager: ordered turn history plus the three delegated
/// model decisions (reply, news-intent, keyword extraction).
pub struct Chatbot {
    llm: Arc<dyn LlmProvider>,
    history: Vec<ChatMessage>,
}

impl Chatbot {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            history: Vec::new(),
        }
    }

    /// Respond to a user message. With `include_history` the message is
    /// recorded as a user turn and the full history is sent; otherwise only
    /// this message goes out and history is untouched. Failures come back
    /// as user-visible text, never as errors.
    pub async fn reply(&mut self, message: &str, include_history: bool) -> String {
        debug!("user message: {}", message);

        if include_history {
            self.history.push(ChatMessage::user(message));
            match self.complete(self.history.clone()).await {
                Ok(text) => {
                    info!("assistant reply: {}", text);
                    self.history.push(ChatMessage::assistant(&text));
                    text
                }
                Err(e) => {
                    error!("reply failed: {}", e);
                    e.to_string()
                }
            }
        } else {
            match self.complete(vec![ChatMessage::user(message)]).await {
                Ok(text) => text,
                Err(e) => {
                    error!("reply failed: {}", e);
                    e.to_string()
                }
            }
        }
    }

    /// Classify whether a message asks for news. True iff the trimmed,
    /// upper-cased model response contains "YES"; any failure defaults to
    /// plain chat.
    pub async fn is_news_request(&self, message: &str) -> bool {
        debug!("checking news intent: {}", message);
        let prompt = DETECTION_PROMPT.replace("{message}", message);

        match self.complete(vec![ChatMessage::user(prompt)]).await {
            Ok(response) => {
                let normalized = response.trim().to_uppercase();
                let is_news = normalized.contains("YES");
                info!("news intent: {} (response: '{}')", is_news, normalized);
                is_news
            }
            Err(e) => {
                error!("news intent check failed: {}", e);
                false
            }
        }
    }

    /// Extract a single search keyword from a message. Empty string means
    /// "no keyword found": empty responses, over-long responses and
    /// failures all land there.
    pub async fn extract_keyword(&self, message: &str) -> String {
        debug!("extracting keyword: {}", message);
        let prompt = EXTRACTION_PROMPT.replace("{message}", message);

        match self.complete(vec![ChatMessage::user(prompt)]).await {
            Ok(response) => {
                let keyword = response.trim().to_string();
                info!("extracted keyword: '{}'", keyword);
                if !keyword.is_empty() && keyword.chars().count() < MAX_KEYWORD_CHARS {
                    keyword
                } else {
                    String::new()
                }
            }
            Err(e) => {
                error!("keyword extraction failed: {}", e);
                String::new()
            }
        }
    }

    /// Summarize retrieved headlines into a structured analysis. Runs
    /// outside conversation history; failures surface as inline text.
    pub async fn analyze_headlines(&self, keyword: &str, items: &[NewsItem]) -> String {
        let news_content = items
            .iter()
            .take(ANALYSIS_TOP_N)
            .map(|item| {
                let summary: String = item.summary.chars().take(100).collect();
                format!("- {}: {}", item.title, summary)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            r#"
사용자가 '{keyword}'에 대한 뉴스를 요청했습니다.

검색된 뉴스 요약:
{news_content}

위 뉴스들을 바탕으로 '{keyword}'의 최근 동향을 한국어로 설명해주세요.

응답 형식:
1. 🔥 **핵심 요약**: 한 문장으로 간단히
2. 💡 **주요 이슈 3가지**: 각각을 정렬 리스트로, 이모지 활용
3. 📈 **영향력 분석**: 긍정적/부정적 영향
4. 🔮 **앞으로의 전망**: 3~5문장

모든 텍스트에 이모지와 **볼드체**를 적절히 활용해서 재미있고 흥미롭게 작성해주세요.
"#
        );

        match self.complete(vec![ChatMessage::user(prompt)]).await {
            Ok(text) => text,
            Err(e) => {
                error!("headline analysis failed: {}", e);
                e.to_string()
            }
        }
    }

    /// Clear conversation history
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Replace conversation history, used when a saved session is
    /// re-activated
    pub fn set_history(&mut self, messages: Vec<ChatMessage>) {
        self.history = messages;
    }

    /// Read access to the ordered conversation history
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
        let request = LlmRequest {
            messages,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        };

        let response = self
            .llm
            .generate(request)
            .await
            .map_err(|e| ChatError::Service(e.to_string()))?;

        Ok(response.content)
    }
}
