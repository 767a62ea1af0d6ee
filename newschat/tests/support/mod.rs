#![allow(dead_code)]

// Shared test doubles for chatbot and orchestration tests

use std::sync::Mutex;

use anyhow::Result;
use newschat::llm::{LlmProvider, LlmRequest, LlmResponse, UsageMetadata};
use newschat::news::{NewsItem, NewsSource};

/// LLM provider replaying scripted responses in order. `Err` entries
/// simulate service failures; an exhausted script also fails.
pub struct ScriptedLlm {
    responses: Mutex<Vec<Result<String, String>>>,
    pub calls: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(message.to_string())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Messages of the `n`-th request, for prompt inspection
    pub fn request_messages(&self, n: usize) -> Vec<newschat::llm::ChatMessage> {
        self.calls.lock().unwrap()[n].messages.clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            anyhow::bail!("scripted responses exhausted");
        }
        match responses.remove(0) {
            Ok(content) => Ok(LlmResponse {
                content,
                usage: UsageMetadata::default(),
                model: "scripted".to_string(),
            }),
            Err(message) => anyhow::bail!(message),
        }
    }
}

/// News source serving a fixed item list and recording every search call
pub struct StubNews {
    items: Vec<NewsItem>,
    pub searches: Mutex<Vec<(String, usize)>>,
}

impl StubNews {
    pub fn with_items(items: Vec<NewsItem>) -> Self {
        Self {
            items,
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn recorded_searches(&self) -> Vec<(String, usize)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NewsSource for StubNews {
    async fn search(&self, keyword: &str, max_results: usize) -> Vec<NewsItem> {
        self.searches
            .lock()
            .unwrap()
            .push((keyword.to_string(), max_results));
        self.items.iter().take(max_results).cloned().collect()
    }

    async fn latest(&self, max_results: usize) -> Vec<NewsItem> {
        self.items.iter().take(max_results).cloned().collect()
    }
}

/// Zero-padded sample items so title substrings stay unambiguous
pub fn sample_items(count: usize) -> Vec<NewsItem> {
    (1..=count)
        .map(|i| NewsItem {
            title: format!("기사 {:02}", i),
            link: format!("https://news.example.com/{}", i),
            published: "Mon, 02 Feb 2026 08:00:00 +0000".to_string(),
            summary: format!("요약 {:02}", i),
            source: "연합뉴스".to_string(),
        })
        .collect()
}
