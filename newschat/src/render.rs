//! Markdown rendering of news turns for the display surface.
//!
//! News turns store only the label + analysis text; the tables are
//! reconstructed from the tagged keyword at display time.

use crate::news::{NewsItem, NewsSource};

/// Fixed keyword → sub-topic lookup, matched as a substring of the
/// lower-cased keyword
const TOPIC_TABLE: &[(&str, [&str; 3])] = &[
    ("ai", ["인공지능 기술", "머신러닝", "딥러닝"]),
    ("인공지능", ["AI 기술", "머신러닝", "자연어처리"]),
    ("기술", ["소프트웨어", "하드웨어", "클라우드"]),
    ("뉴스", ["속보", "시사", "시황"]),
    ("금융", ["주식", "코인", "투자"]),
    ("정치", ["정부", "의회", "선거"]),
    ("스포츠", ["축구", "야구", "농구"]),
    ("엔터", ["영화", "드라마", "음악"]),
    ("게임", ["온라인게임", "모바일게임", "e스포츠"]),
];

/// Items fetched per sub-topic table
const TOPIC_RESULTS: usize = 5;

/// Three display sub-topics for a keyword: the lookup table when it
/// matches, otherwise the wildcard patterns.
pub fn related_topics(keyword: &str) -> Vec<String> {
    let lowered = keyword.to_lowercase();
    for (key, topics) in TOPIC_TABLE {
        if lowered.contains(key) {
            return topics.iter().map(|t| t.to_string()).collect();
        }
    }

    vec![
        format!("{} 뉴스", keyword),
        format!("{} 관련", keyword),
        format!("{} 동향", keyword),
    ]
}

/// Markdown table over retrieved items, cells clipped to fixed column
/// widths
pub fn news_table(items: &[NewsItem]) -> String {
    let mut table = String::from("| # | 📌 제목 | 📰 출처 | 📅 날짜 | 🔗 |\n|:---:|---|---|---|---|\n");
    for (idx, item) in items.iter().enumerate() {
        table.push_str(&format!(
            "| {} | {} | {} | {} | [읽기]({}) |\n",
            idx + 1,
            clip(&item.title, 50),
            clip(&item.source, 15),
            clip(&item.published, 10),
            item.link
        ));
    }
    table
}

/// Retrieve and render one table per sub-topic
pub async fn render_news_by_topic(news: &dyn NewsSource, keyword: &str) -> String {
    let mut out = format!("## 📰 '{}' 관련 뉴스\n\n", keyword);

    for topic in related_topics(keyword) {
        out.push_str(&format!("### 🔷 {}\n\n", topic));
        let items = news.search(&topic, TOPIC_RESULTS).await;
        if items.is_empty() {
            out.push_str(&format!("'{}' 관련 뉴스가 없습니다.\n\n", topic));
        } else {
            out.push_str(&news_table(&items));
            out.push('\n');
        }
    }

    out
}

/// Full reconstruction of a stored news turn: sub-topic tables followed by
/// the analysis section
pub async fn render_news_turn(news: &dyn NewsSource, keyword: &str, content: &str) -> String {
    let (_label, analysis) = split_analysis(content);
    let mut out = render_news_by_topic(news, keyword).await;
    out.push_str("---\n\n### 🎯 AI 뉴스 분석\n\n");
    out.push_str(analysis);
    out
}

/// Split stored news-turn content on the first double newline into the
/// result label and the analysis body. Content without a separator is all
/// body.
pub fn split_analysis(content: &str) -> (&str, &str) {
    match content.split_once("\n\n") {
        Some((label, body)) => (label, body),
        None => ("", content),
    }
}

fn clip(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
