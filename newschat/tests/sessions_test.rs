use std::collections::HashSet;

use newschat::sessions::{SessionStore, Turn};

#[test]
fn empty_session_is_not_saved() {
    let mut store = SessionStore::new();

    let saved_id = store.new_conversation();

    assert!(saved_id.is_none());
    assert_eq!(store.saved_count(), 0);
    assert!(store.list().is_empty());
}

#[test]
fn non_empty_session_is_saved_on_new_conversation() {
    let mut store = SessionStore::new();
    let first_id = store.active().id.clone();
    store.push_turn(Turn::user("안녕하세요"));
    store.push_turn(Turn::assistant("반갑습니다!"));

    let saved_id = store.new_conversation();

    assert_eq!(saved_id.as_deref(), Some(first_id.as_str()));
    assert_eq!(store.saved_count(), 1);
    assert!(store.active().is_empty());
    assert_ne!(store.active().id, first_id);

    let listing = store.list();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, first_id);
    assert_eq!(listing[0].preview, "안녕하세요");
    assert_eq!(listing[0].turn_count, 2);
}

#[test]
fn delete_removes_exactly_one_session() {
    let mut store = SessionStore::new();

    let mut ids = Vec::new();
    for i in 0..3 {
        store.push_turn(Turn::user(format!("대화 {}", i)));
        ids.push(store.new_conversation().expect("session saved"));
    }
    assert_eq!(store.saved_count(), 3);

    assert!(store.delete(&ids[1]));
    assert_eq!(store.saved_count(), 2);

    let remaining: Vec<String> = store.list().into_iter().map(|s| s.id).collect();
    assert!(remaining.contains(&ids[0]));
    assert!(remaining.contains(&ids[2]));
    assert!(!remaining.contains(&ids[1]));

    // Unknown id deletes nothing
    assert!(!store.delete("20000101_000000"));
    assert_eq!(store.saved_count(), 2);
}

#[test]
fn activate_restores_turns_and_removes_saved_entry() {
    let mut store = SessionStore::new();
    store.push_turn(Turn::user("AI 뉴스 찾아줘"));
    store.push_turn(Turn::news("'AI' 관련 뉴스 10개를 찾았습니다.\n\n분석", "AI"));
    let saved_id = store.new_conversation().expect("session saved");

    let session = store.activate(&saved_id).expect("activate saved session");
    assert_eq!(session.id, saved_id);
    assert_eq!(session.turns.len(), 2);
    assert!(session.turns[1].is_news);
    assert_eq!(session.turns[1].keyword.as_deref(), Some("AI"));

    // The empty replacement session leaves no ghost entry
    assert_eq!(store.saved_count(), 0);
}

#[test]
fn activate_preserves_a_non_empty_current_session() {
    let mut store = SessionStore::new();
    store.push_turn(Turn::user("첫 번째 대화"));
    let first_id = store.new_conversation().expect("saved");

    store.push_turn(Turn::user("두 번째 대화"));
    let second_id = store.active().id.clone();

    store.activate(&first_id).expect("activate");

    assert_eq!(store.active().id, first_id);
    assert_eq!(store.saved_count(), 1);
    let listing = store.list();
    assert_eq!(listing[0].id, second_id);
    assert_eq!(listing[0].preview, "두 번째 대화");
}

#[test]
fn activate_unknown_id_is_a_no_op() {
    let mut store = SessionStore::new();
    store.push_turn(Turn::user("안녕하세요"));

    assert!(store.activate("19990101_000000").is_none());
    assert_eq!(store.active().turns.len(), 1);
}

#[test]
fn same_second_sessions_get_unique_ids() {
    let mut store = SessionStore::new();

    let mut ids = HashSet::new();
    ids.insert(store.active().id.clone());
    // Well inside one wall-clock second
    for i in 0..20 {
        store.push_turn(Turn::user(format!("대화 {}", i)));
        store.new_conversation();
        assert!(
            ids.insert(store.active().id.clone()),
            "duplicate session id: {}",
            store.active().id
        );
    }
    assert_eq!(store.saved_count(), 20);
}

#[test]
fn preview_clips_to_twenty_characters() {
    let mut store = SessionStore::new();
    let long = "인공지능 기술 동향에 대한 아주 길고 자세한 질문입니다";
    store.push_turn(Turn::user(long));
    store.new_conversation();

    let listing = store.list();
    assert_eq!(listing[0].preview, long.chars().take(20).collect::<String>());
}
