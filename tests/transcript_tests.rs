// Unit tests for the transcript synchronizer
//
// These tests verify per-turn accumulation, the exactly-once flush into the
// chat log, and the placeholder rule for silent turn sides.

use persona_live::chat::{ChatLog, MemoryChatLog, Role};
use persona_live::session::{TranscriptSync, EMPTY_TURN_PLACEHOLDER};

#[test]
fn test_deltas_accumulate_and_flush_as_one_turn_pair() {
    let chat = MemoryChatLog::new();
    let mut transcript = TranscriptSync::new();

    transcript.push_user("Hel");
    transcript.push_user("lo");
    transcript.push_model("Hi");
    transcript.push_model("!");

    transcript.flush(&chat);

    let turns = chat.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].text, "Hello");
    assert_eq!(turns[1].role, Role::Model);
    assert_eq!(turns[1].text, "Hi!");
}

#[test]
fn test_buffers_are_empty_immediately_after_flush() {
    let chat = MemoryChatLog::new();
    let mut transcript = TranscriptSync::new();

    transcript.push_user("something");
    transcript.push_model("something else");
    assert!(!transcript.is_empty());

    transcript.flush(&chat);
    assert!(transcript.is_empty());
}

#[test]
fn test_empty_turn_still_appends_placeholder_pair() {
    let chat = MemoryChatLog::new();
    let mut transcript = TranscriptSync::new();

    transcript.flush(&chat);

    let turns = chat.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].text, EMPTY_TURN_PLACEHOLDER);
    assert_eq!(turns[1].text, EMPTY_TURN_PLACEHOLDER);
}

#[test]
fn test_one_sided_turn_gets_placeholder_on_the_other_side() {
    let chat = MemoryChatLog::new();
    let mut transcript = TranscriptSync::new();

    transcript.push_model("Just me talking.");
    transcript.flush(&chat);

    let turns = chat.turns();
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].text, EMPTY_TURN_PLACEHOLDER);
    assert_eq!(turns[1].text, "Just me talking.");
}

#[test]
fn test_successive_turns_do_not_leak_into_each_other() {
    let chat = MemoryChatLog::new();
    let mut transcript = TranscriptSync::new();

    transcript.push_user("first question");
    transcript.push_model("first answer");
    transcript.flush(&chat);

    transcript.push_user("second question");
    transcript.push_model("second answer");
    transcript.flush(&chat);

    let turns = chat.turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[2].text, "second question");
    assert_eq!(turns[3].text, "second answer");
}

#[test]
fn test_turn_ids_are_unique_and_increasing_under_rapid_turns() {
    let chat = MemoryChatLog::new();
    let mut transcript = TranscriptSync::new();

    for _ in 0..50 {
        transcript.push_user("u");
        transcript.push_model("m");
        transcript.flush(&chat);
    }

    let turns = chat.turns();
    assert_eq!(turns.len(), 100);

    for pair in turns.windows(2) {
        assert!(
            pair[1].id.0 > pair[0].id.0,
            "turn ids must be strictly increasing"
        );
    }
}
