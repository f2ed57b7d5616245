//! Unit tests for `prompt::compose`.
//!
//! Verifies section order, grounding fallback, transcript rendering and determinism.
//! External interactions: none (pure function tests).

use budtender_core::ConversationTurn;
use prompt::{
    compose, format_history, NO_CONTEXT_SENTENCE, ROLE_STATEMENT, SECTION_CONTEXT,
    SECTION_HISTORY, SECTION_QUESTION, SECTION_RULES,
};

const KANDY_KUSH: &str = "Kandy Kush, also known as \"Candy Kush,\" is a hybrid marijuana strain. \
Like the name suggests, the flavor is sweet like candy with a strong lemon-Kush scent.\nType: Hybrid\nTHC: 18%\nCBD: 0%";

/// **Test: All sections appear in order: role, context, question, rules.**
#[test]
fn compose_orders_sections() {
    let out = compose("How does it taste?", Some(KANDY_KUSH), "Kandy Kush", &[]);

    let role = out.find(ROLE_STATEMENT).unwrap();
    let context = out.find(SECTION_CONTEXT).unwrap();
    let question = out.find(SECTION_QUESTION).unwrap();
    let rules = out.find(SECTION_RULES).unwrap();
    assert!(role < context && context < question && question < rules);
    assert!(out.contains("strong lemon-Kush scent"));
    assert!(out.contains("Customer question: How does it taste?"));
    assert!(out.ends_with("Answer:"));
}

/// **Test: Missing or blank context is replaced by the "no information" sentence.**
#[test]
fn compose_uses_no_context_sentence() {
    let none = compose("Is it strong?", None, "this product", &[]);
    assert!(none.contains(NO_CONTEXT_SENTENCE));

    let blank = compose("Is it strong?", Some("   "), "this product", &[]);
    assert!(blank.contains(NO_CONTEXT_SENTENCE));
}

/// **Test: Empty history omits the transcript section entirely.**
#[test]
fn compose_omits_history_when_empty() {
    let out = compose("What is the THC?", Some(KANDY_KUSH), "Kandy Kush", &[]);
    assert!(!out.contains(SECTION_HISTORY));
    assert!(!out.contains("Support:"));
}

/// **Test: History renders Customer/Support pairs oldest first.**
#[test]
fn compose_renders_history_chronologically() {
    let history = vec![
        ConversationTurn::new("What is Kandy Kush?", "An indica-dominant hybrid."),
        ConversationTurn::new("What's the THC?", "About 18%."),
    ];

    let out = compose("And CBD?", Some(KANDY_KUSH), "Kandy Kush", &history);

    assert!(out.contains(SECTION_HISTORY));
    let first = out.find("Customer: What is Kandy Kush?").unwrap();
    let first_answer = out.find("Support: An indica-dominant hybrid.").unwrap();
    let second = out.find("Customer: What's the THC?").unwrap();
    let second_answer = out.find("Support: About 18%.").unwrap();
    assert!(first < first_answer && first_answer < second && second < second_answer);
    assert!(second_answer < out.find(SECTION_QUESTION).unwrap());
}

/// **Test: Rules name the product and cover length, greetings and unknown answers.**
#[test]
fn compose_rules_reference_product() {
    let out = compose("Effects?", Some(KANDY_KUSH), "Kandy Kush", &[]);
    assert!(out.contains("1. Keep the answer concise: between 10 and 50 words."));
    assert!(out.contains("2. Do not include greetings"));
    assert!(out.contains("3. Answer only about Kandy Kush;"));
    assert!(out.contains("4. If the product information does not contain the answer, briefly say you don't know."));
}

/// **Test: Same inputs give byte-identical output.**
#[test]
fn compose_is_deterministic() {
    let history = vec![ConversationTurn::new("Hi there, what is it?", "A hybrid.")];
    let a = compose("Taste?", Some(KANDY_KUSH), "Kandy Kush", &history);
    let b = compose("Taste?", Some(KANDY_KUSH), "Kandy Kush", &history);
    assert_eq!(a, b);
}

/// **Test: format_history trims and flattens turns.**
#[test]
fn format_history_flattens_pairs() {
    let lines = format_history(&[ConversationTurn::new("  q1 ", " a1  ")]);
    assert_eq!(lines, vec!["Customer: q1".to_string(), "Support: a1".to_string()]);
}
