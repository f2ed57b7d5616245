//! # Prompt
//!
//! Composes the single instruction block sent to the answer generator.
//!
//! ## Format
//!
//! - **Role**: fixed support-assistant role statement
//! - **Product information**: grounding description, or [`NO_CONTEXT_SENTENCE`] when nothing resolved
//! - **Previous conversation** (only when history is non-empty): `Customer: ...` / `Support: ...` pairs, oldest first
//! - **Customer question**: the current question
//! - **Response rules**: fixed numbered constraints, naming the product the answer must stay on
//!
//! Output is deterministic: identical inputs give byte-identical prompts.

use budtender_core::ConversationTurn;

/// Role statement opening every prompt.
pub const ROLE_STATEMENT: &str =
    "You are a knowledgeable customer support assistant for a cannabis dispensary.";

/// Grounding text used when no product context was resolved.
pub const NO_CONTEXT_SENTENCE: &str =
    "No information was found about this product in our catalog.";

pub const SECTION_CONTEXT: &str = "Product information:";
pub const SECTION_HISTORY: &str = "Previous conversation:";
pub const SECTION_QUESTION: &str = "Customer question:";
pub const SECTION_RULES: &str = "Response rules:";

pub const CUSTOMER_PREFIX: &str = "Customer: ";
pub const SUPPORT_PREFIX: &str = "Support: ";

/// Renders past turns as `Customer:` / `Support:` lines in chronological order.
pub fn format_history(history: &[ConversationTurn]) -> Vec<String> {
    history
        .iter()
        .flat_map(|turn| {
            [
                format!("{}{}", CUSTOMER_PREFIX, turn.question.trim()),
                format!("{}{}", SUPPORT_PREFIX, turn.answer.trim()),
            ]
        })
        .collect()
}

/// Numbered response rules for `product_name`.
pub fn response_rules(product_name: &str) -> [String; 4] {
    [
        "1. Keep the answer concise: between 10 and 50 words.".to_string(),
        "2. Do not include greetings, introductions or sign-offs.".to_string(),
        format!(
            "3. Answer only about {}; do not recommend or describe other products.",
            product_name
        ),
        "4. If the product information does not contain the answer, briefly say you don't know."
            .to_string(),
    ]
}

/// Builds the prompt for one turn.
///
/// # Arguments
///
/// * `question` - Current customer question
/// * `context_text` - Grounding product description; `None` when no product was resolved
/// * `product_name` - Display name the answer must stay on
/// * `history` - Prior turns, oldest first; the transcript section is omitted when empty
pub fn compose(
    question: &str,
    context_text: Option<&str>,
    product_name: &str,
    history: &[ConversationTurn],
) -> String {
    let mut out = String::new();

    out.push_str(ROLE_STATEMENT);
    out.push_str("\n\n");

    out.push_str(SECTION_CONTEXT);
    out.push('\n');
    match context_text.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => out.push_str(text),
        None => out.push_str(NO_CONTEXT_SENTENCE),
    }
    out.push_str("\n\n");

    let transcript = format_history(history);
    if !transcript.is_empty() {
        out.push_str(SECTION_HISTORY);
        out.push('\n');
        for line in &transcript {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(SECTION_QUESTION);
    out.push(' ');
    out.push_str(question.trim());
    out.push_str("\n\n");

    out.push_str(SECTION_RULES);
    out.push('\n');
    for rule in response_rules(product_name) {
        out.push_str(&rule);
        out.push('\n');
    }

    out.push_str("\nAnswer:");
    out
}
