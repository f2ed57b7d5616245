//! Description cleanup applied before embedding.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered rewrite rules for cannabis terminology.
static TERM_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"thc:?\s*(\d+\.?\d*)%?", "thc ${1}%"),
        (r"cbd:?\s*(\d+\.?\d*)%?", "cbd ${1}%"),
        (r"hybrid[ -]?dominant", "hybrid"),
        (r"indica[ -]?dominant", "indica"),
        (r"sativa[ -]?dominant", "sativa"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("term rule pattern is valid"),
            replacement,
        )
    })
    .collect()
});

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s%]").expect("non-word pattern is valid"));

/// Normalizes a product description for embedding.
///
/// Lower-cases, standardizes THC/CBD figures (`THC: 18` -> `thc 18%`) and dominance terms
/// (`indica-dominant` -> `indica`), strips punctuation except `%`, and collapses whitespace.
pub fn preprocess_description(text: &str) -> String {
    let mut text = text.to_lowercase();
    for (re, replacement) in TERM_RULES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    let text = NON_WORD.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
