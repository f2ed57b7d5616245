//! Strain name extraction from free text.
//!
//! Rules run in [`StrainRule::ORDERED`] order and the first hit wins; there is no scoring.
//! Output is always lower-case.

use once_cell::sync::Lazy;
use regex::Regex;

/// Curated product names, lower-case. Checked in this order by plain substring match.
pub const KNOWN_STRAINS: &[&str] = &[
    "blue dream",
    "og kush",
    "sour diesel",
    "girl scout cookies",
    "gelato",
    "granddaddy purple",
    "pineapple express",
    "northern lights",
    "jack herer",
    "white widow",
    "gorilla glue",
    "green crack",
    "kandy kush",
    "candy kush",
    "trainwreck",
    "durban poison",
    "purple haze",
    "ak-47",
    "wedding cake",
    "zkittlez",
    "sherbert",
    "bubba kush",
    "skywalker og",
    "lemon haze",
    "super silver haze",
    "strawberry cough",
    "chemdawg",
    "headband",
    "cherry pie",
    "blue cheese",
];

/// Leading words that mark a phrase as a pronoun, possessive or article reference rather than
/// a name.
const REFERENCE_WORDS: &[&str] = &[
    "it", "its", "this", "that", "these", "those", "them", "they", "one", "you", "me", "your",
    "yours", "my", "our", "their", "his", "her", "a", "an",
];

/// Words that make a captured phrase a question about an attribute, not a product.
const ATTRIBUTE_WORDS: &[&str] = &[
    "thc", "cbd", "effect", "effects", "taste", "flavor", "flavour", "smell", "aroma",
    "potency", "dosage", "dose", "price", "difference", "best", "strongest",
];

const MAX_NAME_WORDS: usize = 4;

static ABOUT_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\babout\s+(?:the\s+)?([a-z0-9][a-z0-9'\- ]*?)(?:\s+strain)?\s*[?.!]*\s*$")
        .expect("about pattern is valid")
});

static WHAT_IS_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:what\s+is|what['’]s)\s+(?:the\s+)?([a-z0-9][a-z0-9'\- ]*?)(?:\s+strain)?\s*[?.!]*\s*$",
    )
    .expect("what-is pattern is valid")
});

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"|“([^”]+)”"#).expect("quoted pattern is valid"));

/// One extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrainRule {
    /// Substring match against [`KNOWN_STRAINS`].
    Curated,
    /// `about (the) <phrase> (strain)` at the end of the text.
    AboutPhrase,
    /// `what is|what's (the) <phrase> (strain)` at the end of the text.
    WhatIsPhrase,
    /// Text in double quotes.
    Quoted,
}

impl StrainRule {
    pub const ORDERED: [StrainRule; 4] = [
        StrainRule::Curated,
        StrainRule::AboutPhrase,
        StrainRule::WhatIsPhrase,
        StrainRule::Quoted,
    ];

    /// Applies this rule alone.
    pub fn apply(&self, text: &str) -> Option<String> {
        match self {
            StrainRule::Curated => {
                let lower = text.to_lowercase();
                KNOWN_STRAINS
                    .iter()
                    .find(|name| lower.contains(*name))
                    .map(|name| name.to_string())
            }
            StrainRule::AboutPhrase => capture_phrase(&ABOUT_PHRASE, text),
            StrainRule::WhatIsPhrase => capture_phrase(&WHAT_IS_PHRASE, text),
            StrainRule::Quoted => QUOTED
                .captures(text)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| normalize(m.as_str()))
                .filter(|name| !name.is_empty()),
        }
    }
}

fn capture_phrase(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text.trim())?;
    let name = normalize(caps.get(1)?.as_str());
    is_plausible_name(&name).then_some(name)
}

fn normalize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_plausible_name(name: &str) -> bool {
    let words: Vec<&str> = name.split(' ').filter(|w| !w.is_empty()).collect();
    let Some(first) = words.first() else {
        return false;
    };
    words.len() <= MAX_NAME_WORDS
        && !REFERENCE_WORDS.contains(first)
        && !words.iter().any(|w| ATTRIBUTE_WORDS.contains(w))
}

/// A name together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrainMatch {
    pub name: String,
    pub rule: StrainRule,
}

/// Ordered strain name extractor.
#[derive(Debug, Clone)]
pub struct StrainNameExtractor {
    rules: Vec<StrainRule>,
}

impl Default for StrainNameExtractor {
    fn default() -> Self {
        Self {
            rules: StrainRule::ORDERED.to_vec(),
        }
    }
}

impl StrainNameExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first rule hit, or `None` when no rule matches.
    pub fn extract_match(&self, text: &str) -> Option<StrainMatch> {
        self.rules.iter().find_map(|rule| {
            rule.apply(text).map(|name| StrainMatch { name, rule: *rule })
        })
    }

    pub fn extract(&self, text: &str) -> Option<String> {
        self.extract_match(text).map(|m| m.name)
    }
}

/// Extracts a lower-case strain name from `text` with the default rule order.
pub fn extract_strain_name(text: &str) -> Option<String> {
    StrainNameExtractor::default().extract(text)
}
