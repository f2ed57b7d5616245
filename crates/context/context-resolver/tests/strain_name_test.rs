//! Rule-order tests for [`context_resolver::StrainNameExtractor`].

use context_resolver::{extract_strain_name, StrainNameExtractor, StrainRule, KNOWN_STRAINS};

/// **Test: Every curated name is found case-insensitively, whatever surrounds it.**
#[test]
fn test_every_curated_name_is_found_in_context() {
    for name in KNOWN_STRAINS {
        let upper = name.to_uppercase();
        let text = format!("Hey, quick one: is {} still in stock this week?", upper);
        let found = extract_strain_name(&text);
        assert_eq!(found.as_deref(), Some(*name), "text: {}", text);
    }
}

/// **Test: "Tell me about the Blue Dream strain" yields "blue dream"; curated rule is checked first.**
#[test]
fn test_blue_dream_about_phrase_agrees_with_curated() {
    let text = "Tell me about the Blue Dream strain";
    let m = StrainNameExtractor::new().extract_match(text).unwrap();

    assert_eq!(m.name, "blue dream");
    assert_eq!(m.rule, StrainRule::Curated);
    assert_eq!(StrainRule::AboutPhrase.apply(text).as_deref(), Some("blue dream"));
}

/// **Test: When curated and pattern rules disagree, the curated rule wins.**
///
/// **Setup:** Text mentions a curated name early and asks "about" an uncurated one at the end.
/// **Expected:** Curated name is returned; the pattern rule alone would have returned the other.
#[test]
fn test_curated_rule_wins_when_rules_disagree() {
    let text = "I loved Blue Dream, now tell me about Lemon Skunk";

    assert_eq!(extract_strain_name(text).as_deref(), Some("blue dream"));
    assert_eq!(StrainRule::AboutPhrase.apply(text).as_deref(), Some("lemon skunk"));
}

/// **Test: About rule is checked before the what-is rule, which is checked before quotes.**
#[test]
fn test_pattern_rules_in_order() {
    let extractor = StrainNameExtractor::new();

    let about = extractor.extract_match("What is there to know about Tangie?").unwrap();
    assert_eq!(about.rule, StrainRule::AboutPhrase);
    assert_eq!(about.name, "tangie");

    let what_is = extractor
        .extract_match("I heard of \"Mango\" but what is Papaya Punch?")
        .unwrap();
    assert_eq!(what_is.rule, StrainRule::WhatIsPhrase);
    assert_eq!(what_is.name, "papaya punch");

    let quoted = extractor.extract_match("Rate \"Mango\" for me").unwrap();
    assert_eq!(quoted.rule, StrainRule::Quoted);
    assert_eq!(quoted.name, "mango");
}

/// **Test: Output is lower-case and whitespace-normalized.**
#[test]
fn test_output_is_normalized() {
    assert_eq!(
        extract_strain_name("Tell me about   Ice   Cream  CAKE?").as_deref(),
        Some("ice cream cake")
    );
}

/// **Test: Text with no rule match yields None.**
#[test]
fn test_absent_when_nothing_matches() {
    assert_eq!(extract_strain_name("How strong is it?"), None);
    assert_eq!(extract_strain_name("Do you deliver on weekends?"), None);
}

/// **Test: Phrases led by a possessive or an article are not strain names.**
#[test]
fn test_possessive_and_article_phrases_rejected() {
    assert_eq!(extract_strain_name("What is your return policy?"), None);
    assert_eq!(extract_strain_name("Tell me about my order"), None);
    assert_eq!(extract_strain_name("What's our discount?"), None);
    assert_eq!(extract_strain_name("What is an edible?"), None);
    assert_eq!(extract_strain_name("Tell me about a sativa"), None);
    assert_eq!(
        extract_strain_name("Tell me about Mango Tango").as_deref(),
        Some("mango tango")
    );
}
