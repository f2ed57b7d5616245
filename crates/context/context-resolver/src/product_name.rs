//! Display name derivation from a product description.

/// Name used when no product name can be derived.
pub const FALLBACK_PRODUCT_NAME: &str = "this product";

/// Derives a display name from the first sentence of `description`.
///
/// Keeps the text before `", also known as"`, else before `" is a "`, else before `" strain"`
/// (all ASCII case-insensitive); otherwise the first one or two words.
pub fn derive_product_name(description: &str) -> Option<String> {
    let first_sentence = description.split('.').next().unwrap_or_default().trim();
    let lower = first_sentence.to_ascii_lowercase();

    let name = [", also known as", " is a ", " strain"]
        .iter()
        .find_map(|marker| lower.find(marker).map(|pos| &first_sentence[..pos]))
        .map(str::to_string)
        .unwrap_or_else(|| {
            first_sentence
                .split_whitespace()
                .take(2)
                .collect::<Vec<_>>()
                .join(" ")
        });

    let name = name
        .trim()
        .trim_matches(|c: char| c == '"' || c == '“' || c == '”' || c == ',')
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// [`derive_product_name`] with [`FALLBACK_PRODUCT_NAME`] when nothing can be derived.
pub fn get_product_name(description: &str) -> String {
    derive_product_name(description).unwrap_or_else(|| FALLBACK_PRODUCT_NAME.to_string())
}

/// Case-insensitive name equality, ignoring surrounding and repeated whitespace.
pub fn names_match(a: &str, b: &str) -> bool {
    let norm = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    norm(a) == norm(b)
}
