//! # Context Resolution
//!
//! Decides, for each customer question, which product description grounds the answer and
//! whether the conversation moved to a different product.
//!
//! ## Components
//!
//! - [`StrainNameExtractor`] – ordered rules pulling a strain name out of free text
//! - [`TopicChangeDetector`] – same product or a new one, given the current context
//! - [`ProductRetriever`] – lookups by query embedding and by strain name
//! - [`ContextResolver`] – sequences the above into a [`Resolution`]
//!
//! Retrieval and similarity failures never escape [`ContextResolver::resolve`]; they degrade to
//! "no match" or "same topic" and are logged.

mod product_name;
mod resolver;
mod retrieval;
mod strain_name;
mod topic;

pub use product_name::{derive_product_name, get_product_name, names_match, FALLBACK_PRODUCT_NAME};
pub use resolver::{ContextResolver, Resolution};
pub use retrieval::{
    ProductRetriever, Retrieval, RetrievalError, NAME_MAX_DISTANCE, NAME_WORD_WINDOW,
    QUERY_MAX_DISTANCE, QUERY_TOP_K,
};
pub use strain_name::{
    extract_strain_name, StrainMatch, StrainNameExtractor, StrainRule, KNOWN_STRAINS,
};
pub use topic::{
    has_follow_up_indicator, references_product, TopicChangeDetector, DEFAULT_TOPIC_THRESHOLD,
    FOLLOW_UP_INDICATORS,
};
