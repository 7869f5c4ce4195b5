use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "electronics";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One catalog entry.
///
/// `keywords` holds the distinct tokens used for scoring, in the order they first
/// appeared in the source keyword string. Tokens keep their case and are matched
/// against a lowercased utterance, so a mixed-case token never scores. An empty
/// set is valid and means the entry can never score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
    pub keywords: Vec<String>,
}

impl ProductRecord {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        category: Option<String>,
        keywords: &str,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.filter(|value| !value.trim().is_empty()),
            keywords: keyword_tokens(keywords),
        }
    }

    pub fn category_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(default)
    }

    /// Price as shown to shoppers: exact decimal, no trailing zeros.
    pub fn display_price(&self) -> String {
        self.price.normalize().to_string()
    }

    /// Number of distinct keyword tokens found anywhere in `utterance`.
    pub fn keyword_score(&self, utterance: &str) -> usize {
        self.keywords.iter().filter(|keyword| utterance.contains(keyword.as_str())).count()
    }
}

pub fn keyword_tokens(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in raw.split_whitespace() {
        if !tokens.iter().any(|seen| seen == token) {
            tokens.push(token.to_owned());
        }
    }
    tokens
}
