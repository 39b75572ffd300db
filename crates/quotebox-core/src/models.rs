//! Data models for Quotebox
//!
//! Defines the quote record and the category filter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QuoteError, QuoteResult};

/// Sentinel stored and displayed for "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// A quote and the category it belongs to
///
/// Quotes have no identifier; two quotes are the same quote when their
/// `text` is equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Create a quote, trimming both fields
    ///
    /// Fails with [`QuoteError::Validation`] if either field is blank, or if
    /// the category is [`ALL_CATEGORIES`], which the filter reserves for
    /// "no filter".
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> QuoteResult<Self> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(QuoteError::Validation {
                field: "text",
                reason: "must not be empty",
            });
        }
        if category.is_empty() {
            return Err(QuoteError::Validation {
                field: "category",
                reason: "must not be empty",
            });
        }
        if category == ALL_CATEGORIES {
            return Err(QuoteError::Validation {
                field: "category",
                reason: "\"all\" is reserved for showing every category",
            });
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Validate an untyped JSON element
    ///
    /// Returns `None` unless `text` and `category` are both present,
    /// string-typed and non-blank. Extra fields are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = value.get("text")?.as_str()?;
        let category = value.get("category")?.as_str()?;
        Self::new(text, category).ok()
    }
}

/// The quotes every fresh store starts with
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote {
            text: "The only limit to our realization of tomorrow is our doubts of today."
                .to_string(),
            category: "Motivation".to_string(),
        },
        Quote {
            text: "JavaScript is the language of the web.".to_string(),
            category: "Technology".to_string(),
        },
        Quote {
            text: "Success is not final, failure is not fatal.".to_string(),
            category: "Inspiration".to_string(),
        },
    ]
}

/// Active category filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering
    #[default]
    All,
    /// Only quotes in this category
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied filter value
    ///
    /// `"all"` and blank input mean [`CategoryFilter::All`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    /// Value written to storage
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(name) => name,
        }
    }

    /// Check whether a quote passes this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category == *name,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
