//! Quote record model.
//!
//! A `Quote` is a `{text, category}` pair. It has no identifier: two records
//! are the same quote when their `text` is exactly equal. This module also
//! holds the boundary checks used on import and on remote payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::QuoteError;

/// Category value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

/// A single quote record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body. Identity of the record.
    pub text: String,
    /// Free-form category label.
    pub category: String,
}

impl Quote {
    /// Build a quote from user input, trimming both fields.
    ///
    /// Returns `QuoteError::Validation` when either field is empty after trimming.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation("quote text is required".to_string()));
        }
        if category.is_empty() {
            return Err(QuoteError::Validation("quote category is required".to_string()));
        }
        Ok(Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Accept an untyped JSON record only if `text` and `category` are both
    /// present, are strings and are not blank. Values are kept verbatim.
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = value.get("text")?.as_str()?;
        let category = value.get("category")?.as_str()?;
        if text.trim().is_empty() || category.trim().is_empty() {
            return None;
        }
        Some(Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// `true` when the record satisfies the stored-record invariant.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" — ({})", self.text, self.category)
    }
}

/// Built-in list used when nothing usable is persisted yet.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote {
            text: "Believe in yourself".to_string(),
            category: "Motivation".to_string(),
        },
        Quote {
            text: "Patience is power".to_string(),
            category: "Wisdom".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_trims_fields() {
        let quote = Quote::new("  Stay hungry ", "\tLife ").unwrap();
        assert_eq!(quote.text, "Stay hungry");
        assert_eq!(quote.category, "Life");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert!(Quote::new("", "x").unwrap_err().is_validation());
        assert!(Quote::new("x", "   ").unwrap_err().is_validation());
    }

    #[test]
    fn from_value_requires_string_fields() {
        assert!(Quote::from_value(&json!({"text": "a", "category": "b"})).is_some());
        assert!(Quote::from_value(&json!({"text": "a"})).is_none());
        assert!(Quote::from_value(&json!({"text": 7, "category": "b"})).is_none());
        assert!(Quote::from_value(&json!({"text": "a", "category": ""})).is_none());
        assert!(Quote::from_value(&json!("just a string")).is_none());
    }

    #[test]
    fn display_matches_page_format() {
        let quote = Quote::new("Patience is power", "Wisdom").unwrap();
        assert_eq!(quote.to_string(), "\"Patience is power\" — (Wisdom)");
    }
}
