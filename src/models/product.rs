//! Product record and its field rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static SKU_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[a-z]+-[a-z]+-[a-z]+").expect("sku pattern is a valid regex")
});

/// A product as stored and as accepted on state-mutating routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    /// Assigned by the store; ignored on input.
    #[serde(default)]
    pub id: u64,

    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(exclusive_min = 0.0, message = "price must be greater than zero"))]
    pub price: f64,

    #[validate(
        length(min = 1, message = "sku is required"),
        custom(function = "validate_sku")
    )]
    pub sku: String,
}

/// Accepts values holding exactly one `word-word-word` run of lowercase letters.
fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    if SKU_PATTERN.find_iter(sku).count() == 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("sku");
        err.message = Some("sku must look like abc-def-ghi".into());
        Err(err)
    }
}
