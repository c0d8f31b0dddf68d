//! Fee computation
//!
//! Materialises a student's fee structure into line items and sums them.
//! Amounts are integers in the smallest display unit; there is no rounding.

use thiserror::Error;

use crate::features::shared::validation::MAX_NAME_LENGTH;
use crate::models::{FeeItem, FeeStructure};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeeItemsError {
    #[error("At least one fee item is required")]
    Empty,

    #[error("Fee item {index} is missing a fee type")]
    MissingType { index: usize },

    #[error("Fee type at item {index} must be at most {MAX_NAME_LENGTH} characters")]
    TypeTooLong { index: usize },

    #[error("Fee item '{fee_type}' has a negative amount")]
    NegativeAmount { fee_type: String },

    #[error("Fee total is too large")]
    Overflow,
}

impl FeeStructure {
    /// Line items for every non-zero category, in a fixed category order
    pub fn to_fee_items(&self) -> Vec<FeeItem> {
        [
            ("Tuition", self.tuition),
            ("Transport", self.transport),
            ("Library", self.library),
            ("Laboratory", self.laboratory),
            ("Sports", self.sports),
            ("Examination", self.examination),
            ("Miscellaneous", self.miscellaneous),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount != 0)
        .map(|(fee_type, amount)| FeeItem {
            fee_type: fee_type.to_string(),
            amount,
            description: None,
        })
        .collect()
    }
}

/// Sum of item amounts
pub fn total_amount(items: &[FeeItem]) -> i64 {
    items.iter().map(|item| item.amount).sum()
}

/// Check a set of items and return their total
///
/// Rejects an empty list, blank fee types, negative amounts and totals that
/// would overflow.
pub fn validate_fee_items(items: &[FeeItem]) -> Result<i64, FeeItemsError> {
    if items.is_empty() {
        return Err(FeeItemsError::Empty);
    }

    let mut total: i64 = 0;
    for (index, item) in items.iter().enumerate() {
        let fee_type = item.fee_type.trim();
        if fee_type.is_empty() {
            return Err(FeeItemsError::MissingType { index });
        }
        if fee_type.chars().count() > MAX_NAME_LENGTH {
            return Err(FeeItemsError::TypeTooLong { index });
        }
        if item.amount < 0 {
            return Err(FeeItemsError::NegativeAmount {
                fee_type: fee_type.to_string(),
            });
        }
        total = total.checked_add(item.amount).ok_or(FeeItemsError::Overflow)?;
    }
    Ok(total)
}

/// Trim fee types and blank descriptions before storing
pub fn normalize_fee_items(items: Vec<FeeItem>) -> Vec<FeeItem> {
    items
        .into_iter()
        .map(|item| FeeItem {
            fee_type: item.fee_type.trim().to_string(),
            amount: item.amount,
            description: item
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
        .collect()
}
