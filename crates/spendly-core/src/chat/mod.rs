//! Conversation domain module.
//!
//! This module contains the types that make up one chat view's state:
//!
//! - `intent`: Advisory mode selection (`Intent`) and loan fields (`LoanDetails`)
//! - `message`: Chat ledger entries (`ChatRole`, `ChatEntry`)

mod intent;
mod message;

// Re-export public API
pub use intent::{Intent, LoanDetails};
pub use message::{ChatEntry, ChatRole};

use std::collections::HashMap;

/// Category label mapped to its share of monthly spend, in percent.
///
/// Attached to spending-plan replies and kept as the latest derived summary.
pub type SpendingBreakdown = HashMap<String, f64>;
