//! Advisory intent selection.

use crate::error::SpendlyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The financial-advisory mode selected for a conversation turn.
///
/// The intent controls which optional structured fields are attached to a
/// message request and how the reply is interpreted: only loan turns carry
/// the [`LoanDetails`] fields, and only spending-plan replies update the
/// derived category breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Monthly budget breakdown built from an uploaded statement.
    #[default]
    SpendingPlan,
    /// Guided tax-saving walkthrough.
    TaxSaver,
    /// Broad investment plan suggestions.
    Investment,
    /// Loan eligibility estimate.
    Loan,
}

impl Intent {
    /// The wire name used in message requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SpendingPlan => "spending_plan",
            Intent::TaxSaver => "tax_saver",
            Intent::Investment => "investment",
            Intent::Loan => "loan",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = SpendlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_plan" => Ok(Intent::SpendingPlan),
            "tax_saver" => Ok(Intent::TaxSaver),
            "investment" => Ok(Intent::Investment),
            "loan" => Ok(Intent::Loan),
            other => Err(SpendlyError::Serialization(format!(
                "Unknown intent: {}",
                other
            ))),
        }
    }
}

/// Optional structured fields attached to loan-intent requests.
///
/// Values persist once entered, including across intent changes; they are
/// transmitted only while the selected intent is [`Intent::Loan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    /// CIBIL credit score.
    pub cibil_score: Option<u32>,
    /// Monthly take-home income.
    pub monthly_income: Option<f64>,
    /// Total of existing EMIs.
    pub existing_emi: Option<f64>,
}

impl LoanDetails {
    /// Returns true if none of the fields have been entered.
    pub fn is_empty(&self) -> bool {
        self.cibil_score.is_none() && self.monthly_income.is_none() && self.existing_emi.is_none()
    }
}
