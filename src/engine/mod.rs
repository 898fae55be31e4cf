//! Cash-allocation engine
//!
//! Every function here works on a [`LedgerData`](crate::storage::LedgerData)
//! borrowed from an open transaction and never commits by itself:
//!
//! - `deposit_logical` / `extract_cash`: account-level logical credit and
//!   cascading physical extraction
//! - `calculate_impact` / `apply_plan` / `reallocate`: deposit distribution

pub mod deposit;
pub mod distribution;
pub mod extraction;

pub use deposit::{deposit_logical, SubAccountCredit};
pub use distribution::{
    apply_plan, calculate_impact, reallocate, unbacked_sub_accounts, AccountShare, ApplySummary,
    CashChange, DistributionPlan, ExpenseLine,
};
pub use extraction::{extract_cash, ExtractionSummary, SubAccountExtraction};
