//! Cascading cash extraction across an account's sub-accounts

use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{AccountId, DenominationVector, Money, SubAccountId};
use crate::storage::LedgerData;

/// What one sub-account gave up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAccountExtraction {
    pub sub_account_id: SubAccountId,
    pub name: String,
    pub extracted: DenominationVector,
    pub value: Money,
}

/// Outcome of [`extract_cash`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub satisfied: bool,
    pub extracted: DenominationVector,
    pub not_satisfied: DenominationVector,
    pub breakdown: Vec<SubAccountExtraction>,
}

impl ExtractionSummary {
    fn nothing_requested() -> Self {
        Self {
            satisfied: true,
            extracted: DenominationVector::new(),
            not_satisfied: DenominationVector::new(),
            breakdown: Vec::new(),
        }
    }

    /// Face value of the cash produced
    pub fn extracted_value(&self) -> Money {
        self.extracted.total_value()
    }
}

/// Pull `requested` out of an account's physical cash
///
/// Sub-accounts are visited in creation order and each one is asked only for
/// what is still missing. The logical total of a sub-account drops by the
/// value it gives up. A short result is not an error: the summary reports
/// exactly what could not be produced and the caller decides whether to
/// drop the transaction.
pub fn extract_cash(
    ledger: &mut LedgerData,
    account_id: AccountId,
    requested: &DenominationVector,
) -> LedgerResult<ExtractionSummary> {
    if requested.is_empty() {
        return Ok(ExtractionSummary::nothing_requested());
    }

    ledger.account(account_id)?;

    let mut unsatisfied = *requested;
    let mut extracted = DenominationVector::new();
    let mut breakdown = Vec::new();

    for sub_id in ledger.sub_account_ids_of(account_id) {
        if unsatisfied.is_empty() {
            break;
        }
        let sub = ledger.sub_account_mut(sub_id)?;
        if sub.cash.is_empty() {
            continue;
        }

        let (taken, value) = sub.take_cash(&unsatisfied);
        if taken.is_empty() {
            continue;
        }

        debug!(sub_account = %sub.name, cash = %taken, value = %value, "extracted cash");
        unsatisfied = unsatisfied.checked_sub(&taken)?;
        extracted.merge(&taken);
        breakdown.push(SubAccountExtraction {
            sub_account_id: sub_id,
            name: sub.name.clone(),
            extracted: taken,
            value,
        });
    }

    if !unsatisfied.is_empty() {
        debug!(account = %account_id, missing = %unsatisfied, "extraction short");
    }

    Ok(ExtractionSummary {
        satisfied: unsatisfied.is_empty(),
        extracted,
        not_satisfied: unsatisfied,
        breakdown,
    })
}
