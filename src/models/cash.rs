//! Physical cash: denomination vectors and cash stores
//!
//! A [`DenominationVector`] is a plain count-per-denomination value. A
//! [`CashStore`] wraps one vector together with its cached total and knows
//! how to greedily take notes from, or hand notes to, another vector.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::denomination::{Denomination, DENOMINATION_COUNT};
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Largest count of a single denomination accepted from outside the ledger
pub const MAX_PIECE_COUNT: u64 = 1_000_000_000;

/// Count of notes/coins per legal denomination
///
/// Counts are unsigned, so a vector can never hold a negative count; any
/// subtraction that would need one fails with
/// [`LedgerError::NegativeCount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, u64>", try_from = "BTreeMap<String, i64>")]
pub struct DenominationVector {
    counts: [u64; DENOMINATION_COUNT],
}

impl DenominationVector {
    /// An empty vector
    pub const fn new() -> Self {
        Self {
            counts: [0; DENOMINATION_COUNT],
        }
    }

    /// Build a vector from (denomination, count) pairs; repeated
    /// denominations accumulate
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Denomination, u64)>,
    {
        let mut vector = Self::new();
        for (denomination, count) in entries {
            vector.add_count(denomination, count);
        }
        vector
    }

    /// Build a vector from an external key → count map
    ///
    /// Rejects unknown keys, negative counts and counts above
    /// [`MAX_PIECE_COUNT`].
    pub fn from_external_map<K: AsRef<str>>(map: &HashMap<K, i64>) -> LedgerResult<Self> {
        let mut vector = Self::new();
        for (key, &count) in map {
            let key = key.as_ref();
            let denomination = Denomination::from_key(key).ok_or_else(|| {
                LedgerError::InvalidDenomination(format!("unknown denomination '{}'", key))
            })?;
            if count < 0 {
                return Err(LedgerError::InvalidDenomination(format!(
                    "negative count {} for {}",
                    count, denomination
                )));
            }
            let count = count as u64;
            if count > MAX_PIECE_COUNT {
                return Err(LedgerError::InvalidDenomination(format!(
                    "count {} for {} exceeds the limit of {}",
                    count, denomination, MAX_PIECE_COUNT
                )));
            }
            vector.add_count(denomination, count);
        }
        Ok(vector)
    }

    /// Key → count map with every legal denomination present
    pub fn to_external_map(&self) -> BTreeMap<String, u64> {
        Denomination::ALL
            .into_iter()
            .map(|d| (d.key().to_string(), self.count(d)))
            .collect()
    }

    /// Count held for one denomination
    pub fn count(&self, denomination: Denomination) -> u64 {
        self.counts[denomination.index()]
    }

    /// Overwrite the count for one denomination
    pub fn set_count(&mut self, denomination: Denomination, count: u64) {
        self.counts[denomination.index()] = count;
    }

    /// Add units of one denomination
    pub fn add_count(&mut self, denomination: Denomination, count: u64) {
        let slot = &mut self.counts[denomination.index()];
        *slot = slot.saturating_add(count);
    }

    /// Remove units of one denomination
    pub fn remove_count(&mut self, denomination: Denomination, count: u64) -> LedgerResult<()> {
        let available = self.count(denomination);
        if count > available {
            return Err(LedgerError::NegativeCount {
                denomination,
                available,
                requested: count,
            });
        }
        self.counts[denomination.index()] = available - count;
        Ok(())
    }

    /// Element-wise sum
    pub fn add(&self, other: &Self) -> Self {
        let mut result = *self;
        result.merge(other);
        result
    }

    /// Element-wise sum into this vector
    pub fn merge(&mut self, other: &Self) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine = mine.saturating_add(*theirs);
        }
    }

    /// Element-wise difference; fails if any count would go negative
    pub fn checked_sub(&self, other: &Self) -> LedgerResult<Self> {
        let mut result = *self;
        for denomination in Denomination::ALL {
            result.remove_count(denomination, other.count(denomination))?;
        }
        Ok(result)
    }

    /// Every count multiplied by `factor`
    pub fn scale(&self, factor: u64) -> Self {
        let mut result = *self;
        for count in result.counts.iter_mut() {
            *count = count.saturating_mul(factor);
        }
        result
    }

    /// True when this vector holds at least as many of every denomination
    /// as `other`
    pub fn covers(&self, other: &Self) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .all(|(mine, theirs)| mine >= theirs)
    }

    /// Total face value
    ///
    /// Saturates at the largest representable amount instead of wrapping.
    pub fn total_value(&self) -> Money {
        let cents = Denomination::ALL.into_iter().fold(0i64, |total, d| {
            let count = i64::try_from(self.count(d)).unwrap_or(i64::MAX);
            total.saturating_add(d.cents().saturating_mul(count))
        });
        Money::from_cents(cents)
    }

    /// True when every count is zero
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Total number of notes and coins
    pub fn piece_count(&self) -> u64 {
        self.counts.iter().fold(0u64, |total, &c| total.saturating_add(c))
    }

    /// Non-zero entries, largest face value first
    pub fn non_empty_entries(&self) -> Vec<(Denomination, u64)> {
        Denomination::ALL
            .into_iter()
            .map(|d| (d, self.count(d)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

impl fmt::Display for DenominationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.non_empty_entries();
        if entries.is_empty() {
            return write!(f, "nothing");
        }
        let parts: Vec<String> = entries
            .iter()
            .map(|(d, count)| format!("{}x{}", count, d))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl From<DenominationVector> for BTreeMap<String, u64> {
    fn from(vector: DenominationVector) -> Self {
        vector.to_external_map()
    }
}

impl TryFrom<BTreeMap<String, i64>> for DenominationVector {
    type Error = LedgerError;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        let map: HashMap<String, i64> = map.into_iter().collect();
        Self::from_external_map(&map)
    }
}

/// A container of physical cash ("monto")
///
/// Owns exactly one [`DenominationVector`]. The cached total is never
/// persisted; it is rebuilt from the counts when the store is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "DenominationVector", into = "DenominationVector")]
pub struct CashStore {
    vector: DenominationVector,
    total: Money,
}

impl CashStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `vector`
    pub fn with_vector(vector: DenominationVector) -> Self {
        let total = vector.total_value();
        Self { vector, total }
    }

    /// The physical inventory
    pub fn vector(&self) -> &DenominationVector {
        &self.vector
    }

    /// Cached total value
    pub fn total(&self) -> Money {
        self.total
    }

    /// True when the store holds no cash
    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    /// Merge `cash` into the store
    pub fn add(&mut self, cash: &DenominationVector) {
        self.vector.merge(cash);
        self.total += cash.total_value();
    }

    /// Greedily move notes from `requested` into this store, up to `target`
    ///
    /// Walks the denominations from largest to smallest and, for each one,
    /// takes `min(available, floor(remaining / face value))` units. Taken
    /// units are removed from `requested` so the caller can offer what is
    /// left to the next destination. Returns the value actually inserted.
    ///
    /// This is a single pass with no backtracking: offered `{50:1, 20:3}`
    /// with a target of 60, it takes the 50 and then cannot fit a 20 into
    /// the remaining 10, so only 50 is inserted even though three 20s would
    /// have matched exactly.
    pub fn insert(&mut self, requested: &mut DenominationVector, target: Money) -> Money {
        let mut remaining = target.cents().max(0);
        for denomination in Denomination::ALL {
            let available = requested.count(denomination);
            let face = denomination.cents();
            if available == 0 || remaining < face {
                continue;
            }
            let take = available.min((remaining / face) as u64);
            requested.set_count(denomination, available - take);
            self.vector.add_count(denomination, take);
            remaining -= face * take as i64;
        }
        let inserted = Money::from_cents(target.cents().max(0) - remaining);
        self.total += inserted;
        inserted
    }

    /// Remove up to the requested count of each denomination
    ///
    /// Never fails on short stock: returns whatever could be removed and its
    /// value, which the caller compares against the request.
    pub fn extract(&mut self, requested: &DenominationVector) -> (DenominationVector, Money) {
        let mut extracted = DenominationVector::new();
        for (denomination, wanted) in requested.non_empty_entries() {
            let available = self.vector.count(denomination);
            let take = wanted.min(available);
            if take == 0 {
                continue;
            }
            self.vector.set_count(denomination, available - take);
            extracted.add_count(denomination, take);
        }
        let value = extracted.total_value();
        self.total -= value;
        (extracted, value)
    }

    /// Move the whole inventory into `other`, leaving this store empty
    pub fn move_all_to(&mut self, other: &mut CashStore) {
        other.add(&self.vector);
        self.clear();
    }

    /// Take the whole inventory out of the store
    pub fn take_all(&mut self) -> DenominationVector {
        let vector = self.vector;
        self.clear();
        vector
    }

    /// Reset to empty
    pub fn clear(&mut self) {
        self.vector = DenominationVector::new();
        self.total = Money::zero();
    }
}

impl From<DenominationVector> for CashStore {
    fn from(vector: DenominationVector) -> Self {
        Self::with_vector(vector)
    }
}

impl From<CashStore> for DenominationVector {
    fn from(store: CashStore) -> Self {
        store.vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Denomination::*;

    fn vector(entries: &[(Denomination, u64)]) -> DenominationVector {
        DenominationVector::from_entries(entries.iter().copied())
    }

    #[test]
    fn test_total_value_is_exact() {
        let v = vector(&[(Fifty, 1), (TwentyCents, 3), (OneCent, 7)]);
        assert_eq!(v.total_value(), Money::from_cents(5067));

        // ten thousand ten-cent coins add up to exactly $1000.00
        let coins = vector(&[(TenCents, 10_000)]);
        assert_eq!(coins.total_value(), Money::from_cents(100_000));
    }

    #[test]
    fn test_add_and_checked_sub() {
        let a = vector(&[(Twenty, 2), (Five, 1)]);
        let b = vector(&[(Twenty, 1), (One, 3)]);

        let sum = a.add(&b);
        assert_eq!(sum.count(Twenty), 3);
        assert_eq!(sum.count(One), 3);

        let diff = sum.checked_sub(&b).unwrap();
        assert_eq!(diff, a);

        let err = a.checked_sub(&b).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NegativeCount {
                denomination: One,
                available: 0,
                requested: 3
            }
        ));
    }

    #[test]
    fn test_scale_and_covers() {
        let a = vector(&[(Ten, 1), (TwoCents, 2)]);
        let tripled = a.scale(3);
        assert_eq!(tripled.count(Ten), 3);
        assert_eq!(tripled.count(TwoCents), 6);
        assert!(tripled.covers(&a));
        assert!(!a.covers(&tripled));
        assert!(a.covers(&DenominationVector::new()));
    }

    #[test]
    fn test_non_empty_entries_are_ordered() {
        let v = vector(&[(OneCent, 1), (Fifty, 2), (Five, 0), (Two, 4)]);
        assert_eq!(v.non_empty_entries(), vec![(Fifty, 2), (Two, 4), (OneCent, 1)]);
        assert!(DenominationVector::new().non_empty_entries().is_empty());
    }

    #[test]
    fn test_external_map_validation() {
        let mut map = HashMap::new();
        map.insert("50", 2);
        map.insert("0.5", 1);
        let v = DenominationVector::from_external_map(&map).unwrap();
        assert_eq!(v.count(Fifty), 2);
        assert_eq!(v.count(FiftyCents), 1);

        map.insert("3", 1);
        assert!(matches!(
            DenominationVector::from_external_map(&map),
            Err(LedgerError::InvalidDenomination(_))
        ));

        let mut negative = HashMap::new();
        negative.insert("20", -1);
        assert!(matches!(
            DenominationVector::from_external_map(&negative),
            Err(LedgerError::InvalidDenomination(_))
        ));

        let mut near_miss = HashMap::new();
        near_miss.insert("0.509", 3);
        assert!(matches!(
            DenominationVector::from_external_map(&near_miss),
            Err(LedgerError::InvalidDenomination(_))
        ));
    }

    #[test]
    fn test_external_map_bounds_counts() {
        let mut at_limit = HashMap::new();
        at_limit.insert("50", MAX_PIECE_COUNT as i64);
        let v = DenominationVector::from_external_map(&at_limit).unwrap();
        assert_eq!(v.total_value(), Money::from_cents(5_000 * MAX_PIECE_COUNT as i64));

        let mut huge = HashMap::new();
        huge.insert("50", 2_000_000_000_000_000);
        assert!(matches!(
            DenominationVector::from_external_map(&huge),
            Err(LedgerError::InvalidDenomination(_))
        ));

        let stored = r#"{"50": 2000000000000000}"#;
        assert!(serde_json::from_str::<DenominationVector>(stored).is_err());
    }

    #[test]
    fn test_large_counts_saturate_instead_of_overflowing() {
        let mut v = vector(&[(Fifty, u64::MAX)]);
        assert_eq!(v.total_value(), Money::from_cents(i64::MAX));

        v.add_count(Fifty, 1);
        assert_eq!(v.count(Fifty), u64::MAX);
        assert_eq!(v.scale(2).count(Fifty), u64::MAX);
        assert_eq!(v.add(&v).piece_count(), u64::MAX);
    }

    #[test]
    fn test_serialized_as_full_count_map() {
        let v = vector(&[(Twenty, 2)]);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["20"], 2);
        assert_eq!(json["0.01"], 0);
        assert_eq!(json.as_object().unwrap().len(), DENOMINATION_COUNT);

        let back: DenominationVector = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);

        assert!(serde_json::from_str::<DenominationVector>(r#"{"20": -1}"#).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(vector(&[(Fifty, 2), (TenCents, 1)]).to_string(), "2x50, 1x0.10");
        assert_eq!(DenominationVector::new().to_string(), "nothing");
    }

    #[test]
    fn test_insert_takes_largest_first() {
        let mut offered = vector(&[(Fifty, 1), (Twenty, 3)]);
        let mut store = CashStore::new();

        let inserted = store.insert(&mut offered, Money::from_cents(7000));

        assert_eq!(inserted, Money::from_cents(7000));
        assert_eq!(store.vector(), &vector(&[(Fifty, 1), (Twenty, 1)]));
        assert_eq!(offered, vector(&[(Twenty, 2)]));
        assert_eq!(store.total(), Money::from_cents(7000));
    }

    #[test]
    fn test_insert_greedy_trap_is_preserved() {
        let mut offered = vector(&[(Fifty, 1), (Twenty, 3)]);
        let mut store = CashStore::new();

        let inserted = store.insert(&mut offered, Money::from_cents(6000));

        // three 20s would match exactly, but the pass never backtracks
        assert_eq!(inserted, Money::from_cents(5000));
        assert_eq!(offered, vector(&[(Twenty, 3)]));
        assert_eq!(store.vector(), &vector(&[(Fifty, 1)]));
    }

    #[test]
    fn test_insert_with_zero_or_negative_target() {
        let mut offered = vector(&[(One, 5)]);
        let mut store = CashStore::new();
        assert_eq!(store.insert(&mut offered, Money::zero()), Money::zero());
        assert_eq!(store.insert(&mut offered, Money::from_cents(-300)), Money::zero());
        assert_eq!(offered.count(One), 5);
        assert!(store.is_empty());
    }

    #[test]
    fn test_extract_partial_never_fails() {
        let mut store = CashStore::with_vector(vector(&[(Twenty, 1), (Five, 2)]));
        let (taken, value) = store.extract(&vector(&[(Twenty, 2), (Ten, 1)]));

        assert_eq!(taken, vector(&[(Twenty, 1)]));
        assert_eq!(value, Money::from_cents(2000));
        assert_eq!(store.vector(), &vector(&[(Five, 2)]));
        assert_eq!(store.total(), Money::from_cents(1000));
    }

    #[test]
    fn test_move_all_to() {
        let mut source = CashStore::with_vector(vector(&[(Ten, 2)]));
        let mut target = CashStore::with_vector(vector(&[(Ten, 1), (One, 1)]));

        source.move_all_to(&mut target);

        assert!(source.is_empty());
        assert_eq!(source.total(), Money::zero());
        assert_eq!(target.vector(), &vector(&[(Ten, 3), (One, 1)]));
        assert_eq!(target.total(), Money::from_cents(3100));
    }

    #[test]
    fn test_store_total_rebuilt_on_load() {
        let store = CashStore::with_vector(vector(&[(Five, 3)]));
        let json = serde_json::to_string(&store).unwrap();
        let loaded: CashStore = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.total(), Money::from_cents(1500));
        assert_eq!(loaded, store);
    }
}
