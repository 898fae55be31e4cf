//! Legal cash denominations
//!
//! The set of notes and coins is closed: every physical count in the ledger
//! refers to one of these twelve face values, ordered from largest to
//! smallest.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::money::Money;

/// Number of legal denominations
pub const DENOMINATION_COUNT: usize = 12;

const KEY_ALIASES: [(&str, Denomination); 3] = [
    ("0.5", Denomination::FiftyCents),
    ("0.2", Denomination::TwentyCents),
    ("0.1", Denomination::TenCents),
];

/// One legal face value of physical currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Denomination {
    Fifty,
    Twenty,
    Ten,
    Five,
    Two,
    One,
    FiftyCents,
    TwentyCents,
    TenCents,
    FiveCents,
    TwoCents,
    OneCent,
}

impl Denomination {
    /// Every denomination, largest face value first
    pub const ALL: [Denomination; DENOMINATION_COUNT] = [
        Self::Fifty,
        Self::Twenty,
        Self::Ten,
        Self::Five,
        Self::Two,
        Self::One,
        Self::FiftyCents,
        Self::TwentyCents,
        Self::TenCents,
        Self::FiveCents,
        Self::TwoCents,
        Self::OneCent,
    ];

    /// Position in [`Denomination::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Face value in cents
    pub const fn cents(self) -> i64 {
        match self {
            Self::Fifty => 5000,
            Self::Twenty => 2000,
            Self::Ten => 1000,
            Self::Five => 500,
            Self::Two => 200,
            Self::One => 100,
            Self::FiftyCents => 50,
            Self::TwentyCents => 20,
            Self::TenCents => 10,
            Self::FiveCents => 5,
            Self::TwoCents => 2,
            Self::OneCent => 1,
        }
    }

    /// Face value as money
    pub const fn face_value(self) -> Money {
        Money::from_cents(self.cents())
    }

    /// External key used in maps, files and on the command line
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fifty => "50",
            Self::Twenty => "20",
            Self::Ten => "10",
            Self::Five => "5",
            Self::Two => "2",
            Self::One => "1",
            Self::FiftyCents => "0.50",
            Self::TwentyCents => "0.20",
            Self::TenCents => "0.10",
            Self::FiveCents => "0.05",
            Self::TwoCents => "0.02",
            Self::OneCent => "0.01",
        }
    }

    /// Look a denomination up by its key
    ///
    /// Only the exact keys are accepted, plus the one-decimal spellings
    /// "0.5", "0.2" and "0.1" of the larger coins. Surrounding whitespace is
    /// ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.key() == key)
            .or_else(|| {
                KEY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|&(_, d)| d)
            })
    }

    /// Whether this is a note rather than a coin
    pub const fn is_note(self) -> bool {
        self.cents() >= 500
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Denomination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Denomination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::from_key(&key)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown denomination '{}'", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_strictly_descending() {
        for pair in Denomination::ALL.windows(2) {
            assert!(pair[0].cents() > pair[1].cents());
        }
        for (i, d) in Denomination::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn test_key_lookup() {
        for d in Denomination::ALL {
            assert_eq!(Denomination::from_key(d.key()), Some(d));
        }
        assert_eq!(Denomination::from_key("0.5"), Some(Denomination::FiftyCents));
        assert_eq!(Denomination::from_key("100"), None);
        assert_eq!(Denomination::from_key("0.25"), None);
        assert_eq!(Denomination::from_key("-5"), None);
        assert_eq!(Denomination::from_key("abc"), None);
        assert_eq!(Denomination::from_key(" 20 "), Some(Denomination::Twenty));
    }

    #[test]
    fn test_key_lookup_rejects_near_misses() {
        for key in [
            "0.01abc", "0.019", "20.00xyz", "$50", "50.00", "0.509", "05", "", "0.5é", "é",
        ] {
            assert_eq!(Denomination::from_key(key), None, "key {:?}", key);
        }
    }

    #[test]
    fn test_face_values() {
        assert_eq!(Denomination::Fifty.face_value(), Money::from_cents(5000));
        assert_eq!(Denomination::OneCent.face_value(), Money::from_cents(1));
        assert!(Denomination::Five.is_note());
        assert!(!Denomination::Two.is_note());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Denomination::TwentyCents).unwrap();
        assert_eq!(json, "\"0.20\"");
        let back: Denomination = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Denomination::TwentyCents);
        assert!(serde_json::from_str::<Denomination>("\"3\"").is_err());
    }
}
