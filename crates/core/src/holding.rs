use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// A record that can live in a [`HoldingsMap`], keyed by its security identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A committed holding from a consolidated account statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub folio: String,
    pub isin: String,
    pub valuation_date: Option<NaiveDate>,
    /// NAV per unit on `valuation_date`.
    pub price: Decimal,
    pub units: Decimal,
    pub cost_value: Decimal,
    pub market_value: Decimal,
}

impl Keyed for Holding {
    fn key(&self) -> &str {
        &self.isin
    }
}

/// A committed holding from a brokerage holdings statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerageHolding {
    pub isin: String,
    pub rate: Decimal,
    pub units: Decimal,
    pub value: Decimal,
}

impl Keyed for BrokerageHolding {
    fn key(&self) -> &str {
        &self.isin
    }
}

/// Where a draft record stands in its accumulation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// The value-bearing line has not been seen yet.
    AwaitingKey,
    /// Values are present but no security identifier is bound.
    AwaitingIdentifier,
    ReadyToCommit,
}

/// Committed records keyed by security identifier.
///
/// Keys are unique and a later insert under an existing key replaces the value
/// while keeping the key's original position, so iteration order is the order
/// in which identifiers were first committed.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsMap<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for HoldingsMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), index: HashMap::new() }
    }
}

impl<T: Keyed> HoldingsMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`, returning the record it replaced, if any.
    pub fn insert(&mut self, value: T) -> Option<T> {
        match self.index.get(value.key()) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], value)),
            None => {
                self.index.insert(value.key().to_string(), self.entries.len());
                self.entries.push(value);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Keyed::key)
    }

    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn into_values(self) -> Vec<T> {
        self.entries
    }
}

impl<'a, T> IntoIterator for &'a HoldingsMap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: Keyed> FromIterator<T> for HoldingsMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut map = Self::new();
        for value in iter {
            map.insert(value);
        }
        map
    }
}

impl<T: Serialize> Serialize for HoldingsMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}
