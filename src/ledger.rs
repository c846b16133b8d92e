//! Sign-bucketed multiset of `(amount, party)` pairs.
//!
//! Parties are grouped into three buckets by the sign of their balance. Inside
//! a bucket, each exact amount maps to a stack of the parties currently holding
//! it.
//!
//! # Invariants
//!
//! - An amount key is present only while its stack is non-empty
//! - The ledger is empty iff all three buckets are empty
//!
//! # Selection order
//!
//! [`Ledger::pop`] is LIFO for an exact amount. [`Ledger::pop_by_sign`] takes
//! the smallest amount key of the preferred bucket and, for that amount, the
//! party that was pushed first. Both rules are deterministic, so the same input
//! order always produces the same transfers.

use crate::error::{Result, SettleError};
use std::collections::{BTreeMap, VecDeque};

type Bucket<T> = BTreeMap<i64, VecDeque<T>>;

const NEGATIVE: usize = 0;
const ZERO: usize = 1;
const POSITIVE: usize = 2;

fn bucket_of(amount: i64) -> usize {
    match amount.signum() {
        -1 => NEGATIVE,
        0 => ZERO,
        _ => POSITIVE,
    }
}

/// Balances awaiting settlement, partitioned by sign.
#[derive(Debug, Clone)]
pub struct Ledger<T> {
    buckets: [Bucket<T>; 3],
    len: usize,
}

impl<T> Ledger<T> {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            buckets: [BTreeMap::new(), BTreeMap::new(), BTreeMap::new()],
            len: 0,
        }
    }

    /// Records that `party` currently holds `amount`. Zero is allowed.
    pub fn push(&mut self, amount: i64, party: T) {
        self.buckets[bucket_of(amount)]
            .entry(amount)
            .or_default()
            .push_back(party);
        self.len += 1;
    }

    /// Removes the most recently pushed party holding exactly `amount`.
    pub fn pop(&mut self, amount: i64) -> Result<T> {
        let bucket = &mut self.buckets[bucket_of(amount)];
        let stack = bucket
            .get_mut(&amount)
            .ok_or(SettleError::NotFound { amount })?;
        let party = stack.pop_back().ok_or(SettleError::NotFound { amount })?;
        if stack.is_empty() {
            bucket.remove(&amount);
        }
        self.len -= 1;
        Ok(party)
    }

    /// Removes some party, preferring the bucket of `amount`'s sign, then the
    /// opposite sign, then zero.
    ///
    /// Fails only when the ledger is empty.
    pub fn pop_by_sign(&mut self, amount: i64) -> Result<(i64, T)> {
        let preferred = bucket_of(amount);
        let order = match preferred {
            NEGATIVE => [NEGATIVE, POSITIVE, ZERO],
            POSITIVE => [POSITIVE, NEGATIVE, ZERO],
            _ => [ZERO, NEGATIVE, POSITIVE],
        };

        for index in order {
            let bucket = &mut self.buckets[index];
            if let Some(mut entry) = bucket.first_entry() {
                let found = *entry.key();
                let stack = entry.get_mut();
                if let Some(party) = stack.pop_front() {
                    if stack.is_empty() {
                        entry.remove();
                    }
                    self.len -= 1;
                    return Ok((found, party));
                }
            }
        }

        Err(SettleError::NotFound { amount })
    }

    /// Returns `true` if some party holds exactly `amount`.
    pub fn holds(&self, amount: i64) -> bool {
        self.buckets[bucket_of(amount)].contains_key(&amount)
    }

    /// Number of `(amount, party)` entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` once no bucket holds any entry.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of all amounts currently held.
    pub fn total(&self) -> i64 {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter())
            .map(|(amount, stack)| amount * stack.len() as i64)
            .sum()
    }
}

impl<T> Default for Ledger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(T, i64)> for Ledger<T> {
    fn from_iter<I: IntoIterator<Item = (T, i64)>>(pairs: I) -> Self {
        let mut ledger = Ledger::new();
        for (party, amount) in pairs {
            ledger.push(amount, party);
        }
        ledger
    }
}
