//! Additive reducers over `(key, amount)` pairs.
//!
//! Every other component consumes or produces the mappings built here.

use crate::error::{Result, SettleError};
use std::collections::HashMap;
use std::hash::Hash;

/// Pairwise transfers: `(source, sink) -> amount` means "source pays sink amount".
pub type Transfers<T> = HashMap<(T, T), i64>;

/// Adds `amount` to the transfer recorded for `pair`.
///
/// Fails with [`SettleError::Overflow`] instead of wrapping.
pub fn accumulate<T>(transfers: &mut Transfers<T>, pair: (T, T), amount: i64) -> Result<()>
where
    T: Eq + Hash,
{
    let total = transfers.entry(pair).or_insert(0);
    *total = total
        .checked_add(amount)
        .ok_or_else(|| SettleError::Overflow(format!("transfer total plus {}", amount)))?;
    Ok(())
}

/// Folds `(key, amount)` pairs additively, keeping keys that total zero.
pub fn sum_by_with_zeros<K, I>(pairs: I) -> HashMap<K, i64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, i64)>,
{
    let mut result = HashMap::new();
    for (key, amount) in pairs {
        *result.entry(key).or_insert(0) += amount;
    }
    result
}

/// Folds `(key, amount)` pairs additively and drops keys that total zero.
pub fn sum_by<K, I>(pairs: I) -> HashMap<K, i64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, i64)>,
{
    let mut result = sum_by_with_zeros(pairs);
    result.retain(|_, amount| *amount != 0);
    result
}

/// Adds several mappings together. Zero totals are kept.
pub fn merge<K, I>(mappings: I) -> HashMap<K, i64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = HashMap<K, i64>>,
{
    sum_by_with_zeros(mappings.into_iter().flatten())
}

/// Splits a mapping into sub-mappings sharing the same derived group,
/// e.g. accounts partitioned by currency before each currency is netted.
pub fn group_by<K, G, F>(amounts: HashMap<K, i64>, mut key_fn: F) -> HashMap<G, HashMap<K, i64>>
where
    K: Eq + Hash,
    G: Eq + Hash,
    F: FnMut(&K) -> G,
{
    let mut result: HashMap<G, HashMap<K, i64>> = HashMap::new();
    for (key, amount) in amounts {
        result.entry(key_fn(&key)).or_default().insert(key, amount);
    }
    result
}
