//! Double-entry lines derived from transfer mappings.

use crate::aggregate::{sum_by, Transfers};
use std::collections::HashMap;
use std::hash::Hash;

/// One side of a booked transfer: `source` pays `sink` `amount`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entry<T> {
    pub source: T,
    pub sink: T,
    pub amount: i64,
}

/// Expands every transfer into its two opposite lines, so the lines of each
/// transfer sum to zero. Zero transfers are dropped. Output is sorted.
pub fn mirror<T>(transfers: Transfers<T>) -> Vec<Entry<T>>
where
    T: Ord + Clone,
{
    let mut entries: Vec<Entry<T>> = transfers
        .into_iter()
        .filter(|(_, amount)| *amount != 0)
        .flat_map(|((source, sink), amount)| {
            [
                Entry {
                    source: source.clone(),
                    sink: sink.clone(),
                    amount,
                },
                Entry {
                    source: sink,
                    sink: source,
                    amount: -amount,
                },
            ]
        })
        .collect();
    entries.sort();
    entries
}

/// What each party ends up with: incoming minus outgoing, zeros pruned.
pub fn net_positions<T>(entries: &[Entry<T>]) -> HashMap<T, i64>
where
    T: Eq + Hash + Clone,
{
    sum_by(entries.iter().map(|entry| (entry.sink.clone(), entry.amount)))
}
