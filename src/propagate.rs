//! Flattening hierarchical balances into pairwise transfers.
//!
//! [`double_entrify_by`] pushes every balance from the leaves of a forest up
//! to its roots, one edge at a time, in Kahn order. [`double_entrify`] is the
//! full allocation pass: reroot, propagate, then net what is left.

use crate::aggregate::{accumulate, Transfers};
use crate::error::{Result, SettleError};
use crate::forest::Forest;
use crate::netting::DebtNetter;
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

/// Moves each non-root balance into its parent, leaves first.
///
/// For every edge `source -> sink` the transfer `(source, sink)` is recorded
/// as `-amounts[source]` (omitted when zero), `amounts[sink]` absorbs the
/// source's balance and `amounts[source]` becomes 0. Afterwards only roots
/// hold nonzero amounts and the overall total is unchanged. Nodes missing
/// from `amounts` count as zero.
///
/// A move or parent total that would overflow `i64` fails with
/// [`SettleError::Overflow`] and leaves `amounts` untouched.
pub fn double_entrify_by<T>(amounts: &mut HashMap<T, i64>, forest: &Forest<T>) -> Result<Transfers<T>>
where
    T: Eq + Hash + Clone + Debug,
{
    let order = leaves_first(forest)?;
    let mut working = amounts.clone();
    let mut result = Transfers::new();

    for (source_idx, sink_idx) in order {
        let source = forest.node_at(source_idx);
        let sink = forest.node_at(sink_idx);

        let amount = working.insert(source.clone(), 0).unwrap_or(0);
        let total = working.entry(sink.clone()).or_insert(0);
        *total = total.checked_add(amount).ok_or_else(|| {
            SettleError::Overflow(format!("{:?} absorbing {} from {:?}", sink, amount, source))
        })?;
        if amount != 0 {
            debug!("Propagated {} from {:?} to {:?}", amount, source, sink);
            let moved = amount.checked_neg().ok_or_else(|| {
                SettleError::Overflow(format!("{:?} moving {}", source, amount))
            })?;
            accumulate(&mut result, (source.clone(), sink.clone()), moved)?;
        }
    }

    *amounts = working;
    Ok(result)
}

/// Edges in an order where every child is handled before its parent.
fn leaves_first<T>(forest: &Forest<T>) -> Result<Vec<(usize, usize)>>
where
    T: Eq + Hash + Clone + Debug,
{
    let mut degree = vec![0usize; forest.len()];
    let mut edge_count = 0;
    for idx in 0..forest.len() {
        if let Some(parent) = forest.parent_index(idx) {
            degree[parent] += 1;
            edge_count += 1;
        }
    }

    let mut leaves: VecDeque<usize> = (0..forest.len())
        .filter(|&idx| degree[idx] == 0 && forest.parent_index(idx).is_some())
        .collect();
    let mut order = Vec::with_capacity(edge_count);

    while let Some(source) = leaves.pop_front() {
        let Some(sink) = forest.parent_index(source) else {
            continue;
        };
        order.push((source, sink));
        degree[sink] -= 1;
        if degree[sink] == 0 && forest.parent_index(sink).is_some() {
            leaves.push_back(sink);
        }
    }

    if order.len() != edge_count {
        return Err(SettleError::MalformedForest(format!(
            "only {} of {} edges reachable from a leaf",
            order.len(),
            edge_count
        )));
    }
    Ok(order)
}

/// Turns one side of a transaction into transfers as seen from `root`.
///
/// `people` are parties linked by `forest`; their balances are carried up to
/// `root` after the forest is rerooted there. `payees` are outside parties:
/// each payee's amount is resolved against the propagated balances, where a
/// zero-balance party may act as a pass-through. Whatever remains is netted.
/// The balances of `people` and `payees` together must sum to zero.
pub fn double_entrify<T, P>(
    root: &T,
    mut people: HashMap<T, i64>,
    mut forest: Forest<T>,
    payees: P,
) -> Result<Transfers<T>>
where
    T: Ord + Hash + Clone + Debug,
    P: IntoIterator<Item = (T, i64)>,
{
    forest.reroot(root)?;
    people.entry(root.clone()).or_insert(0);

    let mut result = double_entrify_by(&mut people, &forest)?;

    let mut balances: Vec<(T, i64)> = people.into_iter().collect();
    balances.sort();
    let mut netter = DebtNetter::new(balances.into_iter().collect());

    for (payee, amount) in payees {
        for (pair, edge) in netter.combine_one(amount, payee)? {
            accumulate(&mut result, pair, edge)?;
        }
    }
    for (pair, edge) in netter.combine()? {
        accumulate(&mut result, pair, edge)?;
    }

    Ok(result)
}
