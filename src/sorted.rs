//! Two-pointer netting over balances kept in sorted order.
//!
//! Used for the pairwise interparty view. The most negative balance always
//! pays the most positive one; whichever side has magnitude left goes back
//! into the ordered set, so the two ends stay correct after every step.

use crate::aggregate::{accumulate, sum_by, Transfers};
use crate::error::{Result, SettleError};
use log::debug;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Nets balances by repeatedly pairing the smallest with the largest.
///
/// Repeated parties are summed first and zero balances are ignored.
pub fn settle_sorted<T, I>(balances: I) -> Result<Transfers<T>>
where
    T: Ord + Hash + Clone + Debug,
    I: IntoIterator<Item = (T, i64)>,
{
    let mut amounts: BTreeSet<(i64, T)> = sum_by(balances)
        .into_iter()
        .map(|(party, amount)| (amount, party))
        .collect();
    let mut result = Transfers::new();

    while let Some((low, source)) = amounts.pop_first() {
        let Some((high, sink)) = amounts.pop_last() else {
            return Err(SettleError::Unbalanced { remaining: low });
        };
        if low > 0 || high < 0 {
            return Err(SettleError::Unbalanced {
                remaining: low.saturating_add(high),
            });
        }

        // Bounded by `high`, so it always fits even when `low` is i64::MIN.
        let paid = i64::try_from(low.unsigned_abs().min(high.unsigned_abs()))
            .map_err(|_| SettleError::Overflow(format!("{:?} paying {}", source, low)))?;
        debug!("Sorted settlement: {:?} -> {:?} of {}", source, sink, paid);
        accumulate(&mut result, (source.clone(), sink.clone()), paid)?;

        let left = low + high;
        if left > 0 {
            amounts.insert((left, sink));
        } else if left < 0 {
            amounts.insert((left, source));
        }
    }

    Ok(result)
}
