//! Greedy debt netting over a [`Ledger`].
//!
//! Each sink is resolved by drawing from the ledger until its requirement is
//! met. At most one sink is unresolved at a time, so `n` parties produce at
//! most `n - 1` transfers.

use crate::aggregate::{accumulate, Transfers};
use crate::error::{Result, SettleError};
use crate::ledger::Ledger;
use log::debug;
use std::fmt::Debug;
use std::hash::Hash;

/// Greedy netter that consumes balances from a [`Ledger`].
#[derive(Debug, Clone)]
pub struct DebtNetter<T> {
    ledger: Ledger<T>,
}

impl<T> DebtNetter<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// Creates a netter over an already populated ledger.
    pub fn new(ledger: Ledger<T>) -> Self {
        DebtNetter { ledger }
    }

    /// Balances still waiting to be resolved.
    pub fn ledger(&self) -> &Ledger<T> {
        &self.ledger
    }

    /// Resolves `sink`'s requirement of `amount` against the ledger.
    ///
    /// An exact opposite balance settles in one transfer. Otherwise parties
    /// are drawn one by one and pushed back with whatever they still hold; a
    /// zero-balance party passes the whole remainder through and is pushed
    /// back holding it.
    ///
    /// Returns [`SettleError::Unbalanced`] if the ledger empties first.
    pub fn combine_one(&mut self, amount: i64, sink: T) -> Result<Transfers<T>> {
        let mut result = Transfers::new();
        let mut amount = amount;

        while amount != 0 {
            // i64::MIN has no opposite, so no party can match it exactly.
            if let Some(opposite) = amount.checked_neg().filter(|o| self.ledger.holds(*o)) {
                let source = self.ledger.pop(opposite)?;
                debug!("Direct settlement: {:?} -> {:?} of {}", source, sink, amount);
                accumulate(&mut result, (source, sink.clone()), amount)?;
                return Ok(result);
            }

            let (other, source) = self
                .ledger
                .pop_by_sign(-amount.signum())
                .map_err(|_| SettleError::Unbalanced { remaining: amount })?;

            let edge = if other == 0 {
                amount
            } else {
                toward(amount, other)?
            };

            debug!(
                "Partial settlement: {:?} (holding {}) -> {:?} of {}",
                source, other, sink, edge
            );
            accumulate(&mut result, (source.clone(), sink.clone()), edge)?;
            let left = other.checked_add(edge).ok_or_else(|| {
                SettleError::Overflow(format!("{:?} holding {} plus {}", source, other, edge))
            })?;
            self.ledger.push(left, source);
            amount -= edge;
        }

        Ok(result)
    }

    /// Resolves every balance left in the ledger, surplus parties first.
    pub fn combine(&mut self) -> Result<Transfers<T>> {
        let mut result = Transfers::new();

        while !self.ledger.is_empty() {
            let (amount, sink) = self.ledger.pop_by_sign(1)?;
            if amount == 0 {
                continue;
            }
            for (pair, edge) in self.combine_one(amount, sink)? {
                accumulate(&mut result, pair, edge)?;
            }
        }

        Ok(result)
    }
}

/// The smaller of the two magnitudes, carrying the sign of `amount`.
fn toward(amount: i64, other: i64) -> Result<i64> {
    let magnitude = amount.unsigned_abs().min(other.unsigned_abs());
    let edge = if amount < 0 {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        0i64.checked_add_unsigned(magnitude)
    };
    edge.ok_or_else(|| SettleError::Overflow(format!("edge of {} against {}", amount, other)))
}

/// Nets a zero-sum set of balances greedily.
///
/// The result reproduces every balance: for each party, incoming minus
/// outgoing transfers equals its original amount.
pub fn net<T, I>(balances: I) -> Result<Transfers<T>>
where
    T: Eq + Hash + Clone + Debug,
    I: IntoIterator<Item = (T, i64)>,
{
    DebtNetter::new(balances.into_iter().collect()).combine()
}
