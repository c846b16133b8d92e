//! # Settlement Engine
//!
//! Reduces many-party signed balances into pairwise transfers, and flattens
//! hierarchies of running balances into zero-sum double-entry transfers.
//!
//! ## Design Principles
//!
//! - **Integer minor units**: All amounts are `i64`; decimals only exist at the CSV boundary
//! - **Deterministic**: Every "pick any" choice has a fixed tie-break
//! - **All-or-nothing**: A failed netting or propagation yields no transfers
//! - **Generic parties**: Party keys only need equality and hashing (ordering for sorted netting)
//!
//! ## Example
//!
//! ```
//! use settle_engine::net;
//! use std::collections::HashMap;
//!
//! let transfers = net([("alice", 5), ("bob", -3), ("carol", -2)]).unwrap();
//! assert_eq!(
//!     transfers,
//!     HashMap::from([(("bob", "alice"), 3), (("carol", "alice"), 2)])
//! );
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod forest;
pub mod ledger;
pub mod money;
pub mod netting;
pub mod propagate;
pub mod sorted;

pub use aggregate::{group_by, merge, sum_by, sum_by_with_zeros, Transfers};
pub use config::{Config, NettingMode};
pub use engine::{BalanceRecord, SettleEngine};
pub use entry::{mirror, net_positions, Entry};
pub use error::{Result, SettleError};
pub use forest::{spanning_forest, Forest, Link};
pub use ledger::Ledger;
pub use netting::{net, DebtNetter};
pub use propagate::{double_entrify, double_entrify_by};
pub use sorted::settle_sorted;
