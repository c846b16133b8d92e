//! CSV-driven settlement engine.
//!
//! Reads `party,amount,parent` rows, flattens the parent hierarchy into
//! transfers towards the roots and nets the root balances. Records are
//! streamed; only per-party totals and parent edges are kept.

use crate::aggregate::{accumulate, Transfers};
use crate::config::{Config, NettingMode};
use crate::error::{Result, SettleError};
use crate::forest::Forest;
use crate::money::{format_minor, parse_minor};
use crate::netting::net;
use crate::propagate::double_entrify_by;
use crate::sorted::settle_sorted;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Raw balance row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct BalanceRecord {
    pub party: String,

    /// Decimal text; converted to minor units at the configured scale.
    pub amount: String,

    /// Optional parent; blank or absent for roots.
    #[serde(default)]
    pub parent: Option<String>,
}

/// The settlement engine.
///
/// # Output Ordering
///
/// Transfers are written sorted by `(source, sink)` so output is reproducible.
pub struct SettleEngine {
    mode: NettingMode,
    scale: u32,

    /// Balance per party in minor units; parents-only parties hold 0.
    balances: HashMap<String, i64>,

    /// Party order of first appearance, used to seed the netters deterministically.
    order: Vec<String>,

    /// `(child, parent)` edges in input order.
    edges: Vec<(String, String)>,
}

impl SettleEngine {
    /// Creates an empty engine for the given settings.
    pub fn new(mode: NettingMode, scale: u32) -> Self {
        SettleEngine {
            mode,
            scale,
            balances: HashMap::new(),
            order: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mode, config.scale)
    }

    /// Reads balance rows from a CSV reader in streaming fashion.
    ///
    /// Invalid rows are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<BalanceRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Err(e) = self.process_record(record, row_num) {
                        warn!("Row {}: {}", row_num, e);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    fn process_record(&mut self, record: BalanceRecord, row: usize) -> Result<()> {
        let party = record.party.trim();
        if party.is_empty() {
            warn!("Row {}: Missing party, ignoring", row);
            return Ok(());
        }

        let amount = parse_minor(&record.amount, self.scale)?;
        self.add_balance(party, amount)?;
        debug!("Row {}: {} holds {}", row, party, amount);

        if let Some(parent) = record.parent.as_deref().map(str::trim) {
            if !parent.is_empty() {
                self.add_balance(parent, 0)?;
                self.edges.push((party.to_string(), parent.to_string()));
            }
        }

        Ok(())
    }

    /// Adds to a party's running total. A total that would leave `i64` is
    /// rejected and the total stays as it was.
    fn add_balance(&mut self, party: &str, amount: i64) -> Result<()> {
        match self.balances.get_mut(party) {
            Some(balance) => {
                *balance = balance
                    .checked_add(amount)
                    .ok_or_else(|| SettleError::InvalidAmount {
                        value: format_minor(amount, self.scale),
                        message: format!("total for {} out of range", party),
                    })?;
            }
            None => {
                self.balances.insert(party.to_string(), amount);
                self.order.push(party.to_string());
            }
        }
        Ok(())
    }

    /// Current balance of a party in minor units.
    pub fn balance(&self, party: &str) -> Option<i64> {
        self.balances.get(party).copied()
    }

    /// Flattens the hierarchy and nets the remaining root balances.
    ///
    /// All-or-nothing: on error no transfers are produced.
    pub fn settle(&self) -> Result<Transfers<String>> {
        let forest = Forest::from_edges(self.edges.iter().cloned())?;
        let mut amounts = self.balances.clone();
        let mut result = double_entrify_by(&mut amounts, &forest)?;

        let remaining = self
            .order
            .iter()
            .map(|party| (party.clone(), amounts.get(party).copied().unwrap_or(0)));
        let netted = match self.mode {
            NettingMode::Greedy => net(remaining)?,
            NettingMode::Sorted => settle_sorted(remaining)?,
        };

        for (pair, amount) in netted {
            accumulate(&mut result, pair, amount)?;
        }
        result.retain(|_, amount| *amount != 0);
        Ok(result)
    }

    /// Settles and writes the transfers as CSV.
    ///
    /// All amounts are formatted with exactly `scale` decimal places.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let transfers = self.settle()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["source", "sink", "amount"])?;

        let mut rows: Vec<_> = transfers.into_iter().collect();
        rows.sort();

        for ((source, sink), amount) in rows {
            csv_writer.write_record([source, sink, format_minor(amount, self.scale)])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl Default for SettleEngine {
    fn default() -> Self {
        Self::new(NettingMode::Greedy, crate::money::DEFAULT_SCALE)
    }
}
