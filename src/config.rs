//! Command line and environment settings for the CLI.
//!
//! ```text
//! settle-engine [--sorted] [--scale N] <balances.csv>
//! ```
//!
//! `SETTLE_SCALE` provides the scale when `--scale` is not given.

use crate::error::{Result, SettleError};
use crate::money::{DEFAULT_SCALE, MAX_SCALE};
use std::path::PathBuf;

/// Environment variable holding the default number of decimal places.
pub const SCALE_ENV: &str = "SETTLE_SCALE";

/// Which netting algorithm settles the root balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NettingMode {
    /// Sign-bucketed greedy netting.
    #[default]
    Greedy,

    /// Two-pointer netting over sorted balances.
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: NettingMode,

    /// Decimal places of the textual amounts.
    pub scale: u32,

    pub input: PathBuf,
}

impl Config {
    /// Parses arguments (without the program name). `env_scale` is the raw
    /// value of [`SCALE_ENV`], if set.
    pub fn from_args<I>(args: I, env_scale: Option<String>) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut mode = NettingMode::Greedy;
        let mut scale = None;
        let mut input = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--sorted" => mode = NettingMode::Sorted,
                "--scale" => {
                    let value = args.next().ok_or(SettleError::MissingArgument)?;
                    scale = Some(parse_scale(&value)?);
                }
                flag if flag.starts_with("--") => {
                    return Err(SettleError::UnknownFlag(flag.to_string()));
                }
                _ => input = Some(PathBuf::from(arg)),
            }
        }

        let scale = match (scale, env_scale) {
            (Some(scale), _) => scale,
            (None, Some(value)) => parse_scale(&value)?,
            (None, None) => DEFAULT_SCALE,
        };

        Ok(Config {
            mode,
            scale,
            input: input.ok_or(SettleError::MissingArgument)?,
        })
    }

    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1), std::env::var(SCALE_ENV).ok())
    }
}

fn parse_scale(value: &str) -> Result<u32> {
    let invalid = |message: String| SettleError::InvalidAmount {
        value: value.to_string(),
        message,
    };
    let scale: u32 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if scale > MAX_SCALE {
        return Err(invalid(format!("scale must be at most {}", MAX_SCALE)));
    }
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(args(&["in.csv"]), None).unwrap();
        assert_eq!(config.mode, NettingMode::Greedy);
        assert_eq!(config.scale, DEFAULT_SCALE);
        assert_eq!(config.input, PathBuf::from("in.csv"));
    }

    #[test]
    fn test_flags() {
        let config = Config::from_args(args(&["--sorted", "--scale", "4", "in.csv"]), None).unwrap();
        assert_eq!(config.mode, NettingMode::Sorted);
        assert_eq!(config.scale, 4);
    }

    #[test]
    fn test_flag_overrides_env() {
        let config = Config::from_args(args(&["--scale", "0", "in.csv"]), Some("3".into())).unwrap();
        assert_eq!(config.scale, 0);

        let config = Config::from_args(args(&["in.csv"]), Some("3".into())).unwrap();
        assert_eq!(config.scale, 3);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Config::from_args(args(&[]), None),
            Err(SettleError::MissingArgument)
        ));
        assert!(matches!(
            Config::from_args(args(&["--fast", "in.csv"]), None),
            Err(SettleError::UnknownFlag(_))
        ));
        assert!(Config::from_args(args(&["--scale", "99", "in.csv"]), None).is_err());
        assert!(Config::from_args(args(&["in.csv"]), Some("x".into())).is_err());
    }
}
