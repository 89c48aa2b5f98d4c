//! Ranked frames and aggregates.
//!
//! A ranked frame is derived on demand from the [`Series`] of one period:
//! categories sorted by value descending, ties kept in first-seen order,
//! truncated to the top N.
use core::fmt;

use crate::pivot::Series;

/// Number of bars drawn when the caller does not say otherwise
pub const DEFAULT_TOP_N: usize = 10;

/// Maximum number of categories of a ranked frame.
///
/// Conversions are lenient: zero, negative, NaN, infinite and non-numeric inputs
/// all convert to [`Limit::All`], i.e. no truncation.
/// Fractional inputs are truncated, and convert to [`Limit::All`] if that gives zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// Keep every category
    All,
    /// Keep at most this many categories (never zero)
    Top(usize),
}

impl Limit {
    /// Number of entries kept out of `len`
    pub fn apply(&self, len: usize) -> usize {
        match self {
            Limit::All => len,
            Limit::Top(n) => len.min(*n),
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Top(DEFAULT_TOP_N)
    }
}

impl From<usize> for Limit {
    fn from(n: usize) -> Self {
        if n == 0 { Limit::All } else { Limit::Top(n) }
    }
}

impl From<Option<usize>> for Limit {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Limit::All, Limit::from)
    }
}

impl From<i64> for Limit {
    fn from(n: i64) -> Self {
        usize::try_from(n).map_or(Limit::All, Limit::from)
    }
}

impl From<i32> for Limit {
    fn from(n: i32) -> Self {
        Limit::from(n as i64)
    }
}

impl From<f64> for Limit {
    fn from(n: f64) -> Self {
        if n.is_finite() && n >= 1.0 {
            Limit::Top(n as usize)
        } else {
            Limit::All
        }
    }
}

/// Parse a limit typed by a user, e.g. in a property panel
impl From<&str> for Limit {
    fn from(s: &str) -> Self {
        s.trim().parse::<f64>().map_or(Limit::All, Limit::from)
    }
}

/// All categories of a series, sorted by value descending.
/// Equal values keep their first-seen order. NaN values, if any, come first.
pub fn ranked(series: &Series) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = series
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    // stable, and total even with NaN
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
}

/// The top categories of a series, sorted by value descending
pub fn top_n(series: &Series, limit: impl Into<Limit>) -> Vec<(&str, f64)> {
    let mut entries = ranked(series);
    let keep = limit.into().apply(entries.len());
    entries.truncate(keep);
    entries
}

/// Sum of all values of a series. Non-finite values count as `0`.
pub fn aggregate(series: &Series) -> f64 {
    series.values().filter(|v| v.is_finite()).sum()
}

/// What is drawn for one period: the ranked bars and the running total
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    /// Index of the period in the timeline
    pub index: usize,
    /// Period label
    pub period: &'a str,
    /// Categories and values, value descending
    pub bars: Vec<(&'a str, f64)>,
    /// Sum of all values of the period, including those not in `bars`
    pub total: f64,
}

impl Frame<'_> {
    /// The leading category, if any
    pub fn leader(&self) -> Option<(&str, f64)> {
        self.bars.first().copied()
    }
}

/// Write one header line, then one line per bar
impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "== {} == total {}", self.period, self.total)?;
        for (rank, (category, value)) in self.bars.iter().enumerate() {
            writeln!(f, "{:>3}. {} {}", rank + 1, category, value)?;
        }
        Ok(())
    }
}
