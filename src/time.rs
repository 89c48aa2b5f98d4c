//! Period label parsing.
//!
//! Time values reach the pipeline as display strings in a handful of grammars
//! (`"2023"`, `"JAN 2024"`, `"09/2022"`, `"Q2 2025"`, `"2/2025"`, `"2024-09"`).
//! [`Period::parse`] turns such a label into a normalized display label and an
//! [`Ordinal`] used only for ordering.
//!
//! Labels that match none of the grammars are not rejected: they receive a
//! [`Ordinal::Fallback`] derived from a hash of their content, which sorts after
//! every recognized period.
use core::fmt;
use std::str::FromStr;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Error returned by the strict [`FromStr`] implementation of [`Period`]
/// when a label matches none of the supported grammars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormatError {
    /// The offending label, trimmed
    pub label: String,
}

impl fmt::Display for UnknownFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unrecognized period label: \"{}\"", self.label)
    }
}

impl std::error::Error for UnknownFormatError {}

/// Ordering key of a period.
///
/// Recognized periods compare by year, then by anchor month.
/// The anchor month is 0 for a whole year, 1 to 12 for a month,
/// and the last month of the quarter for a quarter (Q1 is 3, Q4 is 12).
/// Every fallback ordinal sorts after every recognized one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ordinal {
    /// A recognized period
    Known {
        /// The year (e.g. 2025)
        year: i32,
        /// The anchor month (0 to 12)
        month: u8,
    },
    /// An unrecognized label, with the 16-bit hash of its content
    Fallback(u16),
}

impl Ordinal {
    /// Build the ordinal of a whole year
    pub const fn year(year: i32) -> Self {
        Ordinal::Known { year, month: 0 }
    }

    /// Build the ordinal of a month (1 to 12)
    pub const fn month(year: i32, month: u8) -> Self {
        Ordinal::Known { year, month }
    }

    /// Build the ordinal of a quarter (1 to 4), anchored on its last month
    pub const fn quarter(year: i32, quarter: u8) -> Self {
        Ordinal::Known {
            year,
            month: quarter * 3,
        }
    }

    /// Build the fallback ordinal of an unrecognized label
    pub fn fallback(label: &str) -> Self {
        Ordinal::Fallback(fallback_hash(label))
    }

    /// Check whether this ordinal comes from the fallback policy
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Ordinal::Fallback(_))
    }
}

/// The grammar a period label was recognized with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    /// A whole year, e.g. `2023`
    Year,
    /// A month, e.g. `JAN 2024`, `09/2022` or `2024-09`
    Month,
    /// A quarter, e.g. `Q2 2025` or `2/2025`
    Quarter,
    /// A label matching no grammar
    Unrecognized,
}

/// A time period, as displayed on one frame of the race.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    ordinal: Ordinal,
    kind: PeriodKind,
    label: String,
}

impl Period {
    /// Parse a period label, applying the fallback policy to unrecognized labels.
    /// This never fails.
    ///
    /// Grammars are tried in the following order, first match wins
    /// (the input is trimmed beforehand):
    /// - `YYYY`, e.g. `2023`, normalized to the digits
    /// - `MMM YYYY`, e.g. `jan 2024`, normalized to `JAN 2024`
    /// - `MM/YYYY`, e.g. `09/2022`, normalized to `09/2022`
    /// - `Qn YYYY` or `nQ YYYY`, e.g. `q2 2025`, normalized to `Q2 2025`
    /// - `n/YYYY` with `n` in 1 to 4, e.g. `2/2025`, normalized to `Q2 2025`
    /// - `YYYY-MM`, e.g. `2024-09`, normalized to `2024-09`
    pub fn parse(label: &str) -> Self {
        let s = label.trim();
        match recognize(s) {
            Some(period) => period,
            None => {
                log::debug!("period label \"{s}\" matches no grammar, placing it after known periods");
                Period {
                    ordinal: Ordinal::fallback(s),
                    kind: PeriodKind::Unrecognized,
                    label: s.to_string(),
                }
            }
        }
    }

    /// The ordering key of this period
    pub const fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    /// The grammar this period was recognized with
    pub const fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// The normalized display label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the period and return its normalized display label
    pub fn into_label(self) -> String {
        self.label
    }

    /// Check whether this period was placed by the fallback policy
    pub const fn is_fallback(&self) -> bool {
        self.ordinal.is_fallback()
    }
}

/// Strict parsing: unrecognized labels are an error.
impl FromStr for Period {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        recognize(s).ok_or_else(|| UnknownFormatError {
            label: s.to_string(),
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.label)
    }
}

type Matcher = fn(&str) -> Option<Period>;

/// Supported grammars, in priority order
const MATCHERS: &[(&str, Matcher)] = &[
    ("year", match_year),
    ("month-name", match_month_name),
    ("month-slash", match_month_slash),
    ("quarter-prefix", match_quarter_prefix),
    ("quarter-slash", match_quarter_slash),
    ("iso-month", match_iso_month),
];

/// Run the matchers on a trimmed label
fn recognize(s: &str) -> Option<Period> {
    MATCHERS.iter().find_map(|(name, matcher)| {
        let period = matcher(s)?;
        log::trace!("period label \"{s}\" matched {name} grammar");
        Some(period)
    })
}

fn match_year(s: &str) -> Option<Period> {
    let year = parse_year(s)?;
    Some(Period {
        ordinal: Ordinal::year(year),
        kind: PeriodKind::Year,
        label: s.to_string(),
    })
}

fn match_month_name(s: &str) -> Option<Period> {
    let (name, year) = split_ws(s)?;
    if name.len() != 3 || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let year = parse_year(year)?;
    let name = name.to_ascii_uppercase();
    let month = MONTHS.iter().position(|m| *m == name)? as u8 + 1;
    Some(Period {
        ordinal: Ordinal::month(year, month),
        kind: PeriodKind::Month,
        label: format!("{name} {year:04}"),
    })
}

fn match_month_slash(s: &str) -> Option<Period> {
    let (month, year) = s.split_once('/')?;
    let month = parse_month(month)?;
    let year = parse_year(year)?;
    Some(Period {
        ordinal: Ordinal::month(year, month),
        kind: PeriodKind::Month,
        label: format!("{month:02}/{year:04}"),
    })
}

fn match_quarter_prefix(s: &str) -> Option<Period> {
    let (q, year) = split_ws(s)?;
    let quarter = match q.as_bytes() {
        [b'Q' | b'q', d] | [d, b'Q' | b'q'] => parse_quarter_digit(*d)?,
        _ => return None,
    };
    let year = parse_year(year)?;
    Some(quarter_period(year, quarter))
}

fn match_quarter_slash(s: &str) -> Option<Period> {
    let (q, year) = s.split_once('/')?;
    let quarter = match q.as_bytes() {
        [d] => parse_quarter_digit(*d)?,
        _ => return None,
    };
    let year = parse_year(year)?;
    Some(quarter_period(year, quarter))
}

fn match_iso_month(s: &str) -> Option<Period> {
    let (year, month) = s.split_once('-')?;
    let year = parse_year(year)?;
    let month = parse_month(month)?;
    Some(Period {
        ordinal: Ordinal::month(year, month),
        kind: PeriodKind::Month,
        label: format!("{year:04}-{month:02}"),
    })
}

fn quarter_period(year: i32, quarter: u8) -> Period {
    Period {
        ordinal: Ordinal::quarter(year, quarter),
        kind: PeriodKind::Quarter,
        label: format!("Q{quarter} {year:04}"),
    }
}

/// Split at the first whitespace run. Both sides must be non-empty.
fn split_ws(s: &str) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(char::is_whitespace)?;
    let tail = tail.trim_start();
    if head.is_empty() || tail.is_empty() {
        None
    } else {
        Some((head, tail))
    }
}

/// Parse exactly `width` ASCII digits
fn parse_digits(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_year(s: &str) -> Option<i32> {
    parse_digits(s, 4).map(|y| y as i32)
}

/// Two digits, 01 to 12
fn parse_month(s: &str) -> Option<u8> {
    match parse_digits(s, 2)? {
        m @ 1..=12 => Some(m as u8),
        _ => None,
    }
}

fn parse_quarter_digit(d: u8) -> Option<u8> {
    match d {
        b'1'..=b'4' => Some(d - b'0'),
        _ => None,
    }
}

/// `h = h * 31 + c` over the characters, 32-bit wrapping, keeping the low 16 bits.
/// `c` is the first UTF-16 code unit of each character, so a surrogate pair counts once.
fn fallback_hash(s: &str) -> u16 {
    let h = s.chars().fold(0i32, |h, c| {
        let mut buf = [0u16; 2];
        let unit = c.encode_utf16(&mut buf)[0];
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32)
    });
    (h & 0xffff) as u16
}
