//! Date/time resolution for receipt tokens such as `01Jan,23 14:30`.

use chrono::{NaiveDate, NaiveTime};

use super::patterns::DATE_TOKEN;

/// Calendar date and optional wall-clock time read from a slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDateTime {
    /// Transaction date.
    pub date: NaiveDate,
    /// 24-hour `HH:MM`, when the token carried a valid time.
    pub time: Option<String>,
}

/// Resolve a `DD MON[,] YY [HH:MM[:SS]]` token.
///
/// Returns `None` when no valid calendar date can be built; an invalid or
/// missing time only drops the time.
pub fn resolve_date_time(token: &str) -> Option<ResolvedDateTime> {
    let caps = DATE_TOKEN.captures(token)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = month_abbr_to_number(&caps[2])?;
    let year = resolve_year(&caps[3])?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => {
            let hour: u32 = h.as_str().parse().ok()?;
            let minute: u32 = m.as_str().parse().ok()?;
            let second: u32 = caps.get(6).and_then(|s| s.as_str().parse().ok()).unwrap_or(0);
            NaiveTime::from_hms_opt(hour, minute, second).map(|t| t.format("%H:%M").to_string())
        }
        _ => None,
    };

    Some(ResolvedDateTime { date, time })
}

/// Read a printed year, expanding two-digit years the way legacy date
/// parsers do (`23` → 1923) and then applying the century correction.
fn resolve_year(s: &str) -> Option<i32> {
    let printed: i32 = s.parse().ok()?;
    let year = if s.len() <= 2 { 1900 + printed } else { printed };
    Some(apply_century(year))
}

/// Receipts postdate 2000: any year before it is moved forward a century.
pub fn apply_century(year: i32) -> i32 {
    if year < 2000 { year + 100 } else { year }
}

/// English and Indonesian month abbreviations.
fn month_abbr_to_number(abbr: &str) -> Option<u32> {
    match abbr.to_uppercase().as_str() {
        "JAN" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "APR" => Some(4),
        "MAY" | "MEI" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AUG" | "AGU" | "AGT" => Some(8),
        "SEP" => Some(9),
        "OCT" | "OKT" => Some(10),
        "NOV" => Some(11),
        "DEC" | "DES" => Some(12),
        _ => None,
    }
}
