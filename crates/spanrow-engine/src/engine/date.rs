//! Spreadsheet serial dates.
//!
//! Serial values use the 1900 date system: day 1 is 1900-01-01 and the
//! fictitious 1900-02-29 (serial 60) is preserved, so serials from 61 onward
//! count days since 1899-12-30. Fractions are the time of day. Values below 1
//! are a bare time of day and map onto 1970-01-01.
//!
//! Timestamps are Unix seconds in UTC.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Days between 1899-12-30 and 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;

/// Convert a serial date value into a Unix timestamp (seconds, rounded).
pub fn excel_to_timestamp(serial: f64) -> i64 {
    if (0.0..1.0).contains(&serial) {
        return (serial * SECONDS_PER_DAY).round() as i64;
    }
    let days = serial.floor();
    let part_day = serial - days;
    // Before the phantom 1900-02-29 the epoch is one day later.
    let base = if serial < 60.0 {
        UNIX_EPOCH_SERIAL - 1.0
    } else {
        UNIX_EPOCH_SERIAL
    };
    ((days - base) * SECONDS_PER_DAY + (part_day * SECONDS_PER_DAY).round()) as i64
}

/// Convert a Unix timestamp into a serial date value.
pub fn timestamp_to_excel(timestamp: i64) -> f64 {
    let serial = timestamp as f64 / SECONDS_PER_DAY + UNIX_EPOCH_SERIAL;
    if serial < 61.0 { serial - 1.0 } else { serial }
}

/// Serial value for a calendar date and time, or None if the date is invalid.
pub fn date_to_excel(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<f64> {
    let dt = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Some(timestamp_to_excel(dt.and_utc().timestamp()))
}

/// Whether a number format code renders its value as a date or time.
///
/// Quoted literals, escaped characters, padding/fill directives and bracketed
/// sections (colors, conditions, locales) are ignored; elapsed-time brackets
/// such as `[h]` count as time.
pub fn is_date_time_format(code: &str) -> bool {
    let code = code.trim();
    if code.is_empty() || code.eq_ignore_ascii_case("general") || code == "@" {
        return false;
    }

    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let mut inner = String::new();
                for b in chars.by_ref() {
                    if b == ']' {
                        break;
                    }
                    inner.push(b);
                }
                let lower = inner.to_ascii_lowercase();
                if !lower.is_empty() && lower.chars().all(|ch| matches!(ch, 'h' | 'm' | 's')) {
                    return true;
                }
            }
            'd' | 'D' | 'm' | 'M' | 'y' | 'Y' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn push_pattern_char(out: &mut String, dt: &DateTime<Utc>, c: char) {
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    match c {
        'd' => out.push_str(&format!("{:02}", dt.day())),
        'D' => out.push_str(&dt.format("%a").to_string()),
        'j' => out.push_str(&dt.day().to_string()),
        'l' => out.push_str(&dt.format("%A").to_string()),
        'N' => out.push_str(&dt.weekday().number_from_monday().to_string()),
        'S' => out.push_str(ordinal_suffix(dt.day())),
        'w' => out.push_str(&dt.weekday().num_days_from_sunday().to_string()),
        'z' => out.push_str(&dt.ordinal0().to_string()),
        'W' => out.push_str(&format!("{:02}", dt.iso_week().week())),
        'F' => out.push_str(&dt.format("%B").to_string()),
        'm' => out.push_str(&format!("{:02}", dt.month())),
        'M' => out.push_str(&dt.format("%b").to_string()),
        'n' => out.push_str(&dt.month().to_string()),
        't' => out.push_str(&days_in_month(dt.year(), dt.month()).to_string()),
        'L' => {
            let leap = NaiveDate::from_ymd_opt(dt.year(), 2, 29).is_some();
            out.push(if leap { '1' } else { '0' });
        }
        'o' => out.push_str(&dt.iso_week().year().to_string()),
        'Y' => out.push_str(&format!("{:04}", dt.year())),
        'y' => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
        'a' => out.push_str(if dt.hour() < 12 { "am" } else { "pm" }),
        'A' => out.push_str(if dt.hour() < 12 { "AM" } else { "PM" }),
        'g' => out.push_str(&hour12.to_string()),
        'G' => out.push_str(&dt.hour().to_string()),
        'h' => out.push_str(&format!("{:02}", hour12)),
        'H' => out.push_str(&format!("{:02}", dt.hour())),
        'i' => out.push_str(&format!("{:02}", dt.minute())),
        's' => out.push_str(&format!("{:02}", dt.second())),
        'u' => out.push_str("000000"),
        'v' => out.push_str("000"),
        'e' | 'T' => out.push_str("UTC"),
        'P' => out.push_str("+00:00"),
        'O' => out.push_str("+0000"),
        'Z' => out.push('0'),
        'c' => out.push_str(&dt.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        'r' => out.push_str(&dt.format("%a, %d %b %Y %H:%M:%S +0000").to_string()),
        'U' => out.push_str(&dt.timestamp().to_string()),
        other => out.push(other),
    }
}

/// Format a Unix timestamp with a PHP `date()`-style pattern (e.g. `Y-m-d H:i:s`).
///
/// A backslash emits the next character literally. Timestamps outside the
/// representable range are returned as plain seconds.
pub fn format_timestamp(timestamp: i64, pattern: &str) -> String {
    let Some(dt) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return timestamp.to_string();
    };

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(literal) = chars.next() {
                out.push(literal);
            }
            continue;
        }
        push_pattern_char(&mut out, &dt, c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_to_timestamp_known_values() {
        assert_eq!(excel_to_timestamp(25569.0), 0);
        assert_eq!(excel_to_timestamp(25569.5), 43_200);
        // 2021-01-01
        assert_eq!(excel_to_timestamp(44197.0), 1_609_459_200);
        // 1900-01-01 sits one day after the 1899-12-31 base
        assert_eq!(excel_to_timestamp(1.0), -2_208_988_800);
    }

    #[test]
    fn test_excel_to_timestamp_time_only() {
        assert_eq!(excel_to_timestamp(0.25), 6 * 3600);
    }

    #[test]
    fn test_timestamp_to_excel_inverse() {
        for serial in [61.0, 25569.0, 44197.75, 45000.0] {
            assert!((timestamp_to_excel(excel_to_timestamp(serial)) - serial).abs() < 1e-9);
        }
    }

    #[test]
    fn test_date_to_excel() {
        assert_eq!(date_to_excel(2021, 1, 1, 0, 0, 0), Some(44197.0));
        assert_eq!(date_to_excel(1970, 1, 1, 12, 0, 0), Some(25569.5));
        assert_eq!(date_to_excel(2021, 2, 30, 0, 0, 0), None);
    }

    #[test]
    fn test_is_date_time_format() {
        assert!(is_date_time_format("yyyy-mm-dd"));
        assert!(is_date_time_format("d/m/yy h:mm"));
        assert!(is_date_time_format("[h]:mm:ss"));
        assert!(is_date_time_format("[$-409]mmmm d, yyyy"));
        assert!(!is_date_time_format("General"));
        assert!(!is_date_time_format("0.00"));
        assert!(!is_date_time_format("#,##0"));
        assert!(!is_date_time_format("@"));
        assert!(!is_date_time_format("[Red]0.00"));
        assert!(!is_date_time_format("0\" days\""));
    }

    #[test]
    fn test_format_timestamp() {
        let ts = 1_609_459_200 + 13 * 3600 + 5 * 60 + 9; // 2021-01-01 13:05:09 UTC
        assert_eq!(format_timestamp(ts, "Y-m-d H:i:s"), "2021-01-01 13:05:09");
        assert_eq!(format_timestamp(ts, "Y-m-d"), "2021-01-01");
        assert_eq!(format_timestamp(ts, "D, j M y g:i A"), "Fri, 1 Jan 21 1:05 PM");
        assert_eq!(format_timestamp(ts, "l jS \\o\\f F"), "Friday 1st of January");
        assert_eq!(format_timestamp(ts, "t L N w z"), "31 0 5 5 0");
        assert_eq!(format_timestamp(ts, "U"), ts.to_string());
        assert_eq!(format_timestamp(ts, "c"), "2021-01-01T13:05:09+00:00");
    }
}
