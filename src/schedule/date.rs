// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Resolved years outside this bound are rejected as nonsense input rather
/// than scheduled.
const MAX_ABS_YEAR: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    Unrecognized,
    YearOutOfRange { year: i32 },
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized => f.write_str("matches neither the configured format nor a fallback parse"),
            Self::YearOutOfRange { year } => {
                write!(f, "resolves to year {year}, outside ±{MAX_ABS_YEAR}")
            }
        }
    }
}

impl std::error::Error for DateParseError {}

/// Translate a day.js-style format into a chrono strftime pattern.
///
/// Tokens are matched longest-first; anything unrecognized passes through
/// verbatim (with `%` escaped so it cannot inject a chrono specifier).
pub(crate) fn to_chrono_format(dayjs_fmt: &str) -> String {
    // Longer tokens listed before their prefixes (SSS before ss, MM before M).
    const TOKENS: [(&str, &str); 16] = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MM", "%m"),
        ("M", "%-m"),
        ("DD", "%d"),
        ("D", "%-d"),
        ("HH", "%H"),
        ("H", "%-H"),
        ("hh", "%I"),
        ("h", "%-I"),
        ("mm", "%M"),
        ("m", "%-M"),
        ("SSS", "%3f"),
        ("ss", "%S"),
        ("s", "%-S"),
        ("A", "%p"),
    ];

    let mut out = String::with_capacity(dayjs_fmt.len() + 8);
    let mut rest = dayjs_fmt;
    'outer: while !rest.is_empty() {
        for (token, replacement) in TOKENS.iter() {
            if let Some(remaining) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = remaining;
                continue 'outer;
            }
        }
        let ch = rest.chars().next().expect("non-empty");
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn check_year(dt: NaiveDateTime) -> Result<NaiveDateTime, DateParseError> {
    use chrono::Datelike;
    let year = dt.year();
    if year.abs() > MAX_ABS_YEAR {
        return Err(DateParseError::YearOutOfRange { year });
    }
    Ok(dt)
}

/// Parse with the configured (day.js-style) format: datetime first, then
/// date-at-midnight.
pub(crate) fn parse_with_format(text: &str, dayjs_fmt: &str) -> Option<NaiveDateTime> {
    let fmt = to_chrono_format(dayjs_fmt.trim());
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, &fmt) {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, &fmt) {
        return Some(date.and_time(NaiveTime::MIN));
    }
    None
}

/// Resolve an absolute date string: the configured format, then pure digit
/// strings as epoch milliseconds, then ISO-8601 fallbacks.
pub(crate) fn resolve_date(text: &str, dayjs_fmt: &str) -> Result<NaiveDateTime, DateParseError> {
    let text = text.trim();
    if let Some(dt) = parse_with_format(text, dayjs_fmt) {
        return check_year(dt);
    }

    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = text.parse().map_err(|_| DateParseError::Unrecognized)?;
        let dt = DateTime::from_timestamp_millis(millis)
            .ok_or(DateParseError::Unrecognized)?
            .naive_utc();
        return check_year(dt);
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return check_year(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return check_year(date.and_time(NaiveTime::MIN));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return check_year(dt.naive_utc());
    }

    Err(DateParseError::Unrecognized)
}

/// Format a timestamp with the configured day.js-style format, for matching
/// against `includes`/`excludes` date tokens.
pub(crate) fn format_with(dt: NaiveDateTime, dayjs_fmt: &str) -> String {
    let fmt = to_chrono_format(dayjs_fmt.trim());
    dt.format(&fmt).to_string()
}

/// Add a `<amount><unit>` duration to a reference timestamp.
///
/// Units: ms, s, m, h, d, w as fixed lengths; M and y as calendar months.
/// Returns `None` for an unrecognized unit — the caller treats that as no
/// adjustment. An addition that falls outside the representable range keeps
/// the reference unchanged.
pub(crate) fn add_duration(
    reference: NaiveDateTime,
    amount: f64,
    unit: &str,
) -> Option<NaiveDateTime> {
    let millis_per: Option<f64> = match unit {
        "ms" => Some(1.0),
        "s" => Some(1_000.0),
        "m" => Some(60_000.0),
        "h" => Some(3_600_000.0),
        "d" => Some(86_400_000.0),
        "w" => Some(7.0 * 86_400_000.0),
        _ => None,
    };
    if let Some(scale) = millis_per {
        let millis = (amount * scale).round() as i64;
        return Some(
            reference
                .checked_add_signed(Duration::milliseconds(millis))
                .unwrap_or(reference),
        );
    }

    let months = match unit {
        "M" => amount.trunc() as u32,
        "y" => (amount.trunc() as u32).saturating_mul(12),
        _ => return None,
    };
    Some(
        reference
            .checked_add_months(Months::new(months))
            .unwrap_or(reference),
    )
}

#[cfg(test)]
mod tests {
    use super::{add_duration, format_with, resolve_date, to_chrono_format, DateParseError};
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::rstest;

    fn dt(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").expect("datetime literal")
    }

    #[rstest]
    #[case("YYYY-MM-DD", "%Y-%m-%d")]
    #[case("DD.MM.YYYY", "%d.%m.%Y")]
    #[case("YYYY-MM-DD HH:mm:ss", "%Y-%m-%d %H:%M:%S")]
    #[case("YY/M/D", "%y/%-m/%-d")]
    #[case("HH:mm:ss.SSS", "%H:%M:%S.%3f")]
    #[case("x%y", "x%%y")]
    fn translates_dayjs_tokens(#[case] dayjs: &str, #[case] chrono_fmt: &str) {
        assert_eq!(to_chrono_format(dayjs), chrono_fmt);
    }

    #[test]
    fn resolves_dates_with_the_configured_format() {
        let resolved = resolve_date("2024-03-01", "YYYY-MM-DD").expect("date");
        assert_eq!(resolved, dt("2024-03-01T00:00:00"));

        let resolved = resolve_date("01.03.2024", "DD.MM.YYYY").expect("date");
        assert_eq!(resolved, dt("2024-03-01T00:00:00"));

        let resolved = resolve_date("2024-03-01 08:30:00", "YYYY-MM-DD HH:mm:ss").expect("date");
        assert_eq!(resolved, dt("2024-03-01T08:30:00"));
    }

    #[test]
    fn digit_strings_resolve_as_epoch_milliseconds() {
        let resolved = resolve_date("1704067200000", "YYYY-MM-DD").expect("epoch");
        assert_eq!(resolved, dt("2024-01-01T00:00:00"));
    }

    #[test]
    fn falls_back_to_iso_parsing_when_format_mismatches() {
        let resolved = resolve_date("2024-03-01", "DD.MM.YYYY").expect("fallback");
        assert_eq!(resolved, dt("2024-03-01T00:00:00"));
    }

    #[test]
    fn rejects_unparseable_text() {
        let err = resolve_date("soon", "YYYY-MM-DD").unwrap_err();
        assert_eq!(err, DateParseError::Unrecognized);
    }

    #[test]
    fn rejects_years_outside_the_sane_bound() {
        let err = resolve_date("99999-01-01", "YYYY-MM-DD").unwrap_err();
        assert_eq!(err, DateParseError::YearOutOfRange { year: 99999 });
    }

    #[rstest]
    #[case(2.0, "d", "2024-01-03T00:00:00")]
    #[case(36.0, "h", "2024-01-02T12:00:00")]
    #[case(90.0, "m", "2024-01-01T01:30:00")]
    #[case(1.0, "w", "2024-01-08T00:00:00")]
    #[case(1000.0, "ms", "2024-01-01T00:00:01")]
    #[case(1.5, "d", "2024-01-02T12:00:00")]
    fn adds_fixed_length_durations(
        #[case] amount: f64,
        #[case] unit: &str,
        #[case] expected: &str,
    ) {
        let reference = dt("2024-01-01T00:00:00");
        let adjusted = add_duration(reference, amount, unit).expect("known unit");
        assert_eq!(adjusted, dt(expected));
    }

    #[test]
    fn adds_calendar_months_and_years() {
        let reference = dt("2024-01-31T00:00:00");
        // Clamped to the shorter month, calendar-style.
        assert_eq!(
            add_duration(reference, 1.0, "M").expect("months"),
            dt("2024-02-29T00:00:00")
        );
        assert_eq!(
            add_duration(reference, 1.0, "y").expect("years"),
            dt("2025-01-31T00:00:00")
        );
    }

    #[test]
    fn unknown_units_are_reported_to_the_caller() {
        let reference = dt("2024-01-01T00:00:00");
        assert_eq!(add_duration(reference, 3.0, "Q"), None);
    }

    #[test]
    fn formats_back_with_the_configured_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9)
            .expect("date literal")
            .and_time(chrono::NaiveTime::MIN);
        assert_eq!(format_with(date, "YYYY-MM-DD"), "2024-03-09");
        assert_eq!(format_with(date, "DD.MM.YYYY"), "09.03.2024");
    }
}
