//! Calendar-date helpers shared by the recalculation rules and the rollups.
//!
//! Two textual encodings are accepted at the boundary, `YYYY-MM-DD` and
//! `DD/MM/YYYY`. Everything past the boundary works on [`time::Date`].

use time::{macros::format_description, Date, Duration, OffsetDateTime};

use crate::InvalidDateError;

/// Textual encoding a date arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEncoding {
    /// `YYYY-MM-DD`
    Iso,
    /// `DD/MM/YYYY`
    Br,
}

impl DateEncoding {
    pub fn format(self, date: Date) -> String {
        match self {
            DateEncoding::Iso => format_iso(date),
            DateEncoding::Br => format_br(date),
        }
    }
}

/// Parse either encoding, reporting which one matched.
pub fn parse_with_encoding(text: &str) -> Result<(Date, DateEncoding), InvalidDateError> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Ok((date, DateEncoding::Iso));
    }
    if let Ok(date) = Date::parse(text, format_description!("[day]/[month]/[year]")) {
        return Ok((date, DateEncoding::Br));
    }

    Err(InvalidDateError::new(text))
}

/// Parse either encoding, failing on anything else (including empty input).
pub fn parse_strict(text: &str) -> Result<Date, InvalidDateError> {
    parse_with_encoding(text).map(|(date, _)| date)
}

/// Tolerant boundary normalization: empty or unrecognized input is absent.
pub fn normalize(text: &str) -> Option<Date> {
    if text.trim().is_empty() {
        return None;
    }
    parse_strict(text).ok()
}

pub fn format_iso(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn format_br(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Value suitable for a date input: ISO text, or empty when unparsable.
pub fn to_iso_text(text: &str) -> String {
    normalize(text).map(format_iso).unwrap_or_default()
}

/// Value for read-only display: `DD/MM/YYYY`, or `-` when empty/unparsable.
pub fn to_display_text(text: &str) -> String {
    normalize(text)
        .map(format_br)
        .unwrap_or_else(|| "-".to_string())
}

/// The calendar date `n` days after `date`.
pub fn add_days(date: Date, n: i64) -> Result<Date, InvalidDateError> {
    date.checked_add(Duration::days(n))
        .ok_or_else(|| InvalidDateError::new(format!("{} {:+} days", format_iso(date), n)))
}

/// [`add_days`] on text, answering in the encoding the input used.
pub fn add_days_text(text: &str, n: i64) -> Result<String, InvalidDateError> {
    let (date, encoding) = parse_with_encoding(text)?;
    add_days(date, n).map(|shifted| encoding.format(shifted))
}

/// Today's calendar date in the local offset, falling back to UTC when the
/// local offset cannot be determined.
pub fn today_local() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Strictly earlier than `today`, by calendar date only.
pub fn is_before(date: Date, today: Date) -> bool {
    date < today
}

pub fn is_before_today(date: Date) -> bool {
    is_before(date, today_local())
}

/// Serde adapters accepting either encoding on input and writing ISO.
pub mod serde_tolerant {
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        use crate::dates::{format_iso, normalize};

        pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(date) => serializer.serialize_some(&format_iso(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(normalize))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_both_encodings_to_the_same_date() {
        assert_eq!(parse_strict("2024-01-10"), Ok(date!(2024 - 01 - 10)));
        assert_eq!(parse_strict("10/01/2024"), Ok(date!(2024 - 01 - 10)));
    }

    #[test]
    fn unrecognized_text_is_absent_when_tolerant() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("Jan 10 2024"), None);
        assert_eq!(normalize("2024-02-30"), None);
    }

    #[test]
    fn unrecognized_text_is_an_error_when_strict() {
        let err = parse_strict("2024/01/10").unwrap_err();
        assert_eq!(err.input, "2024/01/10");
        assert!(parse_strict("").is_err());
    }

    #[test]
    fn add_days_crosses_month_and_year_boundaries() {
        assert_eq!(add_days(date!(2024 - 01 - 10), 5), Ok(date!(2024 - 01 - 15)));
        assert_eq!(add_days(date!(2024 - 02 - 27), 3), Ok(date!(2024 - 03 - 01)));
        assert_eq!(add_days(date!(2024 - 12 - 30), 2), Ok(date!(2025 - 01 - 01)));
        assert_eq!(add_days(date!(2024 - 01 - 10), -10), Ok(date!(2023 - 12 - 31)));
    }

    #[test]
    fn add_days_past_the_calendar_fails() {
        assert!(add_days(Date::MAX, 1).is_err());
    }

    #[test]
    fn add_days_text_keeps_the_input_encoding() {
        assert_eq!(add_days_text("2024-01-10", 5).as_deref(), Ok("2024-01-15"));
        assert_eq!(add_days_text("28/02/2024", 2).as_deref(), Ok("01/03/2024"));
        assert!(add_days_text("tomorrow", 1).is_err());
    }

    #[test]
    fn display_and_input_conversions() {
        assert_eq!(to_iso_text("05/03/2024"), "2024-03-05");
        assert_eq!(to_iso_text("2024-03-05"), "2024-03-05");
        assert_eq!(to_iso_text("garbage"), "");
        assert_eq!(to_display_text("2024-03-05"), "05/03/2024");
        assert_eq!(to_display_text(""), "-");
    }

    #[test]
    fn before_is_strict_on_calendar_dates() {
        let today = date!(2024 - 06 - 01);
        assert!(is_before(date!(2024 - 05 - 31), today));
        assert!(!is_before(today, today));
        assert!(!is_before(date!(2024 - 06 - 02), today));
    }
}
