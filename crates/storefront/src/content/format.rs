//! Display helpers for blog posts.

use chrono::{DateTime, Datelike, FixedOffset};

/// Average reading speed used for time-to-read estimates.
pub const WORDS_PER_MINUTE: usize = 200;

const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Format a publication date as `dd MMM yyyy` with Portuguese month
/// abbreviations, in the date's own offset.
#[must_use]
pub fn format_publication_date(date: &DateTime<FixedOffset>) -> String {
    let month = MONTHS_PT_BR
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{:02} {month} {}", date.day(), date.year())
}

/// Minutes needed to read `words` words, rounded up, at least 1.
#[must_use]
pub fn reading_time_minutes(words: usize) -> u32 {
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_publication_date() {
        let date = DateTime::parse_from_rfc3339("2021-03-05T10:00:00+00:00").unwrap();
        assert_eq!(format_publication_date(&date), "05 mar 2021");

        let date = DateTime::parse_from_rfc3339("2020-12-31T23:59:00-03:00").unwrap();
        assert_eq!(format_publication_date(&date), "31 dez 2020");
    }

    #[test]
    fn test_reading_time_minutes() {
        assert_eq!(reading_time_minutes(0), 1);
        assert_eq!(reading_time_minutes(1), 1);
        assert_eq!(reading_time_minutes(200), 1);
        assert_eq!(reading_time_minutes(201), 2);
        assert_eq!(reading_time_minutes(1000), 5);
    }
}
