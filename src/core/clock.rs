/*!
 * Wall Clock
 * Timestamps for process logs and reports
 */

use time::macros::format_description;
use time::OffsetDateTime;

/// Current local time, UTC when the local offset cannot be determined
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `Oct/17/2026 03:04:05 PM`
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[month repr:short]/[day]/[year] [hour repr:12]:[minute]:[second] [period case:upper]"
    ))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_twelve_hour_format() {
        let at = datetime!(2024-09-05 15:04:09 UTC);
        assert_eq!(format_timestamp(at), "Sep/05/2024 03:04:09 PM");

        let morning = datetime!(2024-01-31 00:30:00 UTC);
        assert_eq!(format_timestamp(morning), "Jan/31/2024 12:30:00 AM");
    }
}
