use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`; the last two are
/// read in the local timezone, a bare day meaning its midnight.
pub fn parse_date_time(value: &str) -> eyre::Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").or_else(|_| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
    });

    match naive {
        Ok(naive) => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|d| d.with_timezone(&Utc))
            .ok_or_else(|| eyre::eyre!("'{value}' does not exist in the local timezone")),
        Err(_) => eyre::bail!(
            "Invalid date format '{}'. Use YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339.",
            value
        ),
    }
}

pub fn format_local(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
