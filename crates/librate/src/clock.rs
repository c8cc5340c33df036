use time::macros::format_description;
use time::OffsetDateTime;

/// Wall-clock timestamp in the `YYYY-MM-DD HH:MM:SS` form used by the
/// sampler log line and the streamed rate frames.
pub fn wall_clock_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_else(|_| "--".to_string())
}
