// ======================================================
// TIME INTERVALS (seconds)
// ======================================================

pub const MINUTE_SECS: i64 = 60;
pub const HOUR_SECS: i64 = 60 * MINUTE_SECS;
pub const DAY_SECS: i64 = 24 * HOUR_SECS;
pub const WEEK_SECS: i64 = 7 * DAY_SECS;
pub const MONTH_SECS: i64 = 30 * DAY_SECS;

// ======================================================
// BYTE SIZES (SI)
// ======================================================

pub const KILOBYTE: i64 = 1000;
pub const MEGABYTE: i64 = 1000 * KILOBYTE;
pub const GIGABYTE: i64 = 1000 * MEGABYTE;

const SIZE_SUFFIXES: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Human readable SI byte count: `83 B`, `1.2 kB`, `499 MB`.
pub fn human_bytes(size: u64) -> String {
    if size < 10 {
        return format!("{} B", size);
    }

    let mut exp = 0;
    let mut scale: u64 = 1;
    while exp + 1 < SIZE_SUFFIXES.len() && size / scale >= 1000 {
        scale *= 1000;
        exp += 1;
    }

    let value = ((size as f64 / scale as f64) * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, SIZE_SUFFIXES[exp])
    } else {
        format!("{:.0} {}", value, SIZE_SUFFIXES[exp])
    }
}

/// Relative phrase for `then` as seen from `now`, both epoch seconds:
/// `now`, `3 hours ago`. Timestamps ahead of `now` read as `now`.
pub fn relative_time(then: i64, now: i64) -> String {
    let elapsed = chrono::Duration::seconds(now.saturating_sub(then));
    timeago::Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}
