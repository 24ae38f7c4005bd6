//! Timezone lookup and local-midnight resolution.
//!
//! Local midnight is not always a real instant: some zones switch DST at 00:00,
//! which either skips midnight or repeats it. Skipped midnights shift forward to
//! the first valid minute, repeated ones take the earliest instant.

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Resolves an IANA name. Empty, `auto` and unknown names fall back to UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("auto") {
        return Tz::UTC;
    }

    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            log::warn!("unknown timezone {:?}, falling back to UTC", name);
            Tz::UTC
        }
    }
}

pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    resolve_local(date.and_time(chrono::NaiveTime::MIN), tz)
}

fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    let mut wall = naive;
    // Real-world DST gaps are at most two hours.
    for _ in 0..=180 {
        match tz.from_local_datetime(&wall) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => wall += Duration::minutes(1),
        }
    }
    tz.from_utc_datetime(&naive)
}
