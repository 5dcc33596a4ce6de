//! Interval text in the format of Go's `time.Duration`, which is what the
//! stream path carries.

use std::time::Duration;

use common::{DsError, DsResult};

const NANOS_PER_SEC: u128 = 1_000_000_000;

pub fn format_go_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }

    if nanos < NANOS_PER_SEC {
        let (unit_nanos, unit) = if nanos < 1_000 {
            (1, "ns")
        } else if nanos < 1_000_000 {
            (1_000, "µs")
        } else {
            (1_000_000, "ms")
        };
        return format!("{}{}", decimal(nanos, unit_nanos), unit);
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let secs = decimal((total_secs % 60) * NANOS_PER_SEC + nanos % NANOS_PER_SEC, NANOS_PER_SEC);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

// `unit` is a power of ten
fn decimal(value: u128, unit: u128) -> String {
    let int = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return int.to_string();
    }
    let width = unit.ilog10() as usize;
    let frac = format!("{:0width$}", rem, width = width);
    format!("{}.{}", int, frac.trim_end_matches('0'))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses `300ms`, `1.5s`, `1h2m3s` and the like. Negative durations are rejected.
pub fn parse_go_duration(s: &str) -> DsResult<Duration> {
    let err = || DsError::InvalidDuration(s.to_owned());

    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(err());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after) = rest.split_at(int_end);

        let (frac_part, after) = match after.strip_prefix('.') {
            Some(after) => {
                let end = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
                after.split_at(end)
            }
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let unit = unit_nanos(unit).ok_or_else(err)?;

        let int: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err())?
        };

        let mut frac: u128 = 0;
        let mut scale: u128 = 1;
        for digit in frac_part.bytes().take(18) {
            frac = frac * 10 + u128::from(digit - b'0');
            scale *= 10;
        }

        total = int
            .checked_mul(unit)
            .and_then(|v| v.checked_add(frac * unit / scale))
            .and_then(|v| total.checked_add(v))
            .ok_or_else(err)?;
        rest = after;
    }

    let nanos = u64::try_from(total).map_err(|_| err())?;
    Ok(Duration::from_nanos(nanos))
}
