//! flag::duration
//!
//! Duration syntax for duration-valued flags.
//!
//! Accepts decimal numbers with unit suffixes, possibly chained:
//! `300ms`, `1.5s`, `1h30m`. Valid units are `ns`, `us` (or `µs`), `ms`,
//! `s`, `m`, and `h`. A bare `0` is the only unit-less value. Negative
//! durations are rejected because [`Duration`] is unsigned.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse a duration string such as `1h15m` or `2.5s`.
pub fn parse(input: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration {input:?}");

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let first = rest.as_bytes()[0];
        if first != b'.' && !first.is_ascii_digit() {
            return Err(invalid());
        }

        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after) = rest.split_at(int_len);
        rest = after;

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(format!("missing unit in duration {input:?}"));
        }
        let (unit, after) = rest.split_at(unit_len);
        rest = after;
        let scale = unit_nanos(unit)
            .ok_or_else(|| format!("unknown unit {unit:?} in duration {input:?}"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut amount = whole.checked_mul(scale).ok_or_else(invalid)?;
        if !frac_part.is_empty() {
            // Digits past nanosecond precision for the largest unit carry no weight.
            let digits = &frac_part[..frac_part.len().min(18)];
            let frac: u128 = digits.parse().map_err(|_| invalid())?;
            amount += frac * scale / 10u128.pow(digits.len() as u32);
        }

        total = total.checked_add(amount).ok_or_else(invalid)?;
        if total > i64::MAX as u128 {
            return Err(invalid());
        }
    }

    if negative && total != 0 {
        return Err(format!("negative duration {input:?} is not supported"));
    }
    Ok(Duration::from_nanos(total as u64))
}

/// Format a duration the way [`parse`] reads it back, e.g. `1h30m0s`, `1.5s`, `300ms`.
pub fn format(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}\u{00b5}s", fixed(nanos, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fixed(nanos, 6));
    }

    let total_secs = nanos / NANOS_PER_SEC;
    let hours = total_secs / 3_600;
    let minutes = (total_secs / 60) % 60;
    let seconds = fixed((total_secs % 60) * NANOS_PER_SEC + nanos % NANOS_PER_SEC, 9);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Render `value / 10^precision` with trailing fractional zeros dropped.
fn fixed(value: u128, precision: u32) -> String {
    let scale = 10u128.pow(precision);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = precision as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
