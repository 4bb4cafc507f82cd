//! Human-readable duration strings (`10s`, `1.5s`, `250ms`, `1h2m3s`).
//!
//! This is the format of the deadline header and of durations in the
//! configuration file. A value is one or more decimal numbers, each with an
//! optional fraction and a unit suffix. Units: `ns`, `us` (`µs` and `μs` are
//! accepted when parsing), `ms`, `s`, `m`, `h`. A bare `0` is zero.

use std::time::Duration;

use crate::DurationParseError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

// Longest representable duration, shared with peers that store durations as
// signed 64-bit nanoseconds (about 292 years).
const MAX_TOTAL_NANOS: u128 = i64::MAX as u128;

// Digits beyond nanosecond precision of the largest unit contribute nothing.
const MAX_FRACTION_DIGITS: usize = 21;

/// Formats `duration` in the shortest exact form.
///
/// Sub-second values use the largest fitting of `ns`/`us`/`ms`; anything
/// longer is written as hours, minutes and (fractional) seconds, e.g.
/// `1h0m0s` or `2m3.5s`. Only ASCII is emitted.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_owned();
    }

    if nanos < NANOS_PER_SEC {
        return if nanos < NANOS_PER_MICRO {
            format!("{nanos}ns")
        } else if nanos < NANOS_PER_MILLI {
            format!("{}us", decimal(nanos, NANOS_PER_MICRO))
        } else {
            format!("{}ms", decimal(nanos, NANOS_PER_MILLI))
        };
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MIN;
    let seconds = nanos % NANOS_PER_MIN;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&decimal(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

/// Renders `value / unit` as a decimal with trailing zeros trimmed.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Parses a duration string.
///
/// A leading `+` is allowed. Negative, empty, unit-less (other than `0`) and
/// overflowing values are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest.starts_with('-') {
        return Err(DurationParseError::Negative(input.to_owned()));
    }
    if rest.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_number) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationParseError::Invalid(input.to_owned()));
        }

        let unit_len = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);
        rest = tail;

        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => NANOS_PER_MIN,
            "h" => NANOS_PER_HOUR,
            "" => return Err(DurationParseError::MissingUnit(input.to_owned())),
            other => {
                return Err(DurationParseError::UnknownUnit {
                    unit: other.to_owned(),
                    input: input.to_owned(),
                })
            }
        };

        let overflow = || DurationParseError::Overflow(input.to_owned());
        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut component = whole_value.checked_mul(scale).ok_or_else(overflow)?;
        component = component
            .checked_add(fraction_nanos(fraction, scale))
            .ok_or_else(overflow)?;
        total = total.checked_add(component).ok_or_else(overflow)?;
        if total > MAX_TOTAL_NANOS {
            return Err(overflow());
        }
    }

    let secs = u64::try_from(total / NANOS_PER_SEC)
        .map_err(|_| DurationParseError::Overflow(input.to_owned()))?;
    // The remainder is always below one second and fits in a u32.
    let nanos = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(len)
}

/// Nanoseconds contributed by the fractional digits `fraction` of `scale`.
fn fraction_nanos(fraction: &str, scale: u128) -> u128 {
    let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if digits.is_empty() {
        return 0;
    }
    // At most 21 digits, so both values fit comfortably in a u128.
    let numerator: u128 = digits.parse().unwrap_or(0);
    let denominator = 10u128.pow(digits.len() as u32);
    numerator.saturating_mul(scale) / denominator
}

/// Serde helpers for `Duration` fields written as duration strings.
pub mod serde_duration {
    use std::time::Duration;

    use serde::{de::Error as _, Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_duration(&raw).map_err(D::Error::custom)
    }

    /// Same as [`deserialize`], for `Option<Duration>` fields.
    pub mod option {
        use std::time::Duration;

        use serde::{de::Error as _, Deserialize, Deserializer};

        use crate::duration::parse_duration;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse_duration(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}
