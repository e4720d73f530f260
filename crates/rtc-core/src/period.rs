//! Legacy periodic extrapolation period strings.
//!
//! Two notations occur in the records: `'D;HH:MM:SS'` (optionally quoted) and
//! a plain number of seconds.

use chrono::TimeDelta;

use crate::error::{CoreError, CoreResult};

/// Parse a period string.
///
/// Returns `Ok(None)` for an empty string.
pub fn parse_period(text: &str) -> CoreResult<Option<TimeDelta>> {
    let trimmed = text.trim().trim_matches('\'').trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || CoreError::InvalidPeriod {
        text: text.to_string(),
    };

    let seconds = match trimmed.split_once(';') {
        Some((days, clock)) => {
            let days: i64 = days.trim().parse().map_err(|_| invalid())?;
            let mut parts = clock.trim().split(':');
            let mut next = || -> CoreResult<i64> {
                parts
                    .next()
                    .and_then(|p| p.trim().parse::<i64>().ok())
                    .filter(|v| *v >= 0)
                    .ok_or_else(invalid)
            };
            let (h, m, s) = (next()?, next()?, next()?);
            if parts.next().is_some() || days < 0 || m >= 60 || s >= 60 {
                return Err(invalid());
            }
            days.checked_mul(86_400)
                .and_then(|d| h.checked_mul(3_600).and_then(|h| d.checked_add(h)))
                .and_then(|t| t.checked_add(m * 60 + s))
                .ok_or_else(invalid)?
        }
        None => trimmed.parse::<i64>().map_err(|_| invalid())?,
    };

    TimeDelta::try_seconds(seconds).map(Some).ok_or_else(invalid)
}
