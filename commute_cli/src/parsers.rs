use std::time::Duration;

use jiff::SpanRelativeTo;

/// Accepts `30s`, `1m 30s`, `PT1M` or a plain number of seconds.
pub fn parse_timeout(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    let duration = if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<u64>() {
        jiff::SignedDuration::from_secs(seconds as i64)
    } else {
        return Err(format!("Invalid duration {input:?}"));
    };

    if duration.is_negative() || duration.is_zero() {
        return Err(String::from("Timeout must be positive"));
    }

    Ok(duration.unsigned_abs())
}
