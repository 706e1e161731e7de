use chrono::{
    DateTime, Datelike, Days, Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;
use std::time::Duration;
use thiserror::Error;

/// Longest allowed lead time between now and an event's start, 90 days.
pub const MAX_LEAD_TIME_SECS: i64 = 7_776_000;

/// Failures while turning a time phrase into a countdown duration. Rendered
/// directly as the reply to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid datetime: {0}")]
    Unparseable(String),
    #[error("Please input a time in the future")]
    PastTime,
    #[error("Wow! That is a long ways away. Please schedule the event for closer in the future")]
    TooFarFuture,
}

/// A successfully parsed start time: the wall-clock moment in the bot's
/// fixed timezone plus the countdown duration measured from "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTime {
    pub local: DateTime<Tz>,
    pub duration: Duration,
}

/// Parses a start-time phrase against the current wall clock.
pub fn parse_event_time(input: &str) -> Result<ResolvedTime, TimeParseError> {
    resolve_event_time(input, Utc::now())
}

/// Parses a start-time phrase against an explicit "now".
///
/// Inputs are interpreted in US Eastern time, month before day. Accepted
/// forms: relative phrases ("in 20 minutes", "2 hours"), clock times
/// ("19:00", "7:30pm", rolling to tomorrow when already past), "tomorrow"
/// or "today" plus a clock time, and dates ("06/20/2024 19:00",
/// "06/20 at 7pm"). The result must land in the future and within the
/// 90 day lead-time cap; the cap boundary itself is accepted.
pub fn resolve_event_time(
    input: &str,
    now: DateTime<Utc>,
) -> Result<ResolvedTime, TimeParseError> {
    let text = input.trim().to_lowercase();
    if text.is_empty() {
        return Err(TimeParseError::Unparseable(input.trim().to_string()));
    }

    let now_local = now.with_timezone(&Eastern);
    let target = parse_relative(&text, now_local)
        .or_else(|| parse_clock(&text, now_local))
        .or_else(|| parse_date(&text, now_local))
        .ok_or_else(|| TimeParseError::Unparseable(input.trim().to_string()))?;

    let seconds = (target.with_timezone(&Utc) - now).num_seconds();
    if seconds <= 0 {
        return Err(TimeParseError::PastTime);
    }
    if seconds > MAX_LEAD_TIME_SECS {
        return Err(TimeParseError::TooFarFuture);
    }

    Ok(ResolvedTime {
        local: target,
        duration: Duration::from_secs(seconds as u64),
    })
}

/// "in 20 minutes", "20 minutes", "in 3 days"
fn parse_relative(text: &str, now_local: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    let (amount_token, unit_token) = if first == "in" {
        (tokens.next()?, tokens.next()?)
    } else {
        (first, tokens.next()?)
    };
    if tokens.next().is_some() {
        return None;
    }

    let amount: u64 = amount_token.parse().ok()?;
    let unit_secs: u64 = match unit_token {
        "second" | "seconds" | "sec" | "secs" => 1,
        "minute" | "minutes" | "min" | "mins" => 60,
        "hour" | "hours" | "hr" | "hrs" => 3_600,
        "day" | "days" => 86_400,
        "week" | "weeks" => 604_800,
        _ => return None,
    };
    let total = i64::try_from(amount.checked_mul(unit_secs)?).ok()?;
    now_local.checked_add_signed(ChronoDuration::seconds(total))
}

/// "19:00", "7:30pm", "tomorrow 9:00", "today at 7pm"
fn parse_clock(text: &str, now_local: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let (day_offset, explicit_day, rest) = if let Some(rest) = text.strip_prefix("tomorrow") {
        (1u64, true, rest)
    } else if let Some(rest) = text.strip_prefix("today") {
        (0, true, rest)
    } else {
        (0, false, text)
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix("at ").unwrap_or(rest);
    let time = parse_time_of_day(rest.trim())?;

    let date = now_local.date_naive().checked_add_days(Days::new(day_offset))?;
    let target = local_datetime(date, time)?;

    // A bare clock time that already passed today means tomorrow.
    if !explicit_day && target <= now_local {
        let tomorrow = now_local.date_naive().checked_add_days(Days::new(1))?;
        return local_datetime(tomorrow, time);
    }
    Some(target)
}

/// "06/20/2024 19:00", "06/20 at 7:30pm" (month/day, year optional)
fn parse_date(text: &str, now_local: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let (date_token, rest) = text.split_once(' ')?;
    if !date_token.contains('/') {
        return None;
    }
    let rest = rest.trim_start();
    let rest = rest.strip_prefix("at ").unwrap_or(rest);
    let time = parse_time_of_day(rest.trim())?;

    let parts: Vec<&str> = date_token.split('/').collect();
    let (month, day, year) = match parts.as_slice() {
        [m, d] => (m.parse::<u32>().ok()?, d.parse::<u32>().ok()?, now_local.year()),
        [m, d, y] => (
            m.parse::<u32>().ok()?,
            d.parse::<u32>().ok()?,
            y.parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    local_datetime(date, time)
}

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    if text.is_empty() || text.contains(' ') {
        return None;
    }
    let (clock, meridiem) = if let Some(rest) = text.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = text.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (text, None)
    };

    let (hour_token, minute_token) = match clock.split_once(':') {
        Some((h, m)) => (h, m),
        // A bare hour like "7pm" needs the meridiem to be unambiguous.
        None if meridiem.is_some() => (clock, "0"),
        None => return None,
    };
    let mut hour: u32 = hour_token.parse().ok()?;
    let minute: u32 = minute_token.parse().ok()?;

    if let Some(pm) = meridiem {
        if hour == 0 || hour > 12 {
            return None;
        }
        if pm && hour != 12 {
            hour += 12;
        }
        if !pm && hour == 12 {
            hour = 0;
        }
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn local_datetime(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    Eastern.from_local_datetime(&date.and_time(time)).earliest()
}

/// Countdown rendered the way the remaining command reports it.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    let days = total / 86_400;
    let rem = total % 86_400;
    let hours = rem / 3_600;
    let rem = rem % 3_600;
    let minutes = rem / 60;
    let seconds = rem % 60;
    format!("{days} days, {hours} hours, {minutes} minutes, and {seconds} seconds")
}

/// Start time rendered for scheduling confirmations.
pub fn format_event_time(local: &DateTime<Tz>) -> String {
    local.format("%m/%d/%Y at %I:%M%p EST").to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    // Saturday 2024-06-15, noon Eastern (EDT, UTC-4).
    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 16, 0, 0).single().unwrap()
    }

    fn duration_of(input: &str) -> Duration {
        resolve_event_time(input, test_now()).unwrap().duration
    }

    #[test]
    fn relative_phrases_resolve_to_their_duration() {
        assert_eq!(duration_of("in 20 minutes"), Duration::from_secs(1_200));
        assert_eq!(duration_of("In 2 Hours"), Duration::from_secs(7_200));
        assert_eq!(duration_of("3 days"), Duration::from_secs(259_200));
        assert_eq!(duration_of("in 1 week"), Duration::from_secs(604_800));
    }

    #[test]
    fn clock_time_later_today_counts_from_now() {
        assert_eq!(duration_of("19:00"), Duration::from_secs(25_200));
        assert_eq!(duration_of("7pm"), Duration::from_secs(25_200));
    }

    #[test]
    fn clock_time_already_past_rolls_to_tomorrow() {
        assert_eq!(duration_of("9:00"), Duration::from_secs(75_600));
        assert_eq!(duration_of("tomorrow 9:00"), Duration::from_secs(75_600));
    }

    #[test]
    fn explicit_today_does_not_roll_forward() {
        assert_eq!(
            resolve_event_time("today 9:00", test_now()),
            Err(TimeParseError::PastTime)
        );
    }

    #[test]
    fn dates_parse_month_first() {
        assert_eq!(
            duration_of("06/20/2024 at 7:30pm"),
            Duration::from_secs(459_000)
        );
        // Year defaults to the current one.
        assert_eq!(duration_of("06/20 19:00"), Duration::from_secs(457_200));
    }

    #[test]
    fn unparseable_input_is_reported_verbatim() {
        assert_eq!(
            resolve_event_time("gibberish", test_now()),
            Err(TimeParseError::Unparseable("gibberish".to_string()))
        );
        assert_eq!(
            resolve_event_time("", test_now()),
            Err(TimeParseError::Unparseable(String::new()))
        );
    }

    #[test]
    fn past_times_are_rejected() {
        assert_eq!(
            resolve_event_time("06/14/2024 12:00", test_now()),
            Err(TimeParseError::PastTime)
        );
        assert_eq!(
            resolve_event_time("in 0 minutes", test_now()),
            Err(TimeParseError::PastTime)
        );
    }

    #[test]
    fn lead_time_cap_boundary_is_inclusive() {
        // Exactly 90 days passes, one more day fails.
        assert_eq!(
            duration_of("in 90 days"),
            Duration::from_secs(MAX_LEAD_TIME_SECS as u64)
        );
        assert_eq!(
            resolve_event_time("in 91 days", test_now()),
            Err(TimeParseError::TooFarFuture)
        );
    }

    #[test]
    fn remaining_formats_by_divmod() {
        assert_eq!(
            format_remaining(Duration::from_secs(119)),
            "0 days, 0 hours, 1 minutes, and 59 seconds"
        );
        assert_eq!(
            format_remaining(Duration::from_secs(90_061)),
            "1 days, 1 hours, 1 minutes, and 1 seconds"
        );
        assert_eq!(
            format_remaining(Duration::ZERO),
            "0 days, 0 hours, 0 minutes, and 0 seconds"
        );
    }

    #[test]
    fn event_time_formats_with_meridiem() {
        let local = resolve_event_time("06/20/2024 at 7:30pm", test_now())
            .unwrap()
            .local;
        assert_eq!(format_event_time(&local), "06/20/2024 at 07:30PM EST");
    }
}
