//! Parsing of the free-form time labels used by the timetable exports.
//!
//! Labels look like `"8:00 - 8:50"` or `"1:20 - 2:10"`: a 12-hour clock
//! without AM/PM markers. Only the start of the range matters for ordering.

use std::cmp::Ordering;

/// Hour assigned to labels with no readable start time. Sorts after any
/// real clock time.
pub const UNKNOWN_HOUR: u32 = 99;

/// Afternoon hours on a day that starts at 8 AM: `1:20` means 13:20.
const AFTERNOON_HOURS: std::ops::RangeInclusive<u32> = 1..=7;

const MAX_HOUR: u32 = 23;
const MAX_MINUTE: u32 = 59;

/// Reads the start of a time label as `(hour, minute)`, exactly as written.
///
/// An empty label, or one whose start carries no leading hour digits (such
/// as `"Unscheduled"`), yields `(UNKNOWN_HOUR, 0)`, as does a start that is
/// not a clock time. A readable hour with an unreadable minute yields
/// minute 0.
pub fn parse_time_label(label: &str) -> (u32, u32) {
    start_of(label).unwrap_or((UNKNOWN_HOUR, 0))
}

/// Minutes since midnight of a label's start, as written.
pub fn time_key(label: &str) -> u32 {
    let (hour, minute) = parse_time_label(label);
    hour * 60 + minute
}

/// Minutes since midnight of a grid slot's start, reading hours 1 to 7 as
/// afternoon hours.
pub fn slot_minutes(label: &str) -> u32 {
    match start_of(label) {
        Some((hour, minute)) if AFTERNOON_HOURS.contains(&hour) => (hour + 12) * 60 + minute,
        Some((hour, minute)) => hour * 60 + minute,
        None => UNKNOWN_HOUR * 60,
    }
}

/// Chronological comparator for grid slot labels.
pub fn compare_slots(a: &str, b: &str) -> Ordering {
    slot_minutes(a).cmp(&slot_minutes(b))
}

/// A start outside a clock face (hour above 23, minute above 59) is not a
/// time.
fn start_of(label: &str) -> Option<(u32, u32)> {
    let start = label.split('-').next().unwrap_or_default().trim();
    if start.is_empty() {
        return None;
    }
    let mut parts = start.split(':');
    let hour = clock_number(leading_digits(parts.next()?)?, MAX_HOUR)?;
    let minute = match parts.next().and_then(leading_digits) {
        Some(digits) => clock_number(digits, MAX_MINUTE)?,
        None => 0,
    };
    Some((hour, minute))
}

/// The run of ASCII digits at the start of `text`, after leading
/// whitespace. `"50am"` reads as `"50"`.
fn leading_digits(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(index, _)| index);
    (end > 0).then(|| &text[..end])
}

fn clock_number(digits: &str, max: u32) -> Option<u32> {
    digits.parse().ok().filter(|value| *value <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("8:00 - 8:50", (8, 0))]
    #[case("12:40 - 1:20", (12, 40))]
    #[case("1:20 - 2:10", (1, 20))]
    #[case(" 9:05-9:55 ", (9, 5))]
    #[case("10", (10, 0))]
    #[case("10:xx - 11:00", (10, 0))]
    #[case("Unscheduled", (UNKNOWN_HOUR, 0))]
    #[case("L1", (UNKNOWN_HOUR, 0))]
    #[case("", (UNKNOWN_HOUR, 0))]
    #[case(" - 9:00", (UNKNOWN_HOUR, 0))]
    #[case("24:00 - 1:00", (UNKNOWN_HOUR, 0))]
    #[case("8:60 - 9:00", (UNKNOWN_HOUR, 0))]
    #[case("80000000:00 - 9:00", (UNKNOWN_HOUR, 0))]
    #[case("8:4294967295 - 9:00", (UNKNOWN_HOUR, 0))]
    #[case("99999999999999999999:00", (UNKNOWN_HOUR, 0))]
    #[case("23:59", (23, 59))]
    fn parses_start_of_label(#[case] label: &str, #[case] expected: (u32, u32)) {
        assert_eq!(parse_time_label(label), expected);
    }

    #[rstest]
    #[case("8:00 - 8:50", 8 * 60)]
    #[case("12:40 - 1:20", 12 * 60 + 40)]
    #[case("1:20 - 2:10", 13 * 60 + 20)]
    #[case("7:00 - 7:50", 19 * 60)]
    #[case("Unscheduled", UNKNOWN_HOUR * 60)]
    #[case("80000000:00 - 9:00", UNKNOWN_HOUR * 60)]
    fn slot_minutes_reads_afternoon_hours(#[case] label: &str, #[case] expected: u32) {
        assert_eq!(slot_minutes(label), expected);
    }

    #[rstest]
    #[case("8:4294967295 - 9:00")]
    #[case("4294967295:00")]
    fn out_of_range_label_gets_unknown_key(#[case] label: &str) {
        assert_eq!(time_key(label), UNKNOWN_HOUR * 60);
    }

    #[test]
    fn morning_slot_sorts_before_afternoon_slot() {
        assert_eq!(compare_slots("9:00 - 9:50", "1:20 - 2:10"), Ordering::Less);
    }
}
