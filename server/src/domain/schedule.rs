//! Schedule interval logic
//!
//! Timetable slots are half-open intervals `[start, end)` on a weekday:
//! two slots overlap when they share any instant, and slots that merely
//! touch at an endpoint do not conflict.

use chrono::NaiveTime;

use crate::data::types::{TimetableItemRow, Weekday};

/// Parse a canonical "HH:MM" time-of-day string
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Format a time-of-day as canonical "HH:MM"
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Half-open interval intersection: `[a_start, a_end)` vs `[b_start, b_end)`
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

/// One day of a grouped week view
#[derive(Debug, Clone)]
pub struct DaySchedule {
    pub day: Weekday,
    pub items: Vec<TimetableItemRow>,
}

/// Group timetable items by weekday, Monday first, preserving the
/// start-time order the query produced within each day. Days with no
/// items are omitted.
pub fn group_by_day(items: Vec<TimetableItemRow>) -> Vec<DaySchedule> {
    let mut week: Vec<DaySchedule> = Vec::new();
    for item in items {
        match week.iter_mut().find(|d| d.day == item.day) {
            Some(day) => day.items.push(item),
            None => week.push(DaySchedule {
                day: item.day,
                items: vec![item],
            }),
        }
    }
    week.sort_by_key(|d| d.day.order());
    week
}
