//! Weekly time slots and overlap detection.
//!
//! A slot is a `(day, start, end)` triple where `start`/`end` are `HH:MM`
//! strings in 24-hour time. An empty day means the course is unscheduled and
//! never conflicts with anything.
//!
//! Time parsing is lenient: anything that is not `H:M` with integer parts
//! reads as minute `0`, so a bad time field never fails a course record.
//! Both parts must parse in full: `"9.30"` and `"09:00x"` are malformed, not
//! prefixes to salvage. An hour large enough to overflow also reads as `0`.

use serde::{Deserialize, Serialize};

/// A single weekly meeting slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: String,
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(day: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// The slot used by courses created without a schedule.
    pub fn unscheduled() -> Self {
        Self::default()
    }

    pub fn is_scheduled(&self) -> bool {
        !self.day.is_empty()
    }

    /// `[start, end)` in minutes since midnight.
    pub fn minutes(&self) -> (i32, i32) {
        (to_minutes(&self.start), to_minutes(&self.end))
    }

    /// Half-open interval overlap on the same day.
    ///
    /// `thisEnd == otherStart` is not an overlap, so back-to-back classes are fine.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        if !self.is_scheduled() || !other.is_scheduled() {
            return false;
        }
        if self.day != other.day {
            return false;
        }
        let (this_start, this_end) = self.minutes();
        let (other_start, other_end) = other.minutes();
        this_start < other_end && this_end > other_start
    }
}

/// Parse `HH:MM` into minutes since midnight; malformed input yields `0`.
pub fn to_minutes(time: &str) -> i32 {
    let Some((hours, minutes)) = time.trim().split_once(':') else {
        return 0;
    };
    match (hours.trim().parse::<i32>(), minutes.trim().parse::<i32>()) {
        (Ok(h), Ok(m)) => h.checked_mul(60).and_then(|v| v.checked_add(m)).unwrap_or(0),
        _ => 0,
    }
}
