use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike};

use crate::models::{AvailabilityInterval, Weekday, WeeklySchedule};

/// Fixed slot granularity shared with the backend.
pub const SLOT_MINUTES: i64 = 30;

/// Lazy, finite sequence of offerable start times within one availability
/// interval: 30-minute steps from `start`, emitted only while the full
/// slot fits (`t + 30min <= end`), so no partial slot is ever offered. An
/// interval shorter than one slot yields nothing, as does `start >= end`.
/// Restartable by calling `slots` again on the same interval.
#[derive(Debug, Clone)]
pub struct Slots {
    current: NaiveTime,
    end: NaiveTime,
}

impl Iterator for Slots {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<NaiveTime> {
        let (slot_end, wrapped) = self
            .current
            .overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        // A wrap means stepping crossed midnight: the window is exhausted.
        if wrapped != 0 || slot_end > self.end {
            return None;
        }
        let slot = self.current;
        self.current = slot_end;
        Some(slot)
    }
}

pub fn slots(interval: &AvailabilityInterval) -> Slots {
    Slots {
        current: interval.start,
        end: interval.end,
    }
}

/// All offerable times for one weekday: each interval's sequence in list
/// order, concatenated. No cross-interval sorting or overlap resolution.
pub fn day_slots(schedule: &WeeklySchedule, day: Weekday) -> Vec<NaiveTime> {
    schedule
        .intervals_for(day)
        .into_iter()
        .flat_map(slots)
        .collect()
}

/// Resolve a (weekday, time) choice to the next concrete instant, with
/// today counting as zero days ahead. When the chosen day is today the
/// result stays on today's date even if that time has already passed.
pub fn next_occurrence<Tz: TimeZone>(
    day: Weekday,
    time: NaiveTime,
    now: DateTime<Tz>,
) -> DateTime<Tz> {
    let today = now.weekday().num_days_from_sunday();
    let diff = (day.index() + 7 - today) % 7;

    let date = now + Duration::days(diff as i64);
    date.clone()
        .with_hour(time.hour())
        .and_then(|d| d.with_minute(time.minute()))
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(date)
}
