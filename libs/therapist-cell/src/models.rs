use serde::{Deserialize, Serialize};
use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

/// Weekday with the backend's indexing convention (0 = Sunday, 6 =
/// Saturday). Wire format is the full English name, matching what
/// therapist availability rows carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 0 = Sunday, 1 = Monday, etc.
    pub fn index(&self) -> u32 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Weekday {
    type Err = TherapistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .find(|day| day.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| TherapistError::ValidationError(format!("unknown weekday: {}", s)))
    }
}

/// Serde adapter for the backend's "HH:MM" wall-clock times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One recurring weekly window during which a therapist accepts bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityInterval {
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl AvailabilityInterval {
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }
}

impl Default for AvailabilityInterval {
    /// The editing flow's starter row: Monday 09:00-17:00.
    fn default() -> Self {
        Self {
            day: Weekday::Monday,
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        }
    }
}

/// A therapist's recurring weekly availability. Insertion order is display
/// order; a day may carry zero, one, or several intervals and no merging
/// or overlap resolution is performed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    intervals: Vec<AvailabilityInterval>,
}

impl WeeklySchedule {
    pub fn new(intervals: Vec<AvailabilityInterval>) -> Self {
        Self { intervals }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AvailabilityInterval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Weekdays with at least one interval, deduplicated, first-seen order.
    pub fn days(&self) -> Vec<Weekday> {
        let mut days = Vec::new();
        for interval in &self.intervals {
            if !days.contains(&interval.day) {
                days.push(interval.day);
            }
        }
        days
    }

    /// All intervals for one weekday in list order. An unknown day yields
    /// an empty list, never an error.
    pub fn intervals_for(&self, day: Weekday) -> Vec<&AvailabilityInterval> {
        self.intervals
            .iter()
            .filter(|interval| interval.day == day)
            .collect()
    }

    pub fn has_day(&self, day: Weekday) -> bool {
        self.intervals.iter().any(|interval| interval.day == day)
    }

    /// Append the editing flow's default row.
    pub fn push_default(&mut self) {
        self.intervals.push(AvailabilityInterval::default());
    }

    pub fn push(&mut self, interval: AvailabilityInterval) -> Result<(), TherapistError> {
        if interval.start >= interval.end {
            return Err(TherapistError::InvalidTimeSlot);
        }
        self.intervals.push(interval);
        Ok(())
    }

    /// Remove the interval at `index`. The last remaining interval cannot
    /// be removed so the schedule never empties while being edited.
    pub fn remove(&mut self, index: usize) -> Result<AvailabilityInterval, TherapistError> {
        if self.intervals.len() <= 1 {
            return Err(TherapistError::LastInterval);
        }
        if index >= self.intervals.len() {
            return Err(TherapistError::ValidationError(format!(
                "no availability interval at index {}",
                index
            )));
        }
        Ok(self.intervals.remove(index))
    }

    pub fn update(
        &mut self,
        index: usize,
        interval: AvailabilityInterval,
    ) -> Result<(), TherapistError> {
        if interval.start >= interval.end {
            return Err(TherapistError::InvalidTimeSlot);
        }
        match self.intervals.get_mut(index) {
            Some(slot) => {
                *slot = interval;
                Ok(())
            }
            None => Err(TherapistError::ValidationError(format!(
                "no availability interval at index {}",
                index
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub availability: WeeklySchedule,
}

impl Therapist {
    pub fn available_days(&self) -> Vec<Weekday> {
        self.availability.days()
    }

    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.availability.has_day(day)
    }
}

/// Independent, composable directory filters. `None` means "All".
#[derive(Debug, Clone, Default)]
pub struct TherapistFilters {
    pub specialization: Option<String>,
    pub day: Option<Weekday>,
}

// Error types specific to therapist operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TherapistError {
    NotFound,
    InvalidTimeSlot,
    LastInterval,
    ValidationError(String),
}

impl fmt::Display for TherapistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TherapistError::NotFound => write!(f, "Therapist not found"),
            TherapistError::InvalidTimeSlot => write!(f, "Start time must be before end time"),
            TherapistError::LastInterval => {
                write!(f, "Cannot remove the last availability interval")
            }
            TherapistError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for TherapistError {}
