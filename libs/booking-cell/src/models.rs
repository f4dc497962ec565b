use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveTime, Utc};
use std::fmt;
use std::str::FromStr;

use therapist_cell::models::Weekday;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: PartyRef,
    pub therapist: PartyRef,
    pub date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub session_type: SessionType,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub medication: Option<String>,
}

/// A referenced party arrives either as a bare id or, on list endpoints,
/// as a populated `{_id, name, email}` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Profile {
        #[serde(rename = "_id")]
        id: String,
        name: String,
        email: String,
    },
    Id(String),
}

impl PartyRef {
    pub fn id(&self) -> &str {
        match self {
            PartyRef::Id(id) => id,
            PartyRef::Profile { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PartyRef::Id(_) => None,
            PartyRef::Profile { name, .. } => Some(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Accepted => write!(f, "accepted"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    #[default]
    #[serde(rename = "Video Call")]
    VideoCall,
    #[serde(rename = "In-Person")]
    InPerson,
    #[serde(rename = "Phone Call")]
    PhoneCall,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::VideoCall => write!(f, "Video Call"),
            SessionType::InPerson => write!(f, "In-Person"),
            SessionType::PhoneCall => write!(f, "Phone Call"),
        }
    }
}

impl FromStr for SessionType {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Video Call" => Ok(SessionType::VideoCall),
            "In-Person" => Ok(SessionType::InPerson),
            "Phone Call" => Ok(SessionType::PhoneCall),
            other => Err(BookingError::Validation(format!(
                "unknown session type: {}",
                other
            ))),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Body of `POST /api/appointments`. `date` serializes as an RFC 3339
/// absolute timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub user: String,
    pub therapist: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub session_type: SessionType,
}

// ==============================================================================
// BOOKING SELECTION
// ==============================================================================

/// The booking view's transient selection. Created empty on mount, reset
/// to empty after a confirmed submission. Downstream fields are cleared
/// whenever an upstream field changes.
#[derive(Debug, Clone, Default)]
pub struct BookingSelection {
    pub therapist_id: Option<String>,
    pub day: Option<Weekday>,
    pub time: Option<NaiveTime>,
    pub session_type: SessionType,
}

impl BookingSelection {
    pub fn is_complete(&self) -> bool {
        self.therapist_id.is_some() && self.day.is_some() && self.time.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    TherapistChosen,
    DayChosen,
    TimeChosen,
    Submitting,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Please select a therapist, day, and time")]
    IncompleteSelection,

    #[error("A booking submission is already in flight")]
    SubmissionInFlight,

    #[error("Unknown therapist: {0}")]
    UnknownTherapist(String),

    #[error("{0} is not an offered day for this therapist")]
    DayNotOffered(Weekday),

    #[error("{0} is not an offered time on the selected day")]
    TimeNotOffered(NaiveTime),

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
