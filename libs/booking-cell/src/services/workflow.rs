use chrono::{Local, NaiveTime, Utc};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::session::SessionUser;

use therapist_cell::models::{Therapist, Weekday};
use therapist_cell::services::directory::DirectoryService;
use therapist_cell::services::schedule;

use crate::models::{
    Appointment, BookingError, BookingSelection, NewAppointment, SessionType, WorkflowState,
};
use crate::services::store::AppointmentStore;

/// The booking view's state machine:
/// Idle -> TherapistChosen -> DayChosen -> TimeChosen -> Submitting,
/// returning to Idle on a confirmed submission and to TimeChosen on
/// failure. Each upstream change discards the dependent downstream
/// choices, so a stale day/time can never be submitted for a different
/// therapist.
pub struct BookingWorkflow {
    directory: DirectoryService,
    store: AppointmentStore,
    therapists: Vec<Therapist>,
    appointments: Vec<Appointment>,
    selection: BookingSelection,
    state: WorkflowState,
    submitting: bool,
}

impl BookingWorkflow {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            directory: DirectoryService::new(config),
            store: AppointmentStore::new(config),
            therapists: Vec::new(),
            appointments: Vec::new(),
            selection: BookingSelection::default(),
            state: WorkflowState::Idle,
            submitting: false,
        }
    }

    /// Bulk fetch performed when the view mounts: the full therapist list
    /// and the caller's appointments.
    pub async fn load(&mut self, user: &SessionUser) -> Result<(), BookingError> {
        self.therapists = self
            .directory
            .fetch_therapists()
            .await
            .map_err(|e| BookingError::Backend(e.to_string()))?;
        self.appointments = self.store.list_for_user(&user.id).await?;

        debug!(
            "Booking workflow loaded: {} therapists, {} appointments",
            self.therapists.len(),
            self.appointments.len()
        );
        Ok(())
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn therapists(&self) -> &[Therapist] {
        &self.therapists
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn selected_therapist(&self) -> Option<&Therapist> {
        let id = self.selection.therapist_id.as_deref()?;
        self.therapists.iter().find(|t| t.id == id)
    }

    /// Weekdays offerable for the current therapist choice.
    pub fn offered_days(&self) -> Vec<Weekday> {
        self.selected_therapist()
            .map(|t| t.available_days())
            .unwrap_or_default()
    }

    /// Slot times offerable for the current therapist + day choice.
    pub fn offered_times(&self) -> Vec<NaiveTime> {
        match (self.selected_therapist(), self.selection.day) {
            (Some(therapist), Some(day)) => schedule::day_slots(&therapist.availability, day),
            _ => Vec::new(),
        }
    }

    /// Idle -> TherapistChosen. Any previously chosen day and time are
    /// discarded.
    pub fn choose_therapist(&mut self, therapist_id: &str) -> Result<Vec<Weekday>, BookingError> {
        let therapist = self
            .therapists
            .iter()
            .find(|t| t.id == therapist_id)
            .ok_or_else(|| BookingError::UnknownTherapist(therapist_id.to_string()))?;
        let days = therapist.available_days();

        self.selection.therapist_id = Some(therapist_id.to_string());
        self.selection.day = None;
        self.selection.time = None;
        self.state = WorkflowState::TherapistChosen;

        debug!(
            "Therapist {} chosen, {} offerable days",
            therapist_id,
            days.len()
        );
        Ok(days)
    }

    /// TherapistChosen -> DayChosen. Any previously chosen time is
    /// discarded.
    pub fn choose_day(&mut self, day: Weekday) -> Result<Vec<NaiveTime>, BookingError> {
        let therapist = self
            .selected_therapist()
            .ok_or(BookingError::IncompleteSelection)?;
        if !therapist.is_available_on(day) {
            return Err(BookingError::DayNotOffered(day));
        }
        let times = schedule::day_slots(&therapist.availability, day);

        self.selection.day = Some(day);
        self.selection.time = None;
        self.state = WorkflowState::DayChosen;

        debug!("Day {} chosen, {} offerable times", day, times.len());
        Ok(times)
    }

    /// DayChosen -> TimeChosen.
    pub fn choose_time(&mut self, time: NaiveTime) -> Result<(), BookingError> {
        if self.selection.day.is_none() {
            return Err(BookingError::IncompleteSelection);
        }
        if !self.offered_times().contains(&time) {
            return Err(BookingError::TimeNotOffered(time));
        }

        self.selection.time = Some(time);
        self.state = WorkflowState::TimeChosen;
        Ok(())
    }

    pub fn set_session_type(&mut self, session_type: SessionType) {
        self.selection.session_type = session_type;
    }

    /// TimeChosen -> Submitting. Validates the selection locally before
    /// any network traffic and allows at most one in-flight submission.
    /// On success the selection resets and the appointment list is
    /// re-fetched; on failure the selection is preserved so the user can
    /// retry or adjust.
    pub async fn submit(&mut self, user: &SessionUser) -> Result<Appointment, BookingError> {
        let (therapist_id, day, time) = match (
            self.selection.therapist_id.clone(),
            self.selection.day,
            self.selection.time,
        ) {
            (Some(therapist_id), Some(day), Some(time)) => (therapist_id, day, time),
            _ => {
                warn!("Booking submitted with incomplete selection");
                return Err(BookingError::IncompleteSelection);
            }
        };

        if self.submitting {
            return Err(BookingError::SubmissionInFlight);
        }
        self.submitting = true;
        self.state = WorkflowState::Submitting;

        let date = schedule::next_occurrence(day, time, Local::now()).with_timezone(&Utc);
        let request = NewAppointment {
            user: user.id.clone(),
            therapist: therapist_id,
            date,
            session_type: self.selection.session_type,
        };

        let result = self.store.create(&request).await;
        self.submitting = false;

        match result {
            Ok(appointment) => {
                info!("Appointment {} booked for {}", appointment.id, date);
                self.selection.reset();
                self.state = WorkflowState::Idle;
                self.refresh_appointments(user).await;
                Ok(appointment)
            }
            Err(e) => {
                warn!("Booking failed: {}", e);
                self.state = WorkflowState::TimeChosen;
                Err(e)
            }
        }
    }

    /// Read-through refresh of the caller's appointment list. A failed
    /// refresh leaves the list empty rather than failing the booking that
    /// already succeeded.
    async fn refresh_appointments(&mut self, user: &SessionUser) {
        self.appointments = match self.store.list_for_user(&user.id).await {
            Ok(appointments) => appointments,
            Err(e) => {
                warn!("Failed to refresh appointments: {}", e);
                Vec::new()
            }
        };
    }
}
