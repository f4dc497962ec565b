use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_backend::ApiClient;
use shared_config::AppConfig;

use crate::models::{Appointment, AppointmentStatus, BookingError, NewAppointment};
use crate::services::lifecycle::AppointmentLifecycle;

/// Client-side surface of the external appointment store. Every operation
/// is a single round trip; failures surface to the caller and retries are
/// always user-initiated.
pub struct AppointmentStore {
    api: ApiClient,
    lifecycle: AppointmentLifecycle,
}

impl AppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
            lifecycle: AppointmentLifecycle::new(),
        }
    }

    /// Fetch the caller's appointments, therapist field populated.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, BookingError> {
        debug!("Fetching appointments for user: {}", user_id);

        let path = format!("/api/appointments/user/{}", user_id);
        self.list(&path).await
    }

    /// Fetch a therapist's appointment requests, user field populated.
    pub async fn list_for_therapist(
        &self,
        therapist_id: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        debug!("Fetching appointments for therapist: {}", therapist_id);

        let path = format!("/api/appointments/therapist/{}", therapist_id);
        self.list(&path).await
    }

    pub async fn create(&self, request: &NewAppointment) -> Result<Appointment, BookingError> {
        debug!(
            "Creating appointment for user {} with therapist {}",
            request.user, request.therapist
        );

        let body = serde_json::to_value(request)
            .map_err(|e| BookingError::Backend(e.to_string()))?;

        let result: Value = self
            .api
            .request(Method::POST, "/api/appointments", Some(body))
            .await
            .map_err(|e| BookingError::Backend(e.to_string()))?;

        let appointment: Appointment = serde_json::from_value(result)
            .map_err(|e| BookingError::Backend(format!("Failed to parse created appointment: {}", e)))?;

        info!("Appointment {} created", appointment.id);
        Ok(appointment)
    }

    /// Transition an appointment's status, validating locally first so an
    /// invalid transition never reaches the network.
    pub async fn transition(
        &self,
        appointment: &Appointment,
        status: AppointmentStatus,
    ) -> Result<(), BookingError> {
        self.lifecycle
            .validate_status_transition(appointment.status, status)?;
        self.update_status(&appointment.id, status).await
    }

    pub async fn update_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
    ) -> Result<(), BookingError> {
        debug!("Updating appointment {} status to {}", appointment_id, status);

        let path = format!("/api/appointments/{}/status", appointment_id);
        let _: Value = self
            .api
            .request(Method::PUT, &path, Some(json!({ "status": status })))
            .await
            .map_err(|e| BookingError::Backend(e.to_string()))?;

        Ok(())
    }

    pub async fn update_notes(
        &self,
        appointment_id: &str,
        notes: Option<&str>,
        medication: Option<&str>,
    ) -> Result<(), BookingError> {
        debug!("Updating notes for appointment {}", appointment_id);

        let path = format!("/api/appointments/{}/notes", appointment_id);
        let _: Value = self
            .api
            .request(
                Method::PUT,
                &path,
                Some(json!({ "notes": notes, "medication": medication })),
            )
            .await
            .map_err(|e| BookingError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, path: &str) -> Result<Vec<Appointment>, BookingError> {
        let result: Vec<Value> = self
            .api
            .request(Method::GET, path, None)
            .await
            .map_err(|e| BookingError::Backend(e.to_string()))?;

        let appointments: Vec<Appointment> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| BookingError::Backend(format!("Failed to parse appointments: {}", e)))?;

        Ok(appointments)
    }
}
