use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::session::{Role, SessionUser};

pub struct TestConfig {
    pub api_base_url: String,
    pub session_path: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            session_path: "/tmp/mindwell-test-session.json".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_api_url(url: &str) -> AppConfig {
        AppConfig {
            api_base_url: url.to_string(),
            session_path: Self::default().session_path,
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            session_path: self.session_path.clone(),
        }
    }
}

pub struct TestUser;

impl TestUser {
    pub fn new(name: &str, email: &str, role: Role) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn member(email: &str) -> SessionUser {
        Self::new("Test Member", email, Role::User)
    }

    pub fn therapist(email: &str) -> SessionUser {
        Self::new("Test Therapist", email, Role::Therapist)
    }

    pub fn admin(email: &str) -> SessionUser {
        Self::new("Test Admin", email, Role::Admin)
    }
}

/// Canned backend bodies matching what the REST API returns.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn therapist_row(
        id: &str,
        name: &str,
        specialization: &str,
        availability: serde_json::Value,
    ) -> serde_json::Value {
        json!({
            "_id": id,
            "name": name,
            "email": format!("{}@mindwell.example", id),
            "phone": "555-0100",
            "specialization": specialization,
            "address": "12 Harbor Lane",
            "availability": availability
        })
    }

    pub fn availability_row(day: &str, start: &str, end: &str) -> serde_json::Value {
        json!({ "day": day, "start": start, "end": end })
    }

    pub fn appointment_row(
        id: &str,
        user_id: &str,
        therapist_id: &str,
        date: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "_id": id,
            "user": user_id,
            "therapist": {
                "_id": therapist_id,
                "name": "Dr. Ada Osei",
                "email": "ada@mindwell.example"
            },
            "date": date,
            "type": "Video Call",
            "status": status
        })
    }
}
