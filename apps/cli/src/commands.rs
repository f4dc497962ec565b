use anyhow::{bail, Result};
use chrono::NaiveTime;

use booking_cell::models::SessionType;
use booking_cell::services::store::AppointmentStore;
use booking_cell::services::workflow::BookingWorkflow;
use shared_config::AppConfig;
use shared_models::session::SessionUser;
use shared_utils::SessionStore;
use therapist_cell::models::{TherapistFilters, Weekday};
use therapist_cell::services::directory::{self, DirectoryService};
use therapist_cell::services::schedule;

/// The one place that reads persisted session state; every command that
/// needs the current actor gets the user from here.
fn require_session(config: &AppConfig) -> Result<SessionUser> {
    let store = SessionStore::from_config(config);
    match store.require() {
        Ok(user) => Ok(user),
        Err(e) => bail!("{} - please log in through the MindWell app first", e),
    }
}

fn parse_day(raw: &str) -> Result<Weekday> {
    raw.parse::<Weekday>().map_err(|e| anyhow::anyhow!("{}", e))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| anyhow::anyhow!("invalid time (expected HH:MM): {}", raw))
}

pub async fn therapists(
    config: &AppConfig,
    specialization: Option<String>,
    day: Option<String>,
) -> Result<()> {
    let filters = TherapistFilters {
        specialization,
        day: day.as_deref().map(parse_day).transpose()?,
    };

    let service = DirectoryService::new(config);
    let all = service.fetch_therapists().await?;
    let filtered = directory::filter_therapists(&all, &filters);

    if filtered.is_empty() {
        println!("No therapists found.");
        return Ok(());
    }

    for therapist in filtered {
        let availability: Vec<String> = therapist
            .availability
            .iter()
            .map(|a| format!("{} {}-{}", a.day, a.start.format("%H:%M"), a.end.format("%H:%M")))
            .collect();
        println!(
            "{}  {} <{}>  {}  [{}]",
            therapist.id,
            therapist.name,
            therapist.email,
            therapist.specialization.as_deref().unwrap_or("N/A"),
            availability.join(", ")
        );
    }
    Ok(())
}

pub async fn slots(config: &AppConfig, therapist_id: &str, day: Option<String>) -> Result<()> {
    let service = DirectoryService::new(config);
    let all = service.fetch_therapists().await?;
    let therapist = all
        .iter()
        .find(|t| t.id == therapist_id)
        .ok_or_else(|| anyhow::anyhow!("unknown therapist: {}", therapist_id))?;

    match day {
        Some(raw) => {
            let day = parse_day(&raw)?;
            let times = schedule::day_slots(&therapist.availability, day);
            if times.is_empty() {
                println!("No slots on {}.", day);
            } else {
                for time in times {
                    println!("{}", time.format("%H:%M"));
                }
            }
        }
        None => {
            for day in therapist.available_days() {
                println!("{}", day);
            }
        }
    }
    Ok(())
}

pub async fn appointments(config: &AppConfig) -> Result<()> {
    let user = require_session(config)?;
    let store = AppointmentStore::new(config);
    let appointments = store.list_for_user(&user.id).await?;

    if appointments.is_empty() {
        println!("No appointments found.");
        return Ok(());
    }

    for appointment in appointments {
        println!(
            "{}  {}  {}  {}  {}",
            appointment.id,
            appointment.date.with_timezone(&chrono::Local),
            appointment.therapist.name().unwrap_or(appointment.therapist.id()),
            appointment.session_type,
            appointment.status
        );
    }
    Ok(())
}

pub async fn book(
    config: &AppConfig,
    therapist_id: &str,
    day: &str,
    time: &str,
    session_type: &str,
) -> Result<()> {
    let user = require_session(config)?;
    let day = parse_day(day)?;
    let time = parse_time(time)?;
    let session_type: SessionType = session_type.parse()?;

    let mut workflow = BookingWorkflow::new(config);
    workflow.load(&user).await?;

    workflow.choose_therapist(therapist_id)?;
    workflow.choose_day(day)?;
    workflow.choose_time(time)?;
    workflow.set_session_type(session_type);

    let appointment = workflow.submit(&user).await?;
    println!(
        "Appointment booked! {} with {} on {}",
        appointment.id,
        appointment.therapist.name().unwrap_or(appointment.therapist.id()),
        appointment.date.with_timezone(&chrono::Local)
    );
    Ok(())
}

pub fn logout(config: &AppConfig) -> Result<()> {
    SessionStore::from_config(config).clear()?;
    println!("Logged out.");
    Ok(())
}
