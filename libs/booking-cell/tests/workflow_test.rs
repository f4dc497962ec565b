use chrono::{DateTime, Datelike, Local, NaiveTime, Timelike, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;

use booking_cell::models::{BookingError, SessionType, WorkflowState};
use booking_cell::services::workflow::BookingWorkflow;
use shared_models::session::SessionUser;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestUser};
use therapist_cell::models::Weekday;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn directory_rows() -> serde_json::Value {
    json!([
        MockBackendResponses::therapist_row(
            "t-1",
            "Dr. Ada Osei",
            "Trauma & PTSD",
            json!([MockBackendResponses::availability_row(
                "Monday", "09:00", "10:00"
            )]),
        ),
        MockBackendResponses::therapist_row(
            "t-2",
            "Dr. Noor Haddad",
            "Anxiety & Depression",
            json!([MockBackendResponses::availability_row(
                "Tuesday", "10:00", "14:00"
            )]),
        ),
    ])
}

async fn mount_reads(mock_server: &MockServer, user: &SessionUser) {
    Mock::given(method("GET"))
        .and(path("/api/therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(directory_rows()))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/appointments/user/{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(mock_server)
        .await;
}

async fn loaded_workflow(mock_server: &MockServer, user: &SessionUser) -> BookingWorkflow {
    let config = TestConfig::with_api_url(&mock_server.uri());
    let mut workflow = BookingWorkflow::new(&config);
    workflow.load(user).await.unwrap();
    workflow
}

#[tokio::test]
async fn choosing_a_therapist_offers_its_days() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");
    mount_reads(&mock_server, &user).await;

    let mut workflow = loaded_workflow(&mock_server, &user).await;

    let days = workflow.choose_therapist("t-1").unwrap();
    assert_eq!(days, vec![Weekday::Monday]);
    assert_eq!(workflow.state(), WorkflowState::TherapistChosen);
}

#[tokio::test]
async fn changing_therapist_clears_day_and_time() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");
    mount_reads(&mock_server, &user).await;

    let mut workflow = loaded_workflow(&mock_server, &user).await;

    workflow.choose_therapist("t-1").unwrap();
    workflow.choose_day(Weekday::Monday).unwrap();
    workflow.choose_time(time(9, 30)).unwrap();
    assert_eq!(workflow.state(), WorkflowState::TimeChosen);

    workflow.choose_therapist("t-2").unwrap();

    let selection = workflow.selection();
    assert_eq!(selection.therapist_id.as_deref(), Some("t-2"));
    assert_eq!(selection.day, None);
    assert_eq!(selection.time, None);
    assert_eq!(workflow.state(), WorkflowState::TherapistChosen);
}

#[tokio::test]
async fn changing_day_clears_time() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");
    mount_reads(&mock_server, &user).await;

    let mut workflow = loaded_workflow(&mock_server, &user).await;

    workflow.choose_therapist("t-2").unwrap();
    workflow.choose_day(Weekday::Tuesday).unwrap();
    workflow.choose_time(time(10, 30)).unwrap();

    workflow.choose_day(Weekday::Tuesday).unwrap();
    assert_eq!(workflow.selection().time, None);
    assert_eq!(workflow.state(), WorkflowState::DayChosen);
}

#[tokio::test]
async fn day_and_time_must_come_from_the_offered_lists() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");
    mount_reads(&mock_server, &user).await;

    let mut workflow = loaded_workflow(&mock_server, &user).await;
    workflow.choose_therapist("t-1").unwrap();

    assert_matches!(
        workflow.choose_day(Weekday::Sunday),
        Err(BookingError::DayNotOffered(Weekday::Sunday))
    );

    workflow.choose_day(Weekday::Monday).unwrap();
    assert_matches!(
        workflow.choose_time(time(11, 0)),
        Err(BookingError::TimeNotOffered(_))
    );
}

#[tokio::test]
async fn incomplete_submit_is_rejected_without_any_network_call() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");
    mount_reads(&mock_server, &user).await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut workflow = loaded_workflow(&mock_server, &user).await;
    workflow.choose_therapist("t-1").unwrap();
    workflow.choose_day(Weekday::Monday).unwrap();
    // No time chosen.

    assert_matches!(
        workflow.submit(&user).await,
        Err(BookingError::IncompleteSelection)
    );
}

#[tokio::test]
async fn successful_booking_resets_selection_and_refetches_appointments() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");

    Mock::given(method("GET"))
        .and(path("/api/therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(directory_rows()))
        .mount(&mock_server)
        .await;

    let booked_row = MockBackendResponses::appointment_row(
        "a-1",
        &user.id,
        "t-1",
        "2030-01-07T09:30:00Z",
        "pending",
    );

    Mock::given(method("GET"))
        .and(path(format!("/api/appointments/user/{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([booked_row.clone()])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_partial_json(json!({
            "user": user.id,
            "therapist": "t-1",
            "type": "Video Call"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(booked_row))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_api_url(&mock_server.uri());
    let mut workflow = BookingWorkflow::new(&config);
    workflow.load(&user).await.unwrap();

    workflow.choose_therapist("t-1").unwrap();
    workflow.choose_day(Weekday::Monday).unwrap();
    workflow.choose_time(time(9, 30)).unwrap();
    workflow.set_session_type(SessionType::VideoCall);

    let appointment = workflow.submit(&user).await.unwrap();
    assert_eq!(appointment.id, "a-1");

    // Selection is destroyed on success and the list was re-fetched.
    assert!(workflow.selection().therapist_id.is_none());
    assert_eq!(workflow.state(), WorkflowState::Idle);
    assert_eq!(workflow.appointments().len(), 1);

    // The submitted date is the next Monday (today counting as zero days
    // ahead) at 09:30 local time, seconds zeroed.
    let requests = mock_server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.url.path() == "/api/appointments")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    let sent: DateTime<Utc> = body["date"].as_str().unwrap().parse().unwrap();
    let local = sent.with_timezone(&Local);

    assert_eq!(local.weekday(), chrono::Weekday::Mon);
    assert_eq!(local.hour(), 9);
    assert_eq!(local.minute(), 30);
    assert_eq!(local.second(), 0);

    let days_ahead = (local.date_naive() - Local::now().date_naive()).num_days();
    assert!((0..7).contains(&days_ahead));
}

#[tokio::test]
async fn failed_booking_preserves_the_selection_for_retry() {
    let mock_server = MockServer::start().await;
    let user = TestUser::member("member@example.com");
    mount_reads(&mock_server, &user).await;

    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "slot already taken" })),
        )
        .mount(&mock_server)
        .await;

    let mut workflow = loaded_workflow(&mock_server, &user).await;
    workflow.choose_therapist("t-1").unwrap();
    workflow.choose_day(Weekday::Monday).unwrap();
    workflow.choose_time(time(9, 0)).unwrap();

    let error = workflow.submit(&user).await.unwrap_err();
    assert_matches!(error, BookingError::Backend(_));
    assert!(error.to_string().contains("slot already taken"));

    // Everything the user chose survives, ready for a retry.
    let selection = workflow.selection();
    assert_eq!(selection.therapist_id.as_deref(), Some("t-1"));
    assert_eq!(selection.day, Some(Weekday::Monday));
    assert_eq!(selection.time, Some(time(9, 0)));
    assert_eq!(workflow.state(), WorkflowState::TimeChosen);
}
