use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{MockBackendResponses, TestConfig};
use therapist_cell::models::{TherapistFilters, Weekday};
use therapist_cell::services::directory::{
    available_days, filter_therapists, specializations, DirectoryService,
};

async fn mount_directory(mock_server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/therapists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(mock_server)
        .await;
}

fn sample_rows() -> serde_json::Value {
    json!([
        MockBackendResponses::therapist_row(
            "t-1",
            "Dr. Ada Osei",
            "Trauma & PTSD",
            json!([
                MockBackendResponses::availability_row("Monday", "09:00", "12:00"),
                MockBackendResponses::availability_row("Thursday", "13:00", "17:00"),
            ]),
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

#[tokio::test]
async fn fetches_and_decodes_the_directory() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server, sample_rows()).await;

    let config = TestConfig::with_api_url(&mock_server.uri());
    let service = DirectoryService::new(&config);

    let therapists = service.fetch_therapists().await.unwrap();

    assert_eq!(therapists.len(), 2);
    assert_eq!(therapists[0].id, "t-1");
    assert_eq!(therapists[0].specialization.as_deref(), Some("Trauma & PTSD"));
    assert_eq!(
        therapists[0].available_days(),
        vec![Weekday::Monday, Weekday::Thursday]
    );
}

#[tokio::test]
async fn specialization_filter_is_an_exact_match() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server, sample_rows()).await;

    let config = TestConfig::with_api_url(&mock_server.uri());
    let therapists = DirectoryService::new(&config)
        .fetch_therapists()
        .await
        .unwrap();

    let filters = TherapistFilters {
        specialization: Some("Trauma & PTSD".to_string()),
        day: None,
    };
    let filtered = filter_therapists(&therapists, &filters);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "t-1");
}

#[tokio::test]
async fn combined_filters_can_return_an_empty_list() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server, sample_rows()).await;

    let config = TestConfig::with_api_url(&mock_server.uri());
    let therapists = DirectoryService::new(&config)
        .fetch_therapists()
        .await
        .unwrap();

    // Matching specialization, but no availability on Sunday.
    let filters = TherapistFilters {
        specialization: Some("Trauma & PTSD".to_string()),
        day: Some(Weekday::Sunday),
    };

    assert!(filter_therapists(&therapists, &filters).is_empty());
}

#[tokio::test]
async fn filters_recompute_from_the_unfiltered_list() {
    let mock_server = MockServer::start().await;
    mount_directory(&mock_server, sample_rows()).await;

    let config = TestConfig::with_api_url(&mock_server.uri());
    let therapists = DirectoryService::new(&config)
        .fetch_therapists()
        .await
        .unwrap();

    let narrow = TherapistFilters {
        specialization: Some("Anxiety & Depression".to_string()),
        day: None,
    };
    assert_eq!(filter_therapists(&therapists, &narrow).len(), 1);

    // Clearing a filter restores the full list: nothing was lost.
    assert_eq!(
        filter_therapists(&therapists, &TherapistFilters::default()).len(),
        2
    );
}

#[test]
fn filter_control_lists_are_distinct() {
    let rows = serde_json::from_value::<Vec<therapist_cell::models::Therapist>>(json!([
        MockBackendResponses::therapist_row(
            "t-1",
            "A",
            "Trauma & PTSD",
            json!([
                MockBackendResponses::availability_row("Monday", "09:00", "12:00"),
                MockBackendResponses::availability_row("Monday", "14:00", "16:00"),
            ]),
        ),
        MockBackendResponses::therapist_row(
            "t-2",
            "B",
            "Trauma & PTSD",
            json!([MockBackendResponses::availability_row(
                "Monday", "10:00", "11:00"
            )]),
        ),
    ]))
    .unwrap();

    assert_eq!(specializations(&rows), vec!["Trauma & PTSD".to_string()]);
    assert_eq!(available_days(&rows), vec![Weekday::Monday]);
}

#[tokio::test]
async fn backend_failure_surfaces_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/therapists"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_api_url(&mock_server.uri());
    let result = DirectoryService::new(&config).fetch_therapists().await;

    assert!(result.is_err());
}
