use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_backend::ApiClient;
use shared_config::AppConfig;

use crate::models::{Therapist, TherapistFilters, Weekday};

/// Fetches the therapist directory and answers the browse view's filter
/// queries. The list is fetched once; every filter change recomputes from
/// the unfiltered source list.
pub struct DirectoryService {
    api: ApiClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub async fn fetch_therapists(&self) -> Result<Vec<Therapist>> {
        debug!("Fetching therapist directory");

        let result: Vec<Value> = self
            .api
            .request(Method::GET, "/api/therapists", None)
            .await?;

        let therapists: Vec<Therapist> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Therapist>, _>>()?;

        debug!("Fetched {} therapists", therapists.len());
        Ok(therapists)
    }
}

/// Apply the directory filters. Specialization is an exact match; the day
/// filter keeps therapists with at least one interval on that weekday.
pub fn filter_therapists<'a>(
    therapists: &'a [Therapist],
    filters: &TherapistFilters,
) -> Vec<&'a Therapist> {
    therapists
        .iter()
        .filter(|t| match &filters.specialization {
            Some(specialization) => t.specialization.as_deref() == Some(specialization.as_str()),
            None => true,
        })
        .filter(|t| match filters.day {
            Some(day) => t.is_available_on(day),
            None => true,
        })
        .collect()
}

/// Distinct specializations across the directory, first-seen order. Feeds
/// the specialization filter control.
pub fn specializations(therapists: &[Therapist]) -> Vec<String> {
    let mut seen = Vec::new();
    for therapist in therapists {
        if let Some(specialization) = &therapist.specialization {
            if !seen.contains(specialization) {
                seen.push(specialization.clone());
            }
        }
    }
    seen
}

/// Distinct weekdays on which any therapist has availability. Feeds the
/// day filter control.
pub fn available_days(therapists: &[Therapist]) -> Vec<Weekday> {
    let mut seen = Vec::new();
    for therapist in therapists {
        for day in therapist.available_days() {
            if !seen.contains(&day) {
                seen.push(day);
            }
        }
    }
    seen
}
