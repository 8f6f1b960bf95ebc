//! Workout backend REST client and the completion sync seam

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    error::BackendError,
    models::{CompletionAck, Workout, WorkoutList},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Persists a finished workout somewhere outside the timer.
///
/// Implementations are called at most once per completed run and must not
/// assume the caller retries.
#[async_trait]
pub trait CompletionSync: Send + Sync {
    async fn mark_complete(&self, workout_id: &str) -> Result<(), BackendError>;
}

/// Bearer-authenticated client for the workout backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: String,
}

impl BackendClient {
    /// Create a client for `base_url`. The token is forwarded as-is.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/workouts/{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token).timeout(REQUEST_TIMEOUT)
    }

    /// Fetch a single workout by id
    pub async fn fetch_workout(&self, workout_id: &str) -> Result<Workout, BackendError> {
        debug!("Fetching workout {}", workout_id);
        let response = self
            .authorized(self.client.get(self.url(workout_id)))
            .send()
            .await?;

        let workout: Workout = decode(response, workout_id).await?;
        info!(
            "Loaded workout '{}' ({} min, {} exercises)",
            workout.name,
            workout.duration_minutes,
            workout.exercises.len()
        );
        Ok(workout)
    }

    /// Fetch every workout belonging to the token's user
    pub async fn list_workouts(&self) -> Result<Vec<Workout>, BackendError> {
        debug!("Fetching all workouts");
        let response = self
            .authorized(self.client.get(self.url("all-workouts")))
            .send()
            .await?;

        let list: WorkoutList = decode(response, "all-workouts").await?;
        if !list.success {
            return Err(BackendError::Rejected);
        }
        Ok(list.workouts)
    }
}

#[async_trait]
impl CompletionSync for BackendClient {
    async fn mark_complete(&self, workout_id: &str) -> Result<(), BackendError> {
        debug!("Marking workout {} complete", workout_id);
        let response = self
            .authorized(self.client.patch(self.url(&format!("{}/complete", workout_id))))
            .json(&json!({}))
            .send()
            .await?;

        let ack: CompletionAck = decode(response, workout_id).await?;
        if !ack.success {
            return Err(BackendError::Rejected);
        }

        info!("Workout {} marked complete on backend", workout_id);
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    resource: &str,
) -> Result<T, BackendError> {
    match response.status() {
        status if status.is_success() => Ok(response.json::<T>().await?),
        StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
        StatusCode::NOT_FOUND => Err(BackendError::NotFound(resource.to_string())),
        status => Err(BackendError::HttpStatus(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = BackendClient::new("http://localhost:5000//", "t");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("abc"), "http://localhost:5000/api/workouts/abc");
    }
}
