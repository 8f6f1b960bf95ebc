//! Workout records as served by the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// One exercise inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default, alias = "duration")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Exercise {
    /// Short "3 sets × 12 reps" style description, if any volume is given
    pub fn volume(&self) -> Option<String> {
        match (self.sets, self.reps, self.duration_minutes) {
            (Some(sets), Some(reps), _) => Some(format!("{} sets × {} reps", sets, reps)),
            (Some(sets), None, _) => Some(format!("{} sets", sets)),
            (None, Some(reps), _) => Some(format!("{} reps", reps)),
            (None, None, Some(minutes)) => Some(format!("{} min", minutes)),
            (None, None, None) => None,
        }
    }
}

/// A scheduled workout. Owned by the backend; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub workout_type: Option<String>,
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

impl Workout {
    /// Nominal countdown length for this workout
    pub fn total_seconds(&self) -> Result<u64, TimerError> {
        let seconds = u64::from(self.duration_minutes) * 60;
        if seconds == 0 {
            return Err(TimerError::InvalidDuration(seconds));
        }
        Ok(seconds)
    }
}

/// Body of `GET /api/workouts/all-workouts`
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutList {
    pub success: bool,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

/// Body of `PATCH /api/workouts/:id/complete`
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionAck {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_backend_record() {
        let workout: Workout = serde_json::from_value(json!({
            "_id": "665f",
            "name": "Leg day",
            "type": "Strength",
            "duration": 45,
            "calories": 320,
            "date": "2025-03-02T08:30:00Z",
            "exercises": [
                { "name": "Squat", "sets": 4, "reps": 8 },
                { "name": "Plank", "durationMinutes": 2, "notes": "keep hips level" }
            ]
        }))
        .unwrap();

        assert_eq!(workout.id, "665f");
        assert_eq!(workout.workout_type.as_deref(), Some("Strength"));
        assert_eq!(workout.duration_minutes, 45);
        assert_eq!(workout.total_seconds(), Ok(2700));
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.exercises[0].volume().as_deref(), Some("4 sets × 8 reps"));
        assert_eq!(workout.exercises[1].volume().as_deref(), Some("2 min"));
        assert!(!workout.completed);
    }

    #[test]
    fn accepts_camel_case_field_names() {
        let workout: Workout = serde_json::from_value(json!({
            "id": "w1",
            "name": "Run",
            "durationMinutes": 20
        }))
        .unwrap();
        assert_eq!(workout.total_seconds(), Ok(1200));
        assert!(workout.exercises.is_empty());
    }

    #[test]
    fn zero_minute_workout_has_no_duration() {
        let workout: Workout = serde_json::from_value(json!({
            "id": "w2",
            "name": "Empty",
            "durationMinutes": 0
        }))
        .unwrap();
        assert_eq!(workout.total_seconds(), Err(TimerError::InvalidDuration(0)));
    }
}
