//! Dashboard statistics over a user's workouts

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Workout;

/// Aggregate numbers shown on the progress dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub total_calories: u64,
    pub avg_duration_minutes: u64,
    pub favorite_type: String,
}

impl WorkoutStats {
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        let total_workouts = workouts.len();
        let total_calories = workouts
            .iter()
            .map(|w| u64::from(w.calories.unwrap_or(0)))
            .sum();
        let total_duration: u64 = workouts.iter().map(|w| u64::from(w.duration_minutes)).sum();
        let avg_duration_minutes = if total_workouts == 0 {
            0
        } else {
            let n = total_workouts as u64;
            (2 * total_duration + n) / (2 * n)
        };

        // Insertion-ordered counts so the first type to reach the top count wins.
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for workout in workouts {
            let kind = workout.workout_type.as_deref().unwrap_or("Unknown");
            match counts.iter_mut().find(|(name, _)| *name == kind) {
                Some((_, count)) => *count += 1,
                None => counts.push((kind, 1)),
            }
        }
        let favorite_type = counts
            .iter()
            .fold(("None", 0), |best, &(name, count)| {
                if count > best.1 { (name, count) } else { best }
            })
            .0
            .to_string();

        Self {
            total_workouts,
            total_calories,
            avg_duration_minutes,
            favorite_type,
        }
    }
}

/// Calories and activity for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub calories: u64,
    pub types: Vec<String>,
    pub sessions: usize,
}

impl DailyTotals {
    /// Chart label such as `Mar 2`
    pub fn label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }

    /// Types done that day, with a session count when there was more than one
    pub fn summary(&self) -> String {
        let types = self.types.join(", ");
        if self.sessions > 1 {
            format!("{} ({} sessions)", types, self.sessions)
        } else {
            types
        }
    }
}

/// Group dated workouts by day, oldest first. Undated workouts are skipped.
pub fn daily_breakdown(workouts: &[Workout]) -> Vec<DailyTotals> {
    let mut dated: Vec<(NaiveDate, &Workout)> = workouts
        .iter()
        .filter_map(|w| w.date.map(|d| (d.date_naive(), w)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut days: Vec<DailyTotals> = Vec::new();
    for (date, workout) in dated {
        let kind = workout.workout_type.clone().unwrap_or_else(|| "Workout".to_string());
        let calories = u64::from(workout.calories.unwrap_or(0));

        match days.last_mut() {
            Some(day) if day.date == date => {
                day.calories += calories;
                day.sessions += 1;
                if !day.types.contains(&kind) {
                    day.types.push(kind);
                }
            }
            _ => days.push(DailyTotals {
                date,
                calories,
                types: vec![kind],
                sessions: 1,
            }),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn workout(
        kind: Option<&str>,
        minutes: u32,
        calories: Option<u32>,
        day: Option<u32>,
    ) -> Workout {
        Workout {
            id: format!("w-{}-{}", minutes, day.unwrap_or(0)),
            name: "Workout".to_string(),
            workout_type: kind.map(str::to_string),
            duration_minutes: minutes,
            exercises: Vec::new(),
            date: day.map(|d| Utc.with_ymd_and_hms(2025, 3, d, 9, 0, 0).unwrap()),
            calories,
            completed: false,
        }
    }

    #[test]
    fn empty_history() {
        let stats = WorkoutStats::from_workouts(&[]);
        assert_eq!(stats.total_workouts, 0);
        assert_eq!(stats.total_calories, 0);
        assert_eq!(stats.avg_duration_minutes, 0);
        assert_eq!(stats.favorite_type, "None");
        assert!(daily_breakdown(&[]).is_empty());
    }

    #[test]
    fn totals_and_favorite() {
        let workouts = vec![
            workout(Some("Cardio"), 30, Some(250), Some(1)),
            workout(Some("Strength"), 45, None, Some(2)),
            workout(Some("Strength"), 40, Some(300), Some(3)),
            workout(None, 20, Some(100), None),
        ];
        let stats = WorkoutStats::from_workouts(&workouts);
        assert_eq!(stats.total_workouts, 4);
        assert_eq!(stats.total_calories, 650);
        // 135 / 4 = 33.75
        assert_eq!(stats.avg_duration_minutes, 34);
        assert_eq!(stats.favorite_type, "Strength");
    }

    #[test]
    fn favorite_tie_keeps_first_seen() {
        let workouts = vec![
            workout(Some("Yoga"), 30, None, None),
            workout(Some("Cardio"), 30, None, None),
        ];
        assert_eq!(WorkoutStats::from_workouts(&workouts).favorite_type, "Yoga");
    }

    #[test]
    fn groups_by_day_in_order() {
        let workouts = vec![
            workout(Some("Strength"), 40, Some(300), Some(5)),
            workout(Some("Cardio"), 30, Some(200), Some(2)),
            workout(None, 20, None, Some(5)),
            workout(Some("Strength"), 45, Some(100), Some(5)),
            workout(Some("Yoga"), 60, Some(90), None),
        ];
        let days = daily_breakdown(&workouts);
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].label(), "Mar 2");
        assert_eq!(days[0].calories, 200);
        assert_eq!(days[0].summary(), "Cardio");

        assert_eq!(days[1].label(), "Mar 5");
        assert_eq!(days[1].calories, 400);
        assert_eq!(days[1].sessions, 3);
        assert_eq!(days[1].types, vec!["Strength".to_string(), "Workout".to_string()]);
        assert_eq!(days[1].summary(), "Strength, Workout (3 sessions)");
    }
}
