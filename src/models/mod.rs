//! Backend data model
//!
//! Records fetched from the workout backend. The timer only reads them.

pub mod workout;

pub use workout::{CompletionAck, Exercise, Workout, WorkoutList};
