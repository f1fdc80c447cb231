#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod exercise_log;
mod name;
mod service;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{Catalog, Exercise, ExerciseID, ExerciseRepository, ExerciseService};
pub use exercise_log::{
    ExerciseLogRepository, ExerciseLogService, LogBook, LogEntry, Reps, RepsError,
};
pub use name::{Name, NameError};
pub use service::Service;
