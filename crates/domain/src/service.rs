use chrono::{DateTime, Utc};
use log::{debug, error};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseLogRepository, ExerciseLogService,
    ExerciseRepository, ExerciseService, LogEntry, Name, ReadError, Reps, UpdateError,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn create_exercise(&self, name: Name) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(name),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(name),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

impl<R: ExerciseLogRepository> ExerciseLogService for Service<R> {
    async fn get_log_entries(&self, person: &Name) -> Result<Vec<LogEntry>, ReadError> {
        log_on_error!(
            self.repository.read_log_entries(person),
            ReadError,
            "get",
            "log entries"
        )
    }

    async fn create_log_entry(&self, entry: LogEntry) -> Result<LogEntry, CreateError> {
        log_on_error!(
            self.repository.create_log_entry(entry),
            CreateError,
            "create",
            "log entry"
        )
    }

    async fn update_log_entry(
        &self,
        person: &Name,
        exercise: &Name,
        date: DateTime<Utc>,
        reps: Reps,
    ) -> Result<LogEntry, UpdateError> {
        log_on_error!(
            self.repository.update_log_entry(person, exercise, date, reps),
            UpdateError,
            "update",
            "log entry"
        )
    }
}
