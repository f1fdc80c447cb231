use chrono::{DateTime, Utc};
use derive_more::{Display, Into};

use crate::{CreateError, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait ExerciseLogRepository {
    async fn read_log_entries(&self, person: &Name) -> Result<Vec<LogEntry>, ReadError>;
    async fn create_log_entry(&self, entry: LogEntry) -> Result<LogEntry, CreateError>;
    async fn update_log_entry(
        &self,
        person: &Name,
        exercise: &Name,
        date: DateTime<Utc>,
        reps: Reps,
    ) -> Result<LogEntry, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseLogService {
    async fn get_log_entries(&self, person: &Name) -> Result<Vec<LogEntry>, ReadError>;
    async fn create_log_entry(&self, entry: LogEntry) -> Result<LogEntry, CreateError>;
    async fn update_log_entry(
        &self,
        person: &Name,
        exercise: &Name,
        date: DateTime<Utc>,
        reps: Reps,
    ) -> Result<LogEntry, UpdateError>;
}

/// One logged set of repetitions.
///
/// Entries are identified by (person, exercise, date) when updated. No
/// uniqueness is enforced locally; if the gateway holds multiple entries
/// with the same key, a filter update affects all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub person: Name,
    pub exercise: Name,
    pub date: DateTime<Utc>,
    pub reps: Reps,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// In-memory list of the log entries of one person.
///
/// Like the [`Catalog`](crate::Catalog), the list is only replaced by a
/// successful [`refresh`]. Mutations go through the gateway without
/// touching local state; callers refresh to observe them.
///
/// [`refresh`]: LogBook::refresh
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogBook {
    entries: Vec<LogEntry>,
}

impl LogBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub async fn refresh(
        &mut self,
        service: &impl ExerciseLogService,
        person: &Name,
    ) -> Result<(), ReadError> {
        self.entries = service.get_log_entries(person).await?;
        Ok(())
    }

    pub async fn append(
        &self,
        service: &impl ExerciseLogService,
        entry: LogEntry,
    ) -> Result<(), CreateError> {
        service.create_log_entry(entry).await?;
        Ok(())
    }

    pub async fn update(
        &self,
        service: &impl ExerciseLogService,
        person: &Name,
        exercise: &Name,
        date: DateTime<Utc>,
        reps: Reps,
    ) -> Result<(), UpdateError> {
        service.update_log_entry(person, exercise, date, reps).await?;
        Ok(())
    }

    /// The repetition values logged for one exercise, in store order.
    ///
    /// Recomputed on every call. The result is a stable snapshot only as
    /// long as the book is not refreshed in between.
    pub fn series_for<'a>(
        &'a self,
        exercise: &'a Name,
    ) -> impl Iterator<Item = (DateTime<Utc>, Reps)> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.exercise == *exercise)
            .map(|entry| (entry.date, entry.reps))
    }
}
