//! REST gateway for a Supabase-style (PostgREST) table API.
//!
//! Exercises live in the `exercises` table, log entries in `exerciselog`.
//! Filters are expressed as `column=eq.value` query parameters.

use chrono::{DateTime, Utc};
use log::warn;
use replog_domain as domain;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

const EXERCISES_QUERY: &str = "exercises?select=*&order=name.asc";

pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Gateway {
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request(&self, method: Method, path_and_query: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{path_and_query}", self.base_url))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

impl domain::ExerciseRepository for Gateway {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let rows: Vec<ExerciseRow> = fetch(self.request(Method::GET, EXERCISES_QUERY)).await?;
        rows.into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| domain::ReadError::Other(Box::new(err)))
    }

    async fn create_exercise(
        &self,
        name: domain::Name,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let rows: Vec<ExerciseRow> = fetch(
            self.request(Method::POST, "exercises")
                .header("Prefer", "return=representation")
                .json(&json!({ "name": name.as_ref() })),
        )
        .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| domain::CreateError::Other("no row returned".into()))?;
        row.try_into()
            .map_err(|err| domain::CreateError::Other(Box::new(err)))
    }

    async fn delete_exercise(
        &self,
        name: &domain::Name,
    ) -> Result<domain::Name, domain::DeleteError> {
        let query = format!("exercises?{}", eq_filter("name", name.as_ref()));
        Ok(fetch_no_content(self.request(Method::DELETE, &query), name.clone()).await?)
    }
}

impl domain::ExerciseLogRepository for Gateway {
    async fn read_log_entries(
        &self,
        person: &domain::Name,
    ) -> Result<Vec<domain::LogEntry>, domain::ReadError> {
        let rows: Vec<LogEntryRow> =
            fetch(self.request(Method::GET, &log_entries_query(person))).await?;
        rows.into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| domain::ReadError::Other(Box::new(err)))
    }

    async fn create_log_entry(
        &self,
        entry: domain::LogEntry,
    ) -> Result<domain::LogEntry, domain::CreateError> {
        let rows: Vec<LogEntryRow> = fetch(
            self.request(Method::POST, "exerciselog")
                .header("Prefer", "return=representation")
                .json(&LogEntryRow::from(entry)),
        )
        .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| domain::CreateError::Other("no row returned".into()))?;
        row.try_into()
            .map_err(|err| domain::CreateError::Other(Box::new(err)))
    }

    async fn update_log_entry(
        &self,
        person: &domain::Name,
        exercise: &domain::Name,
        date: DateTime<Utc>,
        reps: domain::Reps,
    ) -> Result<domain::LogEntry, domain::UpdateError> {
        let rows: Vec<LogEntryRow> = fetch(
            self.request(Method::PATCH, &log_entry_filter(person, exercise, date))
                .header("Prefer", "return=representation")
                .json(&json!({ "reps": u32::from(reps) })),
        )
        .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| domain::UpdateError::Other("no matching log entry".into()))?;
        row.try_into()
            .map_err(|err| domain::UpdateError::Other(Box::new(err)))
    }
}

fn eq_filter(column: &str, value: &str) -> String {
    format!("{column}=eq.{}", urlencoding::encode(value))
}

fn log_entries_query(person: &domain::Name) -> String {
    format!(
        "exerciselog?select=*&{}&order=date.asc",
        eq_filter("person", person.as_ref())
    )
}

fn log_entry_filter(person: &domain::Name, exercise: &domain::Name, date: DateTime<Utc>) -> String {
    format!(
        "exerciselog?{}&{}&{}",
        eq_filter("person", person.as_ref()),
        eq_filter("exercise", exercise.as_ref()),
        eq_filter("date", &date.to_rfc3339())
    )
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct ExerciseRow {
    id: Uuid,
    name: String,
}

impl TryFrom<ExerciseRow> for domain::Exercise {
    type Error = RowError;

    fn try_from(row: ExerciseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: domain::Name::new(&row.name)?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct LogEntryRow {
    person: String,
    exercise: String,
    date: DateTime<Utc>,
    reps: u32,
}

impl From<domain::LogEntry> for LogEntryRow {
    fn from(entry: domain::LogEntry) -> Self {
        Self {
            person: entry.person.to_string(),
            exercise: entry.exercise.to_string(),
            date: entry.date,
            reps: entry.reps.into(),
        }
    }
}

impl TryFrom<LogEntryRow> for domain::LogEntry {
    type Error = RowError;

    fn try_from(row: LogEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            person: domain::Name::new(&row.person)?,
            exercise: domain::Name::new(&row.exercise)?,
            date: row.date,
            reps: domain::Reps::new(row.reps)?,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
enum RowError {
    #[error(transparent)]
    Name(#[from] domain::NameError),
    #[error(transparent)]
    Reps(#[from] domain::RepsError),
}

async fn fetch<T>(request: reqwest::RequestBuilder) -> Result<T, domain::StorageError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let response = request.send().await.map_err(into_storage_error)?;
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| domain::StorageError::Other(Box::new(err)))
    } else {
        warn!("unexpected response status: {status}");
        Err(domain::StorageError::Other(status.to_string().into()))
    }
}

async fn fetch_no_content<T>(
    request: reqwest::RequestBuilder,
    result: T,
) -> Result<T, domain::StorageError> {
    let response = request.send().await.map_err(into_storage_error)?;
    let status = response.status();
    if status.is_success() {
        Ok(result)
    } else {
        warn!("unexpected response status: {status}");
        Err(domain::StorageError::Other(status.to_string().into()))
    }
}

fn into_storage_error(err: reqwest::Error) -> domain::StorageError {
    if err.is_connect() || err.is_timeout() {
        domain::StorageError::NoConnection
    } else {
        domain::StorageError::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn date() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T10:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[rstest]
    #[case("person", "Ryan", "person=eq.Ryan")]
    #[case("name", "Bench Press", "name=eq.Bench%20Press")]
    #[case("name", "A&B", "name=eq.A%26B")]
    fn test_eq_filter(#[case] column: &str, #[case] value: &str, #[case] expected: &str) {
        assert_eq!(eq_filter(column, value), expected);
    }

    #[test]
    fn test_log_entries_query() {
        assert_eq!(
            log_entries_query(&domain::Name::new("Ryan").unwrap()),
            "exerciselog?select=*&person=eq.Ryan&order=date.asc"
        );
    }

    #[test]
    fn test_log_entry_filter() {
        assert_eq!(
            log_entry_filter(
                &domain::Name::new("Ryan").unwrap(),
                &domain::Name::new("Bench Press").unwrap(),
                date(),
            ),
            "exerciselog?person=eq.Ryan&exercise=eq.Bench%20Press\
             &date=eq.2024-03-01T10%3A00%3A00%2B00%3A00"
        );
    }

    #[test]
    fn test_exercise_row_serde() {
        let row = ExerciseRow {
            id: Uuid::nil(),
            name: "Pushups".to_string(),
        };
        let serialized = json!(row);
        let deserialized: ExerciseRow = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, row);
    }

    #[test]
    fn test_log_entry_row_serde() {
        let row = LogEntryRow {
            person: "Ryan".to_string(),
            exercise: "Pushups".to_string(),
            date: date(),
            reps: 10,
        };
        let serialized = json!(row);
        let deserialized: LogEntryRow = serde_json::from_value(serialized).unwrap();
        assert_eq!(deserialized, row);
    }

    #[test]
    fn test_exercise_from_row() {
        assert_eq!(
            domain::Exercise::try_from(ExerciseRow {
                id: Uuid::nil(),
                name: "Pushups".to_string(),
            }),
            Ok(domain::Exercise {
                id: domain::ExerciseID::nil(),
                name: domain::Name::new("Pushups").unwrap(),
            })
        );
        assert_eq!(
            domain::Exercise::try_from(ExerciseRow {
                id: Uuid::nil(),
                name: String::new(),
            }),
            Err(RowError::Name(domain::NameError::Empty))
        );
    }

    #[test]
    fn test_log_entry_from_row() {
        assert_eq!(
            domain::LogEntry::try_from(LogEntryRow {
                person: "Ryan".to_string(),
                exercise: "Pushups".to_string(),
                date: date(),
                reps: 10,
            }),
            Ok(domain::LogEntry {
                person: domain::Name::new("Ryan").unwrap(),
                exercise: domain::Name::new("Pushups").unwrap(),
                date: date(),
                reps: domain::Reps::new(10).unwrap(),
            })
        );
        assert_eq!(
            domain::LogEntry::try_from(LogEntryRow {
                person: "Ryan".to_string(),
                exercise: "Pushups".to_string(),
                date: date(),
                reps: 1000,
            }),
            Err(RowError::Reps(domain::RepsError::OutOfRange))
        );
    }

    #[test]
    fn test_log_entry_row_from_entry() {
        assert_eq!(
            LogEntryRow::from(domain::LogEntry {
                person: domain::Name::new("Ryan").unwrap(),
                exercise: domain::Name::new("Pushups").unwrap(),
                date: date(),
                reps: domain::Reps::new(10).unwrap(),
            }),
            LogEntryRow {
                person: "Ryan".to_string(),
                exercise: "Pushups".to_string(),
                date: date(),
                reps: 10,
            }
        );
    }
}
