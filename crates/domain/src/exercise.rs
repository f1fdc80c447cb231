use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn create_exercise(&self, name: Name) -> Result<Exercise, CreateError>;
    async fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    async fn create_exercise(&self, name: Name) -> Result<Exercise, CreateError>;
    async fn delete_exercise(&self, name: &Name) -> Result<Name, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// In-memory list of all known exercises, refreshed on demand.
///
/// The list is only ever replaced wholesale by a successful [`refresh`].
/// A failed gateway call leaves the previous state untouched.
///
/// [`refresh`]: Catalog::refresh
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn names(&self) -> Vec<&Name> {
        self.exercises.iter().map(|e| &e.name).collect()
    }

    #[must_use]
    pub fn is_name_taken(&self, candidate: &str) -> bool {
        self.exercises.iter().any(|e| e.name.as_ref() == candidate)
    }

    pub async fn refresh(&mut self, service: &impl ExerciseService) -> Result<(), ReadError> {
        self.exercises = service.get_exercises().await?;
        Ok(())
    }

    /// Create an exercise with the given name.
    ///
    /// Invalid or already taken names are rejected before any gateway call.
    /// Otherwise exactly one gateway write is requested, followed by one
    /// refresh. The refresh is performed even if the write fails, in which
    /// case the write error takes precedence.
    pub async fn create(
        &mut self,
        service: &impl ExerciseService,
        name: &str,
    ) -> Result<(), CreateError> {
        let name = Name::new(name)?;

        if self.is_name_taken(name.as_ref()) {
            return Err(CreateError::Conflict);
        }

        let created = service.create_exercise(name).await;
        let refreshed = self.refresh(service).await;

        created?;
        refreshed?;

        Ok(())
    }

    pub async fn delete(
        &mut self,
        service: &impl ExerciseService,
        name: &Name,
    ) -> Result<(), DeleteError> {
        let deleted = service.delete_exercise(name).await;
        let refreshed = self.refresh(service).await;

        deleted?;
        refreshed?;

        Ok(())
    }
}
