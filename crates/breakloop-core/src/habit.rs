//! Habit entity and its validation.
//!
//! A habit is a behavior the user wants to break. It carries a name, a
//! description, and the ordered list of replacement strategies offered
//! whenever an urge for the habit is logged. Construction, mutation, and
//! deserialization all run the same validation, so a live `Habit` always
//! satisfies the non-emptiness rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(())
}

fn validate_strategies(strategies: &[String]) -> Result<(), ValidationError> {
    if strategies.is_empty() {
        return Err(ValidationError::NoReplacementStrategies);
    }
    if strategies.iter().any(|s| s.trim().is_empty()) {
        return Err(ValidationError::EmptyReplacementStrategy);
    }
    Ok(())
}

/// A habit the user wants to break.
///
/// Field values are stored exactly as given; trimming happens only inside
/// the emptiness checks. Fields are private and every mutation goes through
/// a validated setter, so the construction invariants hold for the entity's
/// whole lifetime. Deserialization funnels through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HabitRecord")]
pub struct Habit {
    id: String,
    name: String,
    description: String,
    replacement_strategies: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Raw serde mirror of [`Habit`]; converted through the validating `TryFrom`.
#[derive(Deserialize)]
struct HabitRecord {
    id: String,
    name: String,
    description: String,
    replacement_strategies: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<HabitRecord> for Habit {
    type Error = ValidationError;

    fn try_from(record: HabitRecord) -> Result<Self, Self::Error> {
        Habit::restore(
            record.id,
            record.name,
            record.description,
            record.replacement_strategies,
            record.created_at,
            record.updated_at,
        )
    }
}

impl Habit {
    /// Create a new habit with a fresh id.
    ///
    /// Validation short-circuits in field order: name, description, the
    /// strategy list as a whole, then each strategy entry.
    ///
    /// # Errors
    /// Returns the first failing [`ValidationError`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        replacement_strategies: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let description = description.into();
        validate_name(&name)?;
        validate_description(&description)?;
        validate_strategies(&replacement_strategies)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            replacement_strategies,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a habit from previously stored fields, re-running validation.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if the stored fields no longer satisfy
    /// the construction rules.
    pub fn restore(
        id: String,
        name: String,
        description: String,
        replacement_strategies: Vec<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_name(&name)?;
        validate_description(&description)?;
        validate_strategies(&replacement_strategies)?;
        Ok(Self {
            id,
            name,
            description,
            replacement_strategies,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn replacement_strategies(&self) -> &[String] {
        &self.replacement_strategies
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Rename the habit. Same rule as construction; the old name is kept
    /// on failure.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyName`] for an empty or
    /// whitespace-only name.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Replace the description.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyDescription`] for an empty or
    /// whitespace-only description.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        self.description = description;
        self.touch();
        Ok(())
    }

    /// Replace the full strategy list.
    ///
    /// # Errors
    /// Returns [`ValidationError::NoReplacementStrategies`] for an empty
    /// list, or [`ValidationError::EmptyReplacementStrategy`] if any entry
    /// is empty or whitespace-only.
    pub fn set_replacement_strategies(
        &mut self,
        replacement_strategies: Vec<String>,
    ) -> Result<(), ValidationError> {
        validate_strategies(&replacement_strategies)?;
        self.replacement_strategies = replacement_strategies;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
