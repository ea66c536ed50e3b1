//! Urge entity: one occurrence of wanting to act on a habit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

fn validate_context(context: &str) -> Result<(), ValidationError> {
    if context.trim().is_empty() {
        return Err(ValidationError::EmptyContext);
    }
    Ok(())
}

/// Outcome of an urge.
///
/// Every urge starts out [`Pending`](Resolution::Pending) and is later
/// marked by the user as handled (resisted) or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    /// Not resolved yet.
    #[default]
    Pending,
    /// The urge was resisted.
    Handled,
    /// The user acted on the habit.
    NotHandled,
}

/// A single logged urge.
///
/// References its habit by id; the store enforces that the habit exists.
/// The occurrence time is deliberately unconstrained so urges can be
/// back-filled or pre-logged. The context is validated non-empty the same
/// way habit fields are, and is stored untrimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UrgeRecord")]
pub struct Urge {
    id: String,
    time: DateTime<Utc>,
    habit_id: String,
    resolution: Resolution,
    context: String,
    resolution_comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Raw serde mirror of [`Urge`]; converted through the validating `TryFrom`.
#[derive(Deserialize)]
struct UrgeRecord {
    id: String,
    time: DateTime<Utc>,
    habit_id: String,
    resolution: Resolution,
    context: String,
    resolution_comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UrgeRecord> for Urge {
    type Error = ValidationError;

    fn try_from(record: UrgeRecord) -> Result<Self, Self::Error> {
        Urge::restore(
            record.id,
            record.time,
            record.habit_id,
            record.resolution,
            record.context,
            record.resolution_comment,
            record.created_at,
            record.updated_at,
        )
    }
}

impl Urge {
    /// Log a new urge against a habit.
    ///
    /// The resolution starts as [`Resolution::Pending`] with an empty
    /// comment; use [`with_resolution`](Self::with_resolution) and
    /// [`with_resolution_comment`](Self::with_resolution_comment) to record
    /// an outcome immediately.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyContext`] for an empty or
    /// whitespace-only context.
    pub fn new(
        time: DateTime<Utc>,
        habit_id: impl Into<String>,
        context: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let context = context.into();
        validate_context(&context)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            time,
            habit_id: habit_id.into(),
            resolution: Resolution::default(),
            context,
            resolution_comment: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the resolution at construction time.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the resolution comment at construction time.
    pub fn with_resolution_comment(mut self, comment: impl Into<String>) -> Self {
        self.resolution_comment = comment.into();
        self
    }

    /// Rebuild an urge from previously stored fields, re-running validation.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if the stored fields no longer satisfy
    /// the construction rules.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: String,
        time: DateTime<Utc>,
        habit_id: String,
        resolution: Resolution,
        context: String,
        resolution_comment: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_context(&context)?;
        Ok(Self {
            id,
            time,
            habit_id,
            resolution,
            context,
            resolution_comment,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn habit_id(&self) -> &str {
        &self.habit_id
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn resolution_comment(&self) -> &str {
        &self.resolution_comment
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the context. Same rule as construction; the old context is
    /// kept on failure.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyContext`] for an empty or
    /// whitespace-only context.
    pub fn set_context(&mut self, context: impl Into<String>) -> Result<(), ValidationError> {
        let context = context.into();
        validate_context(&context)?;
        self.context = context;
        self.touch();
        Ok(())
    }

    /// Move the urge to a different occurrence time.
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.time = time;
        self.touch();
    }

    /// Re-attach the urge to a different habit. The store checks that the
    /// habit exists when the urge is persisted.
    pub fn set_habit_id(&mut self, habit_id: impl Into<String>) {
        self.habit_id = habit_id.into();
        self.touch();
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.touch();
    }

    pub fn set_resolution_comment(&mut self, comment: impl Into<String>) {
        self.resolution_comment = comment.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, h, m, 0).unwrap()
    }

    #[test]
    fn creates_urge_with_defaults() {
        let urge = Urge::new(at(14, 30), "habit-1", "Stressed after a meeting").unwrap();

        assert_eq!(urge.habit_id(), "habit-1");
        assert_eq!(urge.context(), "Stressed after a meeting");
        assert_eq!(urge.resolution(), Resolution::Pending);
        assert_eq!(urge.resolution_comment(), "");
        assert!(!urge.id().is_empty());
    }

    #[test]
    fn builder_sets_resolution_and_comment() {
        let urge = Urge::new(at(14, 30), "habit-1", "Saw an ad")
            .unwrap()
            .with_resolution(Resolution::Handled)
            .with_resolution_comment("Went for a walk instead");

        assert_eq!(urge.resolution(), Resolution::Handled);
        assert_eq!(urge.resolution_comment(), "Went for a walk instead");
    }

    #[test]
    fn rejects_empty_context() {
        let result = Urge::new(at(14, 30), "habit-1", "");
        assert_eq!(result.unwrap_err(), ValidationError::EmptyContext);
    }

    #[test]
    fn rejects_whitespace_only_context() {
        for context in ["   ", "\t", "\n\n", " \t\n "] {
            let result = Urge::new(at(14, 30), "habit-1", context);
            assert_eq!(
                result.unwrap_err(),
                ValidationError::EmptyContext,
                "{context:?}"
            );
        }
    }

    #[test]
    fn stores_context_untrimmed() {
        let urge = Urge::new(at(14, 30), "habit-1", "  boredom  ").unwrap();
        assert_eq!(urge.context(), "  boredom  ");
    }

    #[test]
    fn accepts_minimal_context() {
        let urge = Urge::new(at(14, 30), "habit-1", "X").unwrap();
        assert_eq!(urge.context(), "X");
    }

    #[test]
    fn accepts_multiline_and_unicode_context() {
        let context = "朝のコーヒー☕\nsecond line";
        let urge = Urge::new(at(14, 30), "habit-1", context).unwrap();
        assert_eq!(urge.context(), context);
    }

    #[test]
    fn time_is_unconstrained() {
        let past = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 59).unwrap();

        assert_eq!(Urge::new(past, "habit-1", "ctx").unwrap().time(), past);
        assert_eq!(Urge::new(future, "habit-1", "ctx").unwrap().time(), future);
    }

    #[test]
    fn multiple_urges_for_one_habit_get_distinct_ids() {
        let a = Urge::new(at(9, 0), "habit-1", "morning").unwrap();
        let b = Urge::new(at(9, 0), "habit-1", "morning").unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.habit_id(), b.habit_id());
    }

    #[test]
    fn set_context_keeps_old_value_on_failure() {
        let mut urge = Urge::new(at(14, 30), "habit-1", "boredom").unwrap();

        let result = urge.set_context("  ");

        assert_eq!(result.unwrap_err(), ValidationError::EmptyContext);
        assert_eq!(urge.context(), "boredom");
    }

    #[test]
    fn setters_update_fields() {
        let mut urge = Urge::new(at(14, 30), "habit-1", "boredom").unwrap();
        let before = urge.updated_at();

        urge.set_time(at(16, 0));
        urge.set_habit_id("habit-2");
        urge.set_resolution(Resolution::NotHandled);
        urge.set_resolution_comment("gave in");
        urge.set_context("stress").unwrap();

        assert_eq!(urge.time(), at(16, 0));
        assert_eq!(urge.habit_id(), "habit-2");
        assert_eq!(urge.resolution(), Resolution::NotHandled);
        assert_eq!(urge.resolution_comment(), "gave in");
        assert_eq!(urge.context(), "stress");
        assert!(urge.updated_at() >= before);
    }

    #[test]
    fn resolution_serializes_to_camel_case_tokens() {
        assert_eq!(
            serde_json::to_value(Resolution::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert_eq!(
            serde_json::to_value(Resolution::Handled).unwrap(),
            serde_json::json!("handled")
        );
        assert_eq!(
            serde_json::to_value(Resolution::NotHandled).unwrap(),
            serde_json::json!("notHandled")
        );
    }

    #[test]
    fn serde_round_trip_preserves_fields() {
        let urge = Urge::new(at(14, 30), "habit-1", "boredom")
            .unwrap()
            .with_resolution(Resolution::NotHandled)
            .with_resolution_comment("gave in after an hour");

        let json = serde_json::to_string(&urge).unwrap();
        let parsed: Urge = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, urge);
    }

    #[test]
    fn deserialization_rejects_blank_context() {
        let json = r#"{
            "id": "u1",
            "time": "2026-02-10T14:30:00Z",
            "habit_id": "h1",
            "resolution": "pending",
            "context": " ",
            "resolution_comment": "",
            "created_at": "2026-02-10T14:30:00Z",
            "updated_at": "2026-02-10T14:30:00Z"
        }"#;

        let err = serde_json::from_str::<Urge>(json).unwrap_err();
        assert!(err.to_string().contains("Context cannot be empty."));
    }

    proptest! {
        #[test]
        fn whitespace_only_contexts_are_always_rejected(context in "[ \\t\\r\\n]{0,12}") {
            let result = Urge::new(at(14, 30), "habit-1", context);
            prop_assert_eq!(result.unwrap_err(), ValidationError::EmptyContext);
        }

        #[test]
        fn contexts_with_any_visible_character_are_accepted(
            context in "[ \\t]{0,4}[a-zA-Z0-9]{1,24}[ \\t]{0,4}",
        ) {
            let urge = Urge::new(at(14, 30), "habit-1", context.clone()).unwrap();
            prop_assert_eq!(urge.context(), context.as_str());
        }
    }
}
