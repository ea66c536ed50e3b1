//! SQLite-based storage for habits and urges.
//!
//! Rows are rebuilt into entities through the same validation the
//! constructors run, so nothing invalid can come back out of the store.
//! The store is also the only place that can check the urge→habit edge,
//! and it does so on every urge insert and update.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::DatabaseError;
use crate::habit::Habit;
use crate::urge::{Resolution, Urge};

use super::data_dir;

/// Parse resolution from database string
fn parse_resolution(value: &str) -> Resolution {
    match value {
        "handled" => Resolution::Handled,
        "notHandled" => Resolution::NotHandled,
        _ => Resolution::Pending,
    }
}

/// Format resolution for database storage
fn format_resolution(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Pending => "pending",
        Resolution::Handled => "handled",
        Resolution::NotHandled => "notHandled",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            tracing::warn!("unparseable stored timestamp {dt_str:?}, substituting now");
            Utc::now()
        })
}

struct HabitRow {
    id: String,
    name: String,
    description: String,
    strategies_json: String,
    created_at: String,
    updated_at: String,
}

fn read_habit_row(row: &rusqlite::Row) -> Result<HabitRow, rusqlite::Error> {
    Ok(HabitRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        strategies_json: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn habit_from_row(row: HabitRow) -> Result<Habit, DatabaseError> {
    let id = row.id;
    let strategies: Vec<String> = serde_json::from_str(&row.strategies_json).unwrap_or_default();
    Habit::restore(
        id.clone(),
        row.name,
        row.description,
        strategies,
        parse_datetime_fallback(&row.created_at),
        parse_datetime_fallback(&row.updated_at),
    )
    .map_err(|source| DatabaseError::Corrupted {
        entity: "habit",
        id,
        source,
    })
}

struct UrgeRow {
    id: String,
    time: String,
    habit_id: String,
    resolution: String,
    context: String,
    resolution_comment: String,
    created_at: String,
    updated_at: String,
}

fn read_urge_row(row: &rusqlite::Row) -> Result<UrgeRow, rusqlite::Error> {
    Ok(UrgeRow {
        id: row.get(0)?,
        time: row.get(1)?,
        habit_id: row.get(2)?,
        resolution: row.get(3)?,
        context: row.get(4)?,
        resolution_comment: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn urge_from_row(row: UrgeRow) -> Result<Urge, DatabaseError> {
    let id = row.id;
    Urge::restore(
        id.clone(),
        parse_datetime_fallback(&row.time),
        row.habit_id,
        parse_resolution(&row.resolution),
        row.context,
        row.resolution_comment,
        parse_datetime_fallback(&row.created_at),
        parse_datetime_fallback(&row.updated_at),
    )
    .map_err(|source| DatabaseError::Corrupted {
        entity: "urge",
        id,
        source,
    })
}

const HABIT_COLUMNS: &str = "id, name, description, replacement_strategies, created_at, updated_at";
const URGE_COLUMNS: &str =
    "id, time, habit_id, resolution, context, resolution_comment, created_at, updated_at";

/// SQLite database for habit and urge storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/breakloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("breakloop.db");
        tracing::debug!("opening database at {}", path.display());
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate().map_err(DatabaseError::Query)?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS habits (
                id                     TEXT PRIMARY KEY,
                name                   TEXT NOT NULL,
                description            TEXT NOT NULL,
                replacement_strategies TEXT NOT NULL DEFAULT '[]',
                created_at             TEXT NOT NULL,
                updated_at             TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS urges (
                id                 TEXT PRIMARY KEY,
                time               TEXT NOT NULL,
                habit_id           TEXT NOT NULL,
                resolution         TEXT NOT NULL DEFAULT 'pending',
                context            TEXT NOT NULL,
                resolution_comment TEXT NOT NULL DEFAULT '',
                created_at         TEXT NOT NULL,
                updated_at         TEXT NOT NULL
            );

            -- The timeline reads urges newest-first; habit deletion checks the back-reference.
            CREATE INDEX IF NOT EXISTS idx_urges_time ON urges(time);
            CREATE INDEX IF NOT EXISTS idx_urges_habit_id ON urges(habit_id);
            CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits(created_at);",
        )?;
        Ok(())
    }

    fn habit_exists(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // === Habit CRUD ===

    /// Persist a newly constructed habit.
    pub fn insert_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        let strategies_json = serde_json::to_string(habit.replacement_strategies()).unwrap();
        self.conn.execute(
            &format!("INSERT INTO habits ({HABIT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                habit.id(),
                habit.name(),
                habit.description(),
                strategies_json,
                habit.created_at().to_rfc3339(),
                habit.updated_at().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a habit by ID.
    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"))?;
        match stmt.query_row(params![id], read_habit_row) {
            Ok(row) => Ok(Some(habit_from_row(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all habits in creation order.
    pub fn list_habits(&self) -> Result<Vec<Habit>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt.query_map([], read_habit_row)?;

        let mut habits = Vec::new();
        for row in rows {
            habits.push(habit_from_row(row?)?);
        }
        Ok(habits)
    }

    /// Update an existing habit.
    pub fn update_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        let strategies_json = serde_json::to_string(habit.replacement_strategies()).unwrap();
        let changed = self.conn.execute(
            "UPDATE habits
             SET name = ?1, description = ?2, replacement_strategies = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                habit.name(),
                habit.description(),
                strategies_json,
                habit.updated_at().to_rfc3339(),
                habit.id(),
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::HabitNotFound(habit.id().to_string()));
        }
        Ok(())
    }

    /// Delete a habit that no urges reference.
    ///
    /// Fails with [`DatabaseError::HabitInUse`] while logged urges still
    /// point at the habit; use [`delete_habit_cascade`](Self::delete_habit_cascade)
    /// to remove those too.
    pub fn delete_habit(&self, id: &str) -> Result<(), DatabaseError> {
        if !self.habit_exists(id)? {
            return Err(DatabaseError::HabitNotFound(id.to_string()));
        }
        let urge_count = self.count_urges_for_habit(id)?;
        if urge_count > 0 {
            return Err(DatabaseError::HabitInUse {
                id: id.to_string(),
                urge_count,
            });
        }
        self.conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Delete a habit together with its urges, in a single transaction.
    ///
    /// Returns the number of urges removed.
    pub fn delete_habit_cascade(&self, id: &str) -> Result<usize, DatabaseError> {
        if !self.habit_exists(id)? {
            return Err(DatabaseError::HabitNotFound(id.to_string()));
        }

        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<usize, rusqlite::Error> = (|| {
            let removed = self
                .conn
                .execute("DELETE FROM urges WHERE habit_id = ?1", params![id])?;
            self.conn
                .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
            Ok(removed)
        })();

        match result {
            Ok(removed) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(removed)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err.into())
            }
        }
    }

    /// Count urges referencing a habit.
    pub fn count_urges_for_habit(&self, habit_id: &str) -> Result<usize, DatabaseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM urges WHERE habit_id = ?1",
            params![habit_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // === Urge CRUD ===

    /// Persist a newly constructed urge.
    ///
    /// Fails with [`DatabaseError::HabitNotFound`] when the referenced
    /// habit does not exist.
    pub fn insert_urge(&self, urge: &Urge) -> Result<(), DatabaseError> {
        if !self.habit_exists(urge.habit_id())? {
            return Err(DatabaseError::HabitNotFound(urge.habit_id().to_string()));
        }
        self.conn.execute(
            &format!(
                "INSERT INTO urges ({URGE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                urge.id(),
                urge.time().to_rfc3339(),
                urge.habit_id(),
                format_resolution(urge.resolution()),
                urge.context(),
                urge.resolution_comment(),
                urge.created_at().to_rfc3339(),
                urge.updated_at().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an urge by ID.
    pub fn get_urge(&self, id: &str) -> Result<Option<Urge>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {URGE_COLUMNS} FROM urges WHERE id = ?1"))?;
        match stmt.query_row(params![id], read_urge_row) {
            Ok(row) => Ok(Some(urge_from_row(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all urges, newest occurrence first (the timeline's source order).
    pub fn list_urges(&self) -> Result<Vec<Urge>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {URGE_COLUMNS} FROM urges ORDER BY time DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], read_urge_row)?;

        let mut urges = Vec::new();
        for row in rows {
            urges.push(urge_from_row(row?)?);
        }
        Ok(urges)
    }

    /// List the urges referencing one habit, newest occurrence first.
    pub fn list_urges_for_habit(&self, habit_id: &str) -> Result<Vec<Urge>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {URGE_COLUMNS} FROM urges WHERE habit_id = ?1 ORDER BY time DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map(params![habit_id], read_urge_row)?;

        let mut urges = Vec::new();
        for row in rows {
            urges.push(urge_from_row(row?)?);
        }
        Ok(urges)
    }

    /// Update an existing urge, re-checking the habit reference.
    pub fn update_urge(&self, urge: &Urge) -> Result<(), DatabaseError> {
        if !self.habit_exists(urge.habit_id())? {
            return Err(DatabaseError::HabitNotFound(urge.habit_id().to_string()));
        }
        let changed = self.conn.execute(
            "UPDATE urges
             SET time = ?1, habit_id = ?2, resolution = ?3, context = ?4,
                 resolution_comment = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                urge.time().to_rfc3339(),
                urge.habit_id(),
                format_resolution(urge.resolution()),
                urge.context(),
                urge.resolution_comment(),
                urge.updated_at().to_rfc3339(),
                urge.id(),
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::UrgeNotFound(urge.id().to_string()));
        }
        Ok(())
    }

    /// Delete an urge.
    pub fn delete_urge(&self, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM urges WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::UrgeNotFound(id.to_string()));
        }
        Ok(())
    }
}
