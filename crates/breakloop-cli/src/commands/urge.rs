//! Urge logging commands for CLI.

use breakloop_core::storage::Database;
use breakloop_core::{DatabaseError, Event, Resolution, Urge};
use chrono::{DateTime, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum UrgeAction {
    /// Log an urge against a habit
    Log {
        /// Habit ID the urge belongs to
        habit_id: String,
        /// What was happening when the urge hit
        #[arg(long)]
        context: String,
        /// Occurrence time, RFC3339 (default: now)
        #[arg(long)]
        time: Option<String>,
        /// Resolution: pending, handled, or not-handled (default: pending)
        #[arg(long)]
        resolution: Option<String>,
        /// How the urge was resolved
        #[arg(long)]
        comment: Option<String>,
    },
    /// List urges, newest occurrence first
    List {
        /// Only urges for this habit
        #[arg(long)]
        habit: Option<String>,
    },
    /// Get urge details
    Get {
        /// Urge ID
        id: String,
    },
    /// Update an urge
    Update {
        /// Urge ID
        id: String,
        /// New context
        #[arg(long)]
        context: Option<String>,
        /// New occurrence time, RFC3339
        #[arg(long)]
        time: Option<String>,
        /// Re-attach to a different habit
        #[arg(long)]
        habit: Option<String>,
        /// New resolution: pending, handled, or not-handled
        #[arg(long)]
        resolution: Option<String>,
        /// New resolution comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete an urge
    Delete {
        /// Urge ID
        id: String,
    },
}

fn parse_resolution(value: &str) -> Result<Resolution, String> {
    match value {
        "pending" => Ok(Resolution::Pending),
        "handled" => Ok(Resolution::Handled),
        "not-handled" | "notHandled" => Ok(Resolution::NotHandled),
        other => Err(format!(
            "unknown resolution '{other}' (expected pending, handled, or not-handled)"
        )),
    }
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

pub fn run(action: UrgeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let bus = super::change_bus();

    match action {
        UrgeAction::Log {
            habit_id,
            context,
            time,
            resolution,
            comment,
        } => {
            let time = match time {
                Some(t) => parse_time(&t)?,
                None => Utc::now(),
            };
            let mut urge = Urge::new(time, habit_id, context)?;
            if let Some(r) = resolution {
                urge = urge.with_resolution(parse_resolution(&r)?);
            }
            if let Some(c) = comment {
                urge = urge.with_resolution_comment(c);
            }

            db.insert_urge(&urge)?;
            bus.emit(&Event::UrgeLogged {
                urge_id: urge.id().to_string(),
                habit_id: urge.habit_id().to_string(),
                at: Utc::now(),
            });
            println!("Urge logged: {}", urge.id());
            println!("{}", serde_json::to_string_pretty(&urge)?);
        }
        UrgeAction::List { habit } => {
            let urges = match habit {
                Some(habit_id) => db.list_urges_for_habit(&habit_id)?,
                None => db.list_urges()?,
            };
            println!("{}", serde_json::to_string_pretty(&urges)?);
        }
        UrgeAction::Get { id } => match db.get_urge(&id)? {
            Some(urge) => println!("{}", serde_json::to_string_pretty(&urge)?),
            None => println!("Urge not found: {id}"),
        },
        UrgeAction::Update {
            id,
            context,
            time,
            habit,
            resolution,
            comment,
        } => {
            let mut urge = db.get_urge(&id)?.ok_or(DatabaseError::UrgeNotFound(id))?;

            if let Some(c) = context {
                urge.set_context(c)?;
            }
            if let Some(t) = time {
                urge.set_time(parse_time(&t)?);
            }
            if let Some(h) = habit {
                urge.set_habit_id(h);
            }
            if let Some(r) = resolution {
                urge.set_resolution(parse_resolution(&r)?);
            }
            if let Some(c) = comment {
                urge.set_resolution_comment(c);
            }

            db.update_urge(&urge)?;
            bus.emit(&Event::UrgeUpdated {
                urge_id: urge.id().to_string(),
                at: Utc::now(),
            });
            println!("Urge updated:");
            println!("{}", serde_json::to_string_pretty(&urge)?);
        }
        UrgeAction::Delete { id } => {
            db.delete_urge(&id)?;
            bus.emit(&Event::UrgeDeleted {
                urge_id: id.clone(),
                at: Utc::now(),
            });
            println!("Urge deleted: {id}");
        }
    }
    Ok(())
}
