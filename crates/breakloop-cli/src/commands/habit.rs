//! Habit catalog commands for CLI.

use breakloop_core::storage::Database;
use breakloop_core::{DatabaseError, Event, Habit};
use chrono::Utc;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit name
        name: String,
        /// What the habit is and why it should go
        #[arg(long)]
        description: String,
        /// Replacement strategy (repeat the flag for more than one)
        #[arg(long = "strategy", required = true)]
        strategies: Vec<String>,
    },
    /// List habits in creation order
    List,
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Replacement strategies replacing the current list (repeatable)
        #[arg(long = "strategy")]
        strategies: Vec<String>,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
        /// Also delete the habit's logged urges
        #[arg(long)]
        cascade: bool,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let bus = super::change_bus();

    match action {
        HabitAction::Create {
            name,
            description,
            strategies,
        } => {
            let habit = Habit::new(name, description, strategies)?;
            db.insert_habit(&habit)?;
            bus.emit(&Event::HabitCreated {
                habit_id: habit.id().to_string(),
                at: Utc::now(),
            });
            println!("Habit created: {}", habit.id());
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List => {
            let habits = db.list_habits()?;
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Get { id } => match db.get_habit(&id)? {
            Some(habit) => println!("{}", serde_json::to_string_pretty(&habit)?),
            None => println!("Habit not found: {id}"),
        },
        HabitAction::Update {
            id,
            name,
            description,
            strategies,
        } => {
            let mut habit = db
                .get_habit(&id)?
                .ok_or(DatabaseError::HabitNotFound(id))?;

            if let Some(n) = name {
                habit.set_name(n)?;
            }
            if let Some(d) = description {
                habit.set_description(d)?;
            }
            if !strategies.is_empty() {
                habit.set_replacement_strategies(strategies)?;
            }

            db.update_habit(&habit)?;
            bus.emit(&Event::HabitUpdated {
                habit_id: habit.id().to_string(),
                at: Utc::now(),
            });
            println!("Habit updated:");
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Delete { id, cascade } => {
            let removed_urges = if cascade {
                db.delete_habit_cascade(&id)?
            } else {
                db.delete_habit(&id)?;
                0
            };
            bus.emit(&Event::HabitDeleted {
                habit_id: id.clone(),
                removed_urges,
                at: Utc::now(),
            });
            if removed_urges > 0 {
                println!("Habit deleted: {id} ({removed_urges} urge(s) removed)");
            } else {
                println!("Habit deleted: {id}");
            }
        }
    }
    Ok(())
}
