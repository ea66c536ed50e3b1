//! Day-grouped urge timeline for CLI.

use std::collections::HashMap;

use breakloop_core::storage::{Config, Database};
use breakloop_core::{timeline, Resolution};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TimelineAction {
    /// Render the timeline, newest day first
    Show {
        /// Only the most recent N day buckets
        #[arg(long)]
        days: Option<usize>,
        /// Print the grouped timeline as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn resolution_label(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Pending => "pending",
        Resolution::Handled => "handled",
        Resolution::NotHandled => "not handled",
    }
}

pub fn run(action: TimelineAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TimelineAction::Show { days, json } => {
            let config = Config::load_or_default();
            let offset = config.utc_offset();

            let urges = db.list_urges()?;
            let mut groups = timeline::group_by_day_now(&urges, offset);
            if let Some(days) = days {
                groups.truncate(days);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
                return Ok(());
            }

            if groups.is_empty() {
                println!("No urges to show");
                return Ok(());
            }

            let habit_names: HashMap<String, String> = db
                .list_habits()?
                .into_iter()
                .map(|h| (h.id().to_string(), h.name().to_string()))
                .collect();

            for group in &groups {
                println!("{}", group.label);
                for urge in &group.urges {
                    let local = urge.time().with_timezone(&offset);
                    let clock = if config.display.clock_24h {
                        local.format("%H:%M").to_string()
                    } else {
                        local.format("%-I:%M %p").to_string()
                    };
                    let habit = habit_names
                        .get(urge.habit_id())
                        .map(String::as_str)
                        .unwrap_or("(unknown habit)");
                    println!(
                        "  {clock}  {habit}  [{}]  {}",
                        resolution_label(urge.resolution()),
                        urge.context()
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}
