use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use percent_template::MemorySurface;
use rand::Rng;
use shared::domain::SortMode;
use storage::{default_export_path, DirStore};
use tracker_core::{Action, Session};

use crate::config::Settings;

pub type TrackerSession = Session<DirStore, MemorySurface>;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the tracker page.
    Show,
    /// Advance to the next stage.
    Next,
    /// Go back to the previous stage.
    Prev,
    /// Pick a random available weapon.
    Roll {
        /// Use the picked weapon right away.
        #[arg(long, conflicts_with = "reject")]
        accept: bool,
        /// Decline the picked weapon right away.
        #[arg(long)]
        reject: bool,
        /// Do not blacklist the picked weapon when confirming.
        #[arg(long)]
        keep: bool,
    },
    /// Use the weapon offered by the last roll (interactive mode).
    Accept {
        #[arg(long)]
        keep: bool,
    },
    /// Decline the weapon offered by the last roll (interactive mode).
    Reject {
        #[arg(long)]
        keep: bool,
    },
    /// Toggle whether a weapon is blacklisted.
    Blacklist {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Toggle dropping earlier weapons at stages that clear them.
    ToggleStageClear,
    /// Show or hide the weapon list.
    ToggleList,
    /// Set the weapon list ordering (name, availability, availabilityAndName).
    Sort { mode: SortMode },
    /// Write the run to a save file.
    Export { path: Option<PathBuf> },
    /// Replace the run with a save file.
    Import { path: PathBuf },
    /// Start a fresh run.
    Reset,
    /// Read commands from stdin until `quit`.
    Interactive,
}

/// One line typed in interactive mode.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "tracker>")]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

pub fn action_for(command: &Command) -> Option<Action> {
    let action = match command {
        Command::Next => Action::NextStage,
        Command::Prev => Action::PreviousStage,
        Command::Accept { keep } => Action::ConfirmPick {
            accept: true,
            add_to_blacklist: !keep,
        },
        Command::Reject { keep } => Action::ConfirmPick {
            accept: false,
            add_to_blacklist: !keep,
        },
        Command::Blacklist { name } => Action::ToggleBlacklist(name.join(" ")),
        Command::ToggleStageClear => Action::ToggleStageClear,
        Command::ToggleList => Action::ToggleWeaponList,
        Command::Sort { mode } => Action::SetSortMode(*mode),
        Command::Reset => Action::Reset,
        Command::Show
        | Command::Roll { .. }
        | Command::Export { .. }
        | Command::Import { .. }
        | Command::Interactive => return None,
    };
    Some(action)
}

pub fn run_command<R: Rng + ?Sized>(
    session: &mut TrackerSession,
    command: Command,
    rng: &mut R,
    settings: &Settings,
) -> Result<()> {
    if let Some(action) = action_for(&command) {
        session.dispatch(action, rng)?;
        return Ok(());
    }

    match command {
        Command::Roll {
            accept,
            reject,
            keep,
        } => {
            session.dispatch(Action::Roll, rng)?;
            if session.tracker().pending_pick().is_none() {
                println!("No weapons are available at this stage.");
            } else if accept || reject {
                session.dispatch(
                    Action::ConfirmPick {
                        accept,
                        add_to_blacklist: !keep,
                    },
                    rng,
                )?;
            }
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| default_export_path(&settings.export_dir));
            session.export(&path)?;
            println!("Exported run to {}", path.display());
        }
        Command::Import { path } => {
            session.import(&path)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn print_page(session: &TrackerSession) {
    for line in session.page().visible_text() {
        println!("{line}");
    }
}
