use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shared::domain::GameData;
use storage::DirStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracker_core::{PageSurfaces, Session};

mod commands;
mod config;

use commands::{print_page, run_command, Command, ReplLine, TrackerSession};
use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "tracker", about = "Tracks a random-weapon playthrough stage by stage")]
struct Cli {
    #[arg(long, default_value = "tracker.toml")]
    config: PathBuf,
    /// Game data document; overrides the configured path.
    #[arg(long)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(data) = cli.data {
        settings.data_path = data;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();
    for surface_id in &settings.unknown_templates {
        warn!(%surface_id, "config template names no surface; ignored");
    }

    let data = load_game_data(&settings).await?;
    let mut session: TrackerSession = Session::open(
        data,
        DirStore::new(&settings.state_dir),
        PageSurfaces::in_memory(&settings.templates),
    )?;

    let mut rng = rand::thread_rng();
    match cli.command.unwrap_or(Command::Show) {
        Command::Interactive => run_interactive(&mut session, &settings).await?,
        command => {
            run_command(&mut session, command, &mut rng, &settings)?;
            print_page(&session);
        }
    }

    Ok(())
}

async fn load_game_data(settings: &Settings) -> Result<GameData> {
    let path = &settings.data_path;
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read game data '{}'", path.display()))?;
    let data = GameData::from_json(&raw)
        .with_context(|| format!("invalid game data '{}'", path.display()))?;
    info!(
        stages = data.stage_count(),
        version = %data.terraria_version,
        "loaded game data"
    );
    Ok(data)
}

async fn run_interactive(session: &mut TrackerSession, settings: &Settings) -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_page(session);
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let command = match ReplLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == Command::Interactive {
            continue;
        }

        match run_command(session, command, &mut rng, settings) {
            Ok(()) => print_page(session),
            Err(err) => println!("error: {err:#}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use shared::domain::SortMode;
    use tracker_core::Action;

    use crate::commands::action_for;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_show_without_subcommand() {
        let cli = Cli::try_parse_from(["tracker"]).expect("parse");
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, PathBuf::from("tracker.toml"));
    }

    #[test]
    fn roll_cannot_both_accept_and_reject() {
        assert!(Cli::try_parse_from(["tracker", "roll", "--accept", "--reject"]).is_err());
    }

    #[test]
    fn interactive_line_joins_multi_word_weapon_names() {
        let line = ReplLine::try_parse_from("blacklist Copper Shortsword".split_whitespace())
            .expect("parse");
        assert_eq!(
            action_for(&line.command),
            Some(Action::ToggleBlacklist("Copper Shortsword".into()))
        );
    }

    #[test]
    fn sort_mode_is_parsed_from_its_key() {
        let line = ReplLine::try_parse_from(["sort", "name"]).expect("parse");
        assert_eq!(line.command, Command::Sort { mode: SortMode::Name });
        assert!(ReplLine::try_parse_from(["sort", "shuffle"]).is_err());
    }

    #[test]
    fn accept_defaults_to_blacklisting_the_pick() {
        let line = ReplLine::try_parse_from(["accept"]).expect("parse");
        assert_eq!(
            action_for(&line.command),
            Some(Action::ConfirmPick {
                accept: true,
                add_to_blacklist: true
            })
        );
        let line = ReplLine::try_parse_from(["reject", "--keep"]).expect("parse");
        assert_eq!(
            action_for(&line.command),
            Some(Action::ConfirmPick {
                accept: false,
                add_to_blacklist: false
            })
        );
    }
}
