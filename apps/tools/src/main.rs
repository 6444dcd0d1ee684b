use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use percent_template::{Template, Values};
use storage::migrate;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upgrade a save file to the current schema and print it.
    Migrate {
        path: PathBuf,
        /// Overwrite the file with the migrated state.
        #[arg(long)]
        write: bool,
    },
    /// Render a `%NAME%` template from KEY=VALUE pairs.
    Render {
        template: String,
        values: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Migrate { path, write } => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not valid JSON", path.display()))?;
            let migrated = migrate(value)?;
            let rendered = serde_json::to_string_pretty(&migrated)?;
            if write {
                fs::write(&path, serde_json::to_string(&migrated)?)
                    .with_context(|| format!("failed to write '{}'", path.display()))?;
                println!("migrated {}", path.display());
            } else {
                println!("{rendered}");
            }
        }
        Command::Render { template, values } => {
            let values = parse_values(&values)?;
            let template = Template::parse(&template);
            let unbound: Vec<&str> = template
                .placeholders()
                .into_iter()
                .filter(|name| values.get(name).is_none())
                .collect();
            if !unbound.is_empty() {
                eprintln!("unbound placeholders: {}", unbound.join(", "));
            }
            println!("{}", template.render(&values));
        }
    }

    Ok(())
}

fn parse_values(pairs: &[String]) -> Result<Values> {
    let mut values = Values::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got '{pair}'");
        };
        values.insert(key, value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        let values = parse_values(&["STAGE=Jungle".into(), "NOTE=a=b".into()]).expect("values");
        assert_eq!(values.get("STAGE"), Some("Jungle"));
        assert_eq!(values.get("NOTE"), Some("a=b"));
    }

    #[test]
    fn rejects_pair_without_separator() {
        assert!(parse_values(&["STAGE".into()]).is_err());
    }
}
