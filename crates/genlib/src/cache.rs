use crate::prelude::{eprintln, println, *};
use crate::store::FileStore;
use genlib_core::synth::CachedModule;

#[derive(Debug, clap::Parser)]
#[command(name = "cache")]
#[command(about = "Inspect and manage generated modules")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List cached modules
    #[clap(name = "list")]
    List {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print the cached code of a module
    #[clap(name = "show")]
    Show {
        /// Dotted name of the module
        name: String,

        /// Output the full record as JSON
        #[clap(long)]
        json: bool,
    },

    /// Remove a module from the cache
    #[clap(name = "remove")]
    Remove {
        /// Dotted name of the module
        name: String,
    },

    /// Remove every cached module
    #[clap(name = "clear")]
    Clear,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let store = FileStore::open(global.cache_dir.clone())?;

    if global.verbose {
        eprintln!("Cache directory: {}", store.dir().display());
        eprintln!();
    }

    match app.command {
        Commands::List { json } => {
            print!("{}", list_data(&store, json)?);
        }
        Commands::Show { name, json } => {
            let entry = store
                .get(&name)?
                .ok_or_else(|| eyre!("Module not cached: {}", name))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("{}", entry.code);
            }
        }
        Commands::Remove { name } => {
            if store.remove(&name)? {
                println!("Removed {}", name);
            } else {
                return Err(eyre!("Module not cached: {}", name));
            }
        }
        Commands::Clear => {
            let removed = store.clear()?;
            println!("Removed {} cached module(s)", removed);
        }
    }

    Ok(())
}

/// Stdout payload of `cache list`. Diagnostics never go here.
fn list_data(store: &FileStore, json: bool) -> Result<String> {
    let entries: Vec<CachedModule> = store.entries()?.into_values().collect();

    if json {
        Ok(f!("{}\n", serde_json::to_string_pretty(&entries)?))
    } else {
        Ok(format_list_text(&entries))
    }
}

fn format_list_text(entries: &[CachedModule]) -> String {
    if entries.is_empty() {
        return "No cached modules\n".to_string();
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["MODULE", "LINES", "CREATED", "PROMPT"]);

    for entry in entries {
        table.add_row(prettytable::row![
            entry.module_name,
            entry.code.lines().count(),
            entry.created_at.as_deref().unwrap_or("-"),
            summarize(entry.prompt.as_deref().unwrap_or("-"), 50)
        ]);
    }

    table.to_string()
}

fn summarize(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
