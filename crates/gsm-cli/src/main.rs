use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use gsm_core::config::{DEFAULT_REGISTRY_FILE, REGISTRY_ENV, picker_start_dir};
use gsm_core::{AddOutcome, Prompt, RegistryStore, SaveManager, Selection, SystemLauncher};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gsm-cli",
    about = "Register game save folders and back them up",
    version
)]
struct Cli {
    /// Registry JSON file
    #[arg(long, global = true, env = REGISTRY_ENV, default_value = DEFAULT_REGISTRY_FILE)]
    registry: PathBuf,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show registered save folders
    List,
    /// Register a folder; prompts for name and folder when PATH is omitted
    Add(AddArgs),
    /// Delete the record at ROW (as shown by `list`)
    Remove(RowArgs),
    /// Open the folder at ROW in the system file browser
    Open(RowArgs),
    /// Copy every registered folder into DEST, replacing earlier copies
    Backup(BackupArgs),
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
    /// Save folder path
    path: Option<String>,
    /// Game name shown next to the path
    #[arg(long, default_value = "")]
    name: String,
}

#[derive(ClapArgs, Debug)]
struct RowArgs {
    /// 1-based row number
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    row: u32,
}

#[derive(ClapArgs, Debug)]
struct BackupArgs {
    /// Destination folder (prompted when omitted)
    dest: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(2);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut manager = SaveManager::open(RegistryStore::new(&cli.registry))
        .with_context(|| format!("loading {}", cli.registry.display()))?;
    match cli.cmd.unwrap_or(Cmd::List) {
        Cmd::List => cmd_list(&manager),
        Cmd::Add(a) => cmd_add(&mut manager, a),
        Cmd::Remove(a) => cmd_remove(&mut manager, a),
        Cmd::Open(a) => cmd_open(&manager, a),
        Cmd::Backup(a) => cmd_backup(&manager, a),
    }
}

fn selection(row: u32) -> Selection {
    Selection::row(row as usize - 1)
}

fn cmd_list(manager: &SaveManager) -> anyhow::Result<()> {
    let view = manager.table();
    if view.is_empty() {
        println!("No save paths registered.");
    } else {
        print!("{}", view.to_text());
    }
    Ok(())
}

fn cmd_add(manager: &mut SaveManager, args: AddArgs) -> anyhow::Result<()> {
    let outcome = match args.path {
        Some(path) => manager.add_manual(&path, &args.name)?,
        None => {
            let start = picker_start_dir();
            manager.add_via_picker(&mut ConsolePrompt::default(), start.as_deref())?
        }
    };
    match outcome {
        AddOutcome::Added(i) => println!("Added row {}", i + 1),
        AddOutcome::Duplicate => println!("Already registered"),
        AddOutcome::EmptyPath => println!("Nothing to add: empty path"),
        AddOutcome::NotUnicode(p) => println!("Path is not valid Unicode: {}", p.display()),
        AddOutcome::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

fn cmd_remove(manager: &mut SaveManager, args: RowArgs) -> anyhow::Result<()> {
    match manager.delete_selected(selection(args.row))? {
        Some(rec) => println!("Removed {}", rec.path),
        None => println!("No row {}", args.row),
    }
    Ok(())
}

fn cmd_open(manager: &SaveManager, args: RowArgs) -> anyhow::Result<()> {
    match manager.open_selected(selection(args.row), &SystemLauncher)? {
        Some(rec) => println!("Opened {}", rec.path),
        None => println!("No row {}", args.row),
    }
    Ok(())
}

fn cmd_backup(manager: &SaveManager, args: BackupArgs) -> anyhow::Result<()> {
    if manager.registry().is_empty() {
        println!("No save paths registered; nothing to back up.");
        return Ok(());
    }
    let mut prompt = ConsolePrompt {
        preset_dir: args.dest,
    };
    let Some(report) = manager.backup(&mut prompt) else {
        println!("Cancelled");
        return Ok(());
    };
    for item in &report.items {
        match &item.result {
            Ok(stats) => println!(
                "ok      {} -> {} ({} files)",
                item.source.display(),
                item.destination.display(),
                stats.files
            ),
            Err(e) => println!("failed  {}", e),
        }
    }
    println!("{}", report.summary());
    Ok(())
}

/// Prompts on stdin/stdout. An empty answer or EOF cancels.
#[derive(Default)]
struct ConsolePrompt {
    preset_dir: Option<PathBuf>,
}

impl ConsolePrompt {
    fn ask(&self, question: &str) -> Option<String> {
        print!("{} ", question);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompt for ConsolePrompt {
    fn text_input(&mut self, title: &str, label: &str) -> Option<String> {
        self.ask(&format!("[{}] {}", title, label))
    }

    fn pick_directory(&mut self, title: &str, start: Option<&Path>) -> Option<PathBuf> {
        if let Some(dir) = self.preset_dir.take() {
            return Some(dir);
        }
        let hint = start
            .map(|p| format!(" (e.g. {})", p.display()))
            .unwrap_or_default();
        let answer = self.ask(&format!("[{}]{}:", title, hint))?;
        let answer = answer.trim();
        (!answer.is_empty()).then(|| PathBuf::from(answer))
    }

    fn warn(&mut self, title: &str, message: &str) {
        eprintln!("warning: [{}] {}", title, message);
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.ask(&format!("[{}] {} [y/N]", title, message))
            .is_some_and(|a| matches!(a.trim(), "y" | "Y" | "yes" | "Yes"))
    }
}
