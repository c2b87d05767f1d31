//! sdvmod - Stardew Valley mod installer
//!
//! Drop a mod zip in, get a mod folder out.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sdvmod::game_finder;
use sdvmod::installer::{
    install_in_background, ConflictPolicy, InstallProgress, InstallRequest, ProgressCallback,
};
use sdvmod::paths::{display_name, is_single_component, is_zip_path};
use sdvmod::registry::{self, remove_mods, ManifestStatus};
use sdvmod::settings::Settings;
use sdvmod::status::{self, StatusLog};
use sdvmod::target::{self, FolderSource, TargetFolder};

#[derive(Parser)]
#[command(name = "sdvmod")]
#[command(version)]
#[command(about = "Stardew Valley mod installer - drop in a zip, get a mod")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Mods folder to use for this run instead of the saved one
    #[arg(long, global = true, env = "SDVMOD_MODS_DIR")]
    mods_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install one or more mod archives (.zip)
    Install {
        /// Paths to mod archives; non-.zip files are skipped
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// What to do if the mod folder already exists
        #[arg(long, value_enum, default_value_t = OnConflict::Overlay)]
        on_conflict: OnConflict,
    },

    /// List installed mods
    List {
        /// Show version, author and file count
        #[arg(short, long)]
        details: bool,
    },

    /// Remove installed mods by folder name
    Remove {
        /// Mod folder names as shown by `list --details`
        #[arg(required = true)]
        mods: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show recent status messages from earlier runs
    Log {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },

    /// Show or change the Mods folder
    Folder {
        #[command(subcommand)]
        action: FolderCommand,
    },
}

#[derive(Subcommand)]
enum FolderCommand {
    /// Print the Mods folder in use
    Show,
    /// Save a new Mods folder
    Set {
        /// Path to the game's Mods folder
        dir: PathBuf,
    },
    /// Search the usual install locations and save the result
    Detect,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnConflict {
    /// Extract over the existing folder
    Overlay,
    /// Leave the existing folder alone and fail
    Reject,
}

impl From<OnConflict> for ConflictPolicy {
    fn from(value: OnConflict) -> Self {
        match value {
            OnConflict::Overlay => ConflictPolicy::Overlay,
            OnConflict::Reject => ConflictPolicy::Reject,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging if verbose or RUST_LOG is set
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        let directive = if cli.verbose { "sdvmod=debug" } else { "sdvmod=warn" };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
            .init();
    }

    let mut settings = Settings::load();
    let mut log = StatusLog::new();

    let result = run_command(cli.command, cli.mods_dir.as_deref(), &mut settings, &mut log).await;

    if !log.is_empty() {
        if let Err(e) = Settings::status_log_path().and_then(|path| log.append_to(&path)) {
            warn!("Could not save status log: {:#}", e);
        }
    }

    result
}

async fn run_command(
    command: Commands,
    override_dir: Option<&Path>,
    settings: &mut Settings,
    log: &mut StatusLog,
) -> Result<()> {
    let (folder, outcome) = match command {
        Commands::Folder { action } => {
            return run_folder_command(action, override_dir, settings, log);
        }
        Commands::Log { lines } => return run_log(lines),
        Commands::Install { archives, on_conflict } => {
            let folder = open_target_folder(override_dir, settings, log)?;
            let outcome = run_install(&folder, &archives, on_conflict.into(), log).await;
            (folder, outcome)
        }
        Commands::List { details } => {
            let folder = open_target_folder(override_dir, settings, log)?;
            let outcome = run_list(&folder, details, log);
            (folder, outcome)
        }
        Commands::Remove { mods, yes } => {
            let folder = open_target_folder(override_dir, settings, log)?;
            let outcome = run_remove(&folder, &mods, yes, log);
            (folder, outcome)
        }
    };

    // Persist the folder on shutdown, even when the command failed
    if folder.remember_in(settings) {
        settings.save()?;
    }

    outcome
}

/// Resolve the Mods folder for commands that need one
fn open_target_folder(
    override_dir: Option<&Path>,
    settings: &Settings,
    log: &mut StatusLog,
) -> Result<TargetFolder> {
    let folder =
        target::resolve_target_folder(override_dir, settings, game_finder::find_mods_folder)?;

    if folder.source == FolderSource::Detected {
        println!("{}", log.push(format!("Auto-detected Mods folder: {}", folder.path.display())));
    }

    Ok(folder)
}

fn run_log(lines: usize) -> Result<()> {
    let history = status::read_history(&Settings::status_log_path()?, lines)?;
    if history.is_empty() {
        println!("No status messages yet.");
    }
    for line in history {
        println!("{}", line);
    }
    Ok(())
}

fn run_folder_command(
    action: FolderCommand,
    override_dir: Option<&Path>,
    settings: &mut Settings,
    log: &mut StatusLog,
) -> Result<()> {
    match action {
        FolderCommand::Show => {
            let resolved =
                target::resolve_target_folder(override_dir, settings, game_finder::find_mods_folder);
            match resolved {
                Ok(folder) => println!("{} ({})", folder.path.display(), folder.source),
                Err(e) => println!("{}", e),
            }
        }

        FolderCommand::Set { dir } => {
            target::validate_folder(&dir)?;
            let dir = dir
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", dir.display()))?;
            settings.mods_folder = Some(dir.clone());
            settings.save()?;
            println!("{}", log.push(format!("Mods folder set: {}", dir.display())));
        }

        FolderCommand::Detect => match game_finder::find_mods_folder() {
            Some(dir) => {
                settings.mods_folder = Some(dir.clone());
                settings.save()?;
                println!("{}", log.push(format!("Auto-detected Mods folder: {}", dir.display())));
            }
            None => {
                println!("Could not find the Stardew Valley Mods folder. Looked in:");
                for candidate in game_finder::candidate_paths() {
                    println!("  {}", candidate.display());
                }
                println!();
                println!("Set it manually with `sdvmod folder set <DIR>`.");
                println!("Steam -> Stardew Valley -> Manage -> Browse local files -> Mods");
            }
        },
    }

    Ok(())
}

async fn run_install(
    folder: &TargetFolder,
    archives: &[PathBuf],
    policy: ConflictPolicy,
    log: &mut StatusLog,
) -> Result<()> {
    let (zips, skipped): (Vec<&PathBuf>, Vec<&PathBuf>) =
        archives.iter().partition(|path| is_zip_path(path));
    for path in &skipped {
        println!("{}", log.push(format!("Skipped (not a .zip): {}", path.display())));
    }

    let mut failed = 0;
    for archive in &zips {
        println!("{}", log.push(format!("Installing: {}", display_name(archive))));

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.blue} {wide_msg}")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        let pb = spinner.clone();
        let progress: ProgressCallback = Arc::new(move |event: InstallProgress| {
            let message = match event {
                InstallProgress::Opening { .. } => "Opening archive...".to_string(),
                InstallProgress::Extracting { destination, .. } => {
                    format!("Extracting to {}...", destination.display())
                }
                InstallProgress::Finished { .. } => "Done".to_string(),
            };
            pb.set_message(message);
        });

        let request = InstallRequest::new(*archive, folder.path()).with_conflict_policy(policy);
        let result = install_in_background(request, Some(progress)).await;
        spinner.finish_and_clear();

        match result {
            Ok(location) => {
                println!(
                    "{}",
                    log.push(format!(
                        "Installed {} -> {} ({} files)",
                        display_name(archive),
                        location.mod_name(),
                        location.stats.files
                    ))
                );
            }
            Err(e) => {
                failed += 1;
                println!("{}", log.push(format!("Install failed: {}", e)));
            }
        }
    }

    if !zips.is_empty() {
        run_list(folder, false, log)?;
    }

    if failed > 0 {
        bail!("{} of {} archives failed to install", failed, zips.len());
    }
    Ok(())
}

fn run_list(folder: &TargetFolder, details: bool, log: &mut StatusLog) -> Result<()> {
    let mods = registry::list_mods(folder.path())?;

    println!();
    println!("=== Installed Mods ({}) ===", folder.path.display());
    for installed in &mods {
        if !details {
            println!("  {}", installed.label);
            continue;
        }

        println!("  {}", installed.label);
        println!("      Folder:  {}", installed.folder_name);
        if let ManifestStatus::Parsed(manifest) = &installed.manifest {
            if let Some(version) = manifest.version_string() {
                println!("      Version: {}", version);
            }
            if let Some(author) = &manifest.author {
                println!("      Author:  {}", author);
            }
            if let Some(unique_id) = &manifest.unique_id {
                println!("      ID:      {}", unique_id);
            }
        }
        println!("      Files:   {}", installed.file_count());
    }
    println!();
    println!("{}", log.push(registry::loaded_message(mods.len())));

    Ok(())
}

fn run_remove(
    folder: &TargetFolder,
    names: &[String],
    yes: bool,
    log: &mut StatusLog,
) -> Result<()> {
    let mut selected = Vec::new();
    for name in names {
        if !is_single_component(name) {
            bail!("Not a mod folder name: {}", name);
        }
        selected.push(folder.path().join(name));
    }

    if !yes {
        println!("Remove the following mods?");
        for path in &selected {
            println!("  - {}", display_name(path));
        }
        println!();
        println!("Note: other mods may depend on these. Restart the game afterwards.");
        print!("Continue? [y/N] ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = remove_mods(&selected);
    for outcome in &report.outcomes {
        let line = match &outcome.result {
            Ok(()) => format!("Removed: {}", display_name(&outcome.path)),
            Err(e) => e.to_string(),
        };
        println!("{}", log.push(line));
    }
    println!("{}", log.push(report.summary()));

    run_list(folder, false, log)?;

    if !report.all_removed() {
        bail!("{} of {} mods could not be removed", report.failed(), report.outcomes.len());
    }
    Ok(())
}
