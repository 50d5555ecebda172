mod config;
mod curation;
mod error;
mod github;
mod normalize;
mod pipeline;
mod priority;
mod render;
mod resume;
mod store;
mod tile;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{AppConfig, SiteConfig};
use crate::pipeline::RunOutcome;
use crate::tile::{Tile, TileKind};

#[derive(Parser)]
#[command(
    name = "site_tiles",
    about = "Generate portfolio tiles from GitHub repositories and a resume page"
)]
struct Cli {
    /// Site root holding data/, writing/ and assets/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch repositories and publish data/github-projects.yml
    Projects {
        /// Rank without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch the resume and publish resume tiles, details and detail pages
    Resume {
        /// Rank without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Run projects, then resume
    All {
        /// Rank without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the currently published tiles
    List {
        /// Only tiles of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Project,
    Experience,
    Education,
}

impl From<KindArg> for TileKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Project => TileKind::Project,
            KindArg::Experience => TileKind::Experience,
            KindArg::Education => TileKind::Education,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let app = AppConfig::from_env(cli.root);

    let result = match cli.command {
        Commands::Projects { dry_run } => projects(&app, dry_run).await,
        Commands::Resume { dry_run } => resume(&app, dry_run).await,
        Commands::All { dry_run } => {
            let projects = projects(&app, dry_run).await;
            let resume = resume(&app, dry_run).await;
            projects.and(resume)
        }
        Commands::List { kind, limit } => list(&app, kind.map(TileKind::from), limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn projects(app: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let site = SiteConfig::load_or_default(&app.root);
    let outcome = pipeline::run_projects(app, &site, chrono::Utc::now(), dry_run).await?;
    report("projects", &outcome);
    Ok(())
}

async fn resume(app: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let site = SiteConfig::load_or_default(&app.root);
    let outcome = pipeline::run_resume(app, &site, chrono::Utc::now(), dry_run).await?;
    report("resume", &outcome);
    Ok(())
}

fn report(run: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Skipped { stage, reason } => {
            println!("[{}] No changes: {} (stopped at {})", run, reason, stage);
        }
        RunOutcome::DryRun(tiles) => {
            println!("[{}] Dry run, {} tiles would be published:", run, tiles.len());
            print_ranking(tiles);
        }
        RunOutcome::Published {
            tiles,
            pages_written,
            warnings,
        } => {
            let count = |kind: TileKind| tiles.iter().filter(|t| t.kind == kind).count();
            if run == "resume" {
                println!(
                    "[{}] Published {} tiles ({} experience, {} education), {} detail pages.",
                    run,
                    tiles.len(),
                    count(TileKind::Experience),
                    count(TileKind::Education),
                    pages_written
                );
            } else {
                println!("[{}] Published {} project tiles.", run, tiles.len());
            }
            for w in warnings {
                println!("  warning: {}", w);
            }
        }
    }
}

fn print_ranking(tiles: &[Tile]) {
    println!("{:>3} | {:>8} | {:<10} | {:<40}", "#", "Priority", "Type", "Title");
    println!("{}", "-".repeat(70));
    for (i, t) in tiles.iter().enumerate() {
        println!(
            "{:>3} | {:>8} | {:<10} | {:<40}",
            i + 1,
            t.priority,
            t.kind,
            truncate(&t.title, 40)
        );
    }
}

fn list(app: &AppConfig, kind: Option<TileKind>, limit: usize) -> anyhow::Result<()> {
    let tiles = pipeline::read_published(&app.root, kind)?;
    if tiles.is_empty() {
        println!("No tiles published. Run 'projects' or 'resume' first.");
        return Ok(());
    }

    println!(
        "{:>3} | {:<40} | {:<10} | {:>8} | {:<3} | {:<40}",
        "#", "Id", "Type", "Priority", "Ft", "Description"
    );
    println!("{}", "-".repeat(118));
    for (i, t) in tiles.iter().take(limit).enumerate() {
        println!(
            "{:>3} | {:<40} | {:<10} | {:>8} | {:<3} | {:<40}",
            i + 1,
            truncate(&t.id, 40),
            t.kind,
            t.priority,
            if t.featured { "*" } else { "" },
            truncate(&t.description, 40)
        );
    }

    println!("\n{} of {} tiles", tiles.len().min(limit), tiles.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
