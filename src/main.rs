use std::io::{stderr, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use big_game_log::game::Game;
use big_game_log::scorebook::Scorebook;
use big_game_log::{process_file, render, Accumulator, BigGameKind, BigGameLog, ProgressSink};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "big-game-log")]
#[command(about = "List single-game feats found in a scorebook", long_about = None)]
struct Args {
    /// JSON scorebook to scan
    scorebook: PathBuf,

    /// Logs to produce (all of them when omitted)
    #[arg(long = "report", value_enum)]
    reports: Vec<ReportKind>,

    /// Only scan games this team played in
    #[arg(long)]
    team: Option<String>,

    /// Print scan progress to stderr
    #[arg(long)]
    progress: bool,

    /// Also copy the finished text to the clipboard
    #[arg(long)]
    copy: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum ReportKind {
    HomeRuns,
    Hits,
    Strikeouts,
}

impl From<ReportKind> for BigGameKind {
    fn from(value: ReportKind) -> Self {
        match value {
            ReportKind::HomeRuns => Self::HomeRuns,
            ReportKind::Hits => Self::Hits,
            ReportKind::Strikeouts => Self::Strikeouts,
        }
    }
}

struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn update(&mut self, percent: u32) -> bool {
        eprint!("\rScanning{: >5}%", percent);
        let _ = stderr().flush();
        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(stderr)
        .init();

    if let Err(e) = main0(Args::parse()) {
        eprintln!("Error while scanning scorebook: {e:#}");
        std::process::exit(1);
    }
}

fn main0(args: Args) -> Result<()> {
    let book = Scorebook::open(&args.scorebook)?;
    info!(path = %args.scorebook.display(), games = book.games().len(), "Loaded scorebook");

    let kinds = if args.reports.is_empty() {
        BigGameKind::ALL.to_vec()
    } else {
        args.reports.iter().copied().map(BigGameKind::from).collect()
    };
    let mut logs = kinds.into_iter().map(BigGameLog::new).collect::<Vec<_>>();

    let completed = {
        let mut accumulators = logs.iter_mut().map(|log| log as &mut dyn Accumulator).collect::<Vec<_>>();
        let mut console = ConsoleProgress;
        let progress = if args.progress { Some(&mut console as &mut dyn ProgressSink) } else { None };
        let team = args.team.as_deref();
        let completed = process_file(book.games(), &mut accumulators, |game| team.map_or(true, |team| game.involves(team)), progress)?;
        if args.progress {
            eprintln!();
        }
        completed
    };
    if !completed {
        return Err(anyhow!("Scan stopped before the last game"));
    }

    let mut out = String::new();
    if let Some(date) = book.latest_date() {
        out.push_str(&format!("THROUGH GAMES OF {}\n", date.format("%B %-d, %Y").to_string().to_uppercase()));
    }
    for log in &logs {
        out.push_str(&render(log, &book));
    }

    println!("{out}");
    let _ = std::io::stdout().flush();

    if args.copy {
        cli_clipboard::set_contents(out).map_err(|_| anyhow!("Failed to set clipboard"))?;
    }

    Ok(())
}
