mod advice;
mod analytics;
mod app;
mod clock;
mod domain;
mod engine;
mod input;
mod notifications;
mod persistence;
mod ticker;
mod ui;

use advice::{AdviceSource, HttpAdviceSource};
use anyhow::Result;
use app::App;
use clap::{Parser, Subcommand};
use clock::SystemClock;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::format_hhmm;
use persistence::{
    export_file_name, export_state, import_state, init_local_dir, load_state, log_file, save_state,
    state_file,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "focusflow")]
#[command(about = "A terminal momentum dashboard with countdown focus timers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .focusflow directory in the current directory
    Init,
    /// Print focused-time analytics for a date
    Report {
        /// Date to report on (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Export the whole state document to a backup file
    Export {
        /// Output file path. Defaults to ./FocusFlow_Backup_YYYY-MM-DD.json
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Replace the whole state with a previously exported backup
    Import {
        /// Backup file containing the tasks and logs document
        file: String,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("focusflow=info"))
}

/// The TUI owns the terminal, so its tracing output goes to a log file in
/// the data directory
fn init_tracing_to_file() -> Result<()> {
    let path = log_file()?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_tracing_to_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_dir()?;
            println!("Initialized FocusFlow directory: {}", data_dir.display());
            println!();
            println!("FocusFlow will now use this local directory for state storage.");
            println!("Run 'focusflow' to start tracking.");
            Ok(())
        }
        Some(Commands::Report { date }) => {
            init_tracing_to_stderr();
            let report_date = if let Some(date_str) = date {
                chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?
            } else {
                chrono::Local::now().date_naive()
            };
            print_report(report_date)
        }
        Some(Commands::Export { output }) => {
            init_tracing_to_stderr();
            let state = load_state(state_file()?);
            let path = match output {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir()?
                    .join(export_file_name(chrono::Local::now().date_naive())),
            };
            export_state(&path, &state)?;
            println!("Exported {} tasks and {} logs to {}", state.tasks.len(), state.ledger.len(), path.display());
            Ok(())
        }
        Some(Commands::Import { file }) => {
            init_tracing_to_stderr();
            match import_state(&file) {
                Ok(incoming) => {
                    let path = state_file()?;
                    let mut state = load_state(&path);
                    state.replace(incoming);
                    save_state(&path, &state)?;
                    println!(
                        "Imported {} tasks and {} logs from {}",
                        state.tasks.len(),
                        state.ledger.len(),
                        file
                    );
                    Ok(())
                }
                // Current state is untouched; surface the rejection
                Err(err) => anyhow::bail!("Import rejected: {err}"),
            }
        }
        None => run_tui(),
    }
}

/// Print window totals, the 7-day trend, and the per-task breakdown
fn print_report(date: chrono::NaiveDate) -> Result<()> {
    let state = load_state(state_file()?);
    let today = chrono::Local::now().date_naive();

    let totals = analytics::window_totals(&state.ledger, today);
    println!("FocusFlow report — {}", date);
    println!();
    println!(
        "Focused time:  today {} · week {} · month {}",
        format_hhmm(totals.today_ms),
        format_hhmm(totals.week_ms),
        format_hhmm(totals.month_ms)
    );

    println!();
    println!("7-day trend:");
    for point in analytics::seven_day_trend(&state.ledger, today) {
        let bar = "█".repeat((point.hours * 4.0).round() as usize);
        println!("  {}  {:>6.2}h {}", point.date, point.hours, bar);
    }

    println!();
    println!("Daily breakdown for {}:", date);
    let rows = analytics::daily_breakdown(&state.tasks, &state.ledger, date, today);
    if rows.is_empty() {
        println!("  (no tasks)");
    }
    for row in rows {
        let status = if row.on_track { "on track" } else { "behind" };
        println!(
            "  {:<30} actual {:>6.2}h · needed {:>6.2}h · {}",
            row.name, row.actual_hours, row.needed_today.max(row.daily_goal), status
        );
    }
    Ok(())
}

fn run_tui() -> Result<()> {
    init_tracing_to_file()?;

    let state_path = state_file()?;
    let state = load_state(&state_path);

    let advice_source: Option<Arc<dyn AdviceSource>> = HttpAdviceSource::from_env()
        .map(|source| Arc::new(source) as Arc<dyn AdviceSource>);

    let mut app = App::new(state, state_path, Box::new(SystemClock), advice_source);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit
    if let Err(e) = app.save() {
        eprintln!("Error saving state: {}", e);
    }

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    app.status_line = None;
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }

        // Reconcile countdowns and drive the advice lifecycle
        app.tick();

        // Persist after every mutation
        if app.needs_save {
            app.save()?;
        }
    }
}
