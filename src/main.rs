use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use exhale::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    history::HistoryDb,
    journal::{self, JournalEntry},
    logging,
    mood::{Mood, MoodLog, MAX_INTENSITY, MIN_INTENSITY},
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    technique::TechniqueKind,
    ui::{breath::describe_phases, history::humanize_since, screen},
    util::pluralize,
    TICK_RATE_MS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// calm breathing tui with guided phases, session history, and mood check-ins
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A calm breathing TUI: pick a technique and a length, then follow the circle through inhale, hold and exhale. Finished sessions, mood check-ins and journal entries are kept in a local history."
)]
pub struct Cli {
    /// breathing technique to use
    #[clap(short = 't', long, value_enum)]
    technique: Option<TechniqueKind>,

    /// session length in minutes
    #[clap(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..))]
    minutes: Option<u32>,

    /// skip the setup screen and start breathing right away
    #[clap(long)]
    start: bool,

    /// remember the chosen technique and length as the new defaults
    #[clap(long)]
    save_config: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// log how you feel right now
    Mood {
        #[clap(value_enum)]
        mood: Mood,

        /// how strongly, from 1 (barely) to 5 (very)
        #[clap(
            short = 'i',
            long,
            default_value_t = 3,
            value_parser = clap::value_parser!(u8).range(MIN_INTENSITY as i64..=MAX_INTENSITY as i64)
        )]
        intensity: u8,

        /// optional note to keep with the check-in
        #[clap(short = 'n', long)]
        note: Option<String>,
    },
    /// write a short reflection, or print prompts to reflect on
    Journal {
        /// what you want to write; leave out to see the prompts
        text: Vec<String>,

        /// answer prompt number N instead of a random one
        #[clap(short = 'p', long)]
        prompt: Option<usize>,
    },
    /// print recent sessions, mood check-ins and journal entries
    History {
        /// number of rows to show for each list
        #[clap(short = 'l', long, default_value_t = 10)]
        limit: usize,
    },
}

impl Cli {
    /// CLI flags take precedence over the config file
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(technique) = self.technique {
            config.technique = technique;
        }
        if let Some(minutes) = self.minutes {
            config.session_minutes = minutes;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command.clone() {
        Some(Command::Mood {
            mood,
            intensity,
            note,
        }) => {
            logging::init_stderr_logging();
            log_mood(mood, intensity, note)
        }
        Some(Command::Journal { text, prompt }) => {
            logging::init_stderr_logging();
            write_journal(&text, prompt)
        }
        Some(Command::History { limit }) => {
            logging::init_stderr_logging();
            print_history(limit)
        }
        None => run_tui(&cli),
    }
}

fn log_mood(mood: Mood, intensity: u8, note: Option<String>) -> Result<(), Box<dyn Error>> {
    let entry = MoodLog::new(mood, intensity, note)?;
    let db = HistoryDb::open_default()?;
    db.record_mood(&entry)?;
    println!(
        "Logged {} {} (intensity {}/{})",
        mood.emoji(),
        mood,
        intensity,
        MAX_INTENSITY
    );
    Ok(())
}

fn write_journal(text: &[String], prompt: Option<usize>) -> Result<(), Box<dyn Error>> {
    let prompt = match prompt {
        Some(number) => journal::prompt_by_number(number)?,
        None => journal::random_prompt(),
    };

    if text.is_empty() {
        println!("{prompt}");
        println!();
        for (i, p) in journal::PROMPTS.iter().enumerate() {
            println!("  ({}) {}", i + 1, p);
        }
        return Ok(());
    }

    let entry = JournalEntry::new(prompt, &text.join(" "))?;
    let db = HistoryDb::open_default()?;
    db.record_journal(&entry)?;
    println!("Saved your reflection on \"{}\"", entry.prompt);
    Ok(())
}

fn print_history(limit: usize) -> Result<(), Box<dyn Error>> {
    let db = HistoryDb::open_default()?;
    let now = chrono::Local::now();

    let summary = db.session_summary()?;
    println!(
        "Breathing: {}, {}",
        pluralize(summary.total_sessions, "session", "sessions"),
        pluralize(summary.total_minutes, "minute", "minutes")
    );
    for (kind, count) in &summary.by_technique {
        println!("  {:<24} {}", kind.display_name(), count);
    }
    for record in db.recent_sessions(limit)? {
        println!(
            "  {:<24} {:>3} min   {}",
            record.technique.display_name(),
            record.minutes,
            humanize_since(record.completed_at, now)
        );
    }

    let mood_summary = db.mood_summary()?;
    println!();
    println!(
        "Moods: {}",
        pluralize(mood_summary.total_logs as u64, "check-in", "check-ins")
    );
    if let Some(avg) = mood_summary.average_intensity {
        println!("  average intensity {avg:.1}");
    }
    for (mood, count) in &mood_summary.counts {
        println!("  {} {:<10} {}", mood.emoji(), mood.to_string(), count);
    }
    for entry in db.recent_moods(limit)? {
        println!(
            "  {} {:<10} {}/{}  {:<16} {}",
            entry.mood.emoji(),
            entry.mood.to_string(),
            entry.intensity,
            MAX_INTENSITY,
            humanize_since(entry.logged_at, now),
            entry.note.as_deref().unwrap_or("")
        );
    }

    println!();
    println!(
        "Journal: {}",
        pluralize(db.journal_count()?, "entry", "entries")
    );
    for entry in db.recent_journal(limit)? {
        println!(
            "  {:<16} {}",
            humanize_since(entry.written_at, now),
            entry.prompt
        );
        println!("  {:<16} {}", "", entry.excerpt(60));
    }
    Ok(())
}

fn run_tui(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if !io::stdout().is_tty() {
        return Err("exhale needs an interactive terminal; try `exhale history` instead".into());
    }

    // The guard flushes buffered log lines on drop
    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init_file_logging(&dir));

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    let history = match HistoryDb::open_default() {
        Ok(db) => Some(db),
        Err(e) => {
            warn!(error = %e, "history disabled");
            None
        }
    };

    let mut app = App::new(&config, history, Instant::now());
    if cli.start {
        app.start_session(Instant::now());
    }
    info!(
        technique = %app.technique,
        phases = %describe_phases(app.session.technique()),
        minutes = app.selected_minutes(),
        "starting tui"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| screen::draw(app, f))?;

    loop {
        let mut redraw = match runner.step() {
            AppEvent::Tick => false,
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Flow::Quit {
                    break;
                }
                true
            }
        };

        // a steady stream of keys would starve Tick events
        redraw |= app.on_tick(Instant::now());

        if redraw {
            terminal.draw(|f| screen::draw(app, f))?;
        }
    }

    Ok(())
}
