use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use vokab::{
    app::App,
    app_dirs::AppDirs,
    bank::WordBank,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    results::{export_csv, ResultStore, SqliteResultStore},
    runtime::{crossterm_events, Runner, Step},
    sampler::Mix,
    ui::ui,
};

/// terminal vocabulary quiz with a vocabulary size estimate and progress history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal vocabulary quiz: answer multiple-choice definitions, get an estimate of your vocabulary size, and track how it develops over time."
)]
pub struct Cli {
    /// number of questions in a quiz
    #[clap(short = 'q', long = "questions")]
    number_of_questions: Option<usize>,

    /// which difficulty levels to draw questions from
    #[clap(short = 'm', long, value_enum)]
    mix: Option<Mix>,

    /// your age, used to pick the estimate's baseline
    #[clap(short = 'a', long)]
    age: Option<u32>,

    /// profile name results are stored under
    #[clap(short = 'u', long)]
    user: Option<String>,

    /// word bank to quiz from
    #[clap(short = 'b', long)]
    bank: Option<String>,

    /// open the progress history instead of a new quiz
    #[clap(long)]
    history: bool,

    /// write the user's results to a CSV file and exit
    #[clap(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// remember the given options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay the flags that were given on top of the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(n) = self.number_of_questions {
            cfg.number_of_questions = n;
        }
        if let Some(mix) = self.mix {
            cfg.mix = mix;
        }
        if self.age.is_some() {
            cfg.age = self.age;
        }
        if let Some(user) = &self.user {
            cfg.user = user.clone();
        }
        if let Some(bank) = &self.bank {
            cfg.bank = bank.clone();
        }
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config_store = FileConfigStore::new();
    let settings = cli.apply(config_store.load());

    if settings.number_of_questions == 0 {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::InvalidValue,
            "a quiz needs at least one question",
        )
        .exit();
    }

    let bank = match WordBank::new(&settings.bank) {
        Ok(bank) => bank,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::InvalidValue,
                format!("{e} (available: {})", WordBank::available().join(", ")),
            )
            .exit();
        }
    };

    if cli.save_config {
        config_store.save(&settings)?;
    }

    if let Some(path) = &cli.export {
        if let Err(e) = logging::init_stderr() {
            eprintln!("logging disabled: {e}");
        }
        return export_history(&settings.user, path);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = logging::init_file(&log_path) {
            eprintln!("logging disabled: {e}");
        }
    }
    info!(
        user = %settings.user,
        bank = %settings.bank,
        mix = %settings.mix,
        questions = settings.number_of_questions,
        "starting"
    );

    let store: Option<Box<dyn ResultStore>> = match SqliteResultStore::new() {
        Ok(store) => Some(Box::new(store)),
        Err(e) => {
            warn!(error = %e, "result store unavailable, results will not be saved");
            None
        }
    };

    let mut app = App::new(settings, bank, store);
    if cli.history {
        app.show_history();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn export_history(user: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    let store = SqliteResultStore::new()?;
    let records = store.list_for_user(user)?;
    let rows = export_csv(&records, path)?;
    println!("exported {rows} results for {user} to {}", path.display());
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(crossterm_events());
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step(app) {
            Step::Redraw => {
                terminal.draw(|f| ui(app, f))?;
            }
            Step::Idle => {}
            Step::Quit => break,
        }
    }

    Ok(())
}
