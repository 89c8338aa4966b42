mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keybored::{
    app_dirs::AppDirs,
    config::{Settings, Toggle},
    input::{self, Signal},
    keyboard::KeyboardState,
    language::{WordSourceError, RANDOM_WORD_API},
    logging,
    runtime::{
        spawn_word_fetch, CrosstermEventSource, FixedTicker, KeyboredEvent, KeyboredEventSource,
        Runner, SessionDriver, Ticker,
    },
    scores::ScoreHistory,
    session::{Mode, Session, SessionConfig},
    store::{FileStorage, Storage},
    word_generator::{WordGenConfig, WordGenerator},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::Sender,
    thread::JoinHandle,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

const TICK_RATE_MS: u64 = 100;

/// typing game for the terminal with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing game for the terminal. Type the words, watch your words per minute and accuracy, and keep a history of every finished session."
)]
pub struct Cli {
    /// session mode; defaults to the saved setting
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// seconds (time mode) or words (words mode) per session
    #[clap(short = 'g', long, value_parser = clap::value_parser!(u32).range(1..))]
    goal: Option<u32>,

    /// custom prompt to use
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// use the bundled word list instead of the word service
    #[clap(long)]
    offline: bool,

    /// word service endpoint
    #[clap(long, default_value = RANDOM_WORD_API, hide = true)]
    words_url: String,
}

impl Cli {
    /// Convert CLI arguments to word generation configuration
    fn to_word_gen_config(&self, session: SessionConfig) -> WordGenConfig {
        WordGenConfig {
            count: WordGenConfig::word_count_for(session),
            custom_prompt: self.prompt.clone(),
            offline: self.offline,
            url: self.words_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Loading,
    Typing,
    Results,
    Scores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub cli: Cli,
    /// Persisted preferences, without command line overrides
    pub settings: Settings,
    pub scores: ScoreHistory,
    pub driver: Option<SessionDriver>,
    pub keyboard: KeyboardState,
    pub state: AppState,
    pub notice: Option<String>,
    pub scores_scroll: usize,
    /// Time of the event being handled; drives key highlight decay
    pub now: Instant,
    mode_override: Option<Mode>,
    goal_override: Option<u32>,
    storage: Box<dyn Storage>,
    pending_request: Option<u64>,
    next_request: u64,
}

impl App {
    pub fn new(cli: Cli, storage: Box<dyn Storage>) -> Self {
        let settings = Settings::load(storage.as_ref());
        let scores = ScoreHistory::load(storage.as_ref());

        Self {
            mode_override: cli.mode,
            goal_override: cli.goal,
            cli,
            settings,
            scores,
            driver: None,
            keyboard: KeyboardState::default(),
            state: AppState::Loading,
            notice: None,
            scores_scroll: 0,
            now: Instant::now(),
            storage,
            pending_request: None,
            next_request: 0,
        }
    }

    /// Persisted settings with this run's command line overrides applied
    pub fn effective_settings(&self) -> Settings {
        self.settings
            .clone()
            .with_overrides(self.mode_override, self.goal_override)
    }

    pub fn session_config(&self) -> SessionConfig {
        self.effective_settings().session_config()
    }

    /// Drop the current session and fetch words for a new one off the event
    /// loop. Only the most recent request is honoured.
    pub fn request_words(&mut self, tx: Sender<KeyboredEvent>) -> JoinHandle<()> {
        self.next_request += 1;
        let request = self.next_request;
        self.pending_request = Some(request);
        self.driver = None;
        self.notice = None;
        self.state = AppState::Loading;

        let config = self.cli.to_word_gen_config(self.session_config());
        info!(request, count = config.count, offline = config.offline, "requesting words");
        spawn_word_fetch(WordGenerator::new(config), request, tx)
    }

    pub fn on_words(&mut self, request: u64, result: Result<Vec<String>, WordSourceError>) {
        if self.pending_request != Some(request) {
            debug!(request, "dropping stale word fetch");
            return;
        }
        self.pending_request = None;

        let words = match result {
            Ok(words) => words,
            Err(e) => {
                warn!(error = %e, "no words for a new session");
                self.notice = Some(format!("could not load words: {e}"));
                return;
            }
        };

        match Session::start(words, self.session_config()) {
            Ok(session) => {
                self.driver = Some(SessionDriver::new(session));
                self.state = AppState::Typing;
            }
            Err(e) => {
                warn!(error = %e, "could not start a session");
                self.notice = Some(e.to_string());
            }
        }
    }

    pub fn handle(&mut self, event: KeyboredEvent, now: Instant, tx: &Sender<KeyboredEvent>) -> Flow {
        self.now = now;

        match event {
            KeyboredEvent::Tick => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.on_tick(now);
                }
                self.collect_record();
            }
            KeyboredEvent::Resize => {}
            KeyboredEvent::Key(key) => return self.on_key(key, now, tx),
            KeyboredEvent::Words { request, result } => self.on_words(request, result),
        }

        Flow::Continue
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant, tx: &Sender<KeyboredEvent>) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }
        // ctrl+c to quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.state {
            AppState::Loading => match key.code {
                KeyCode::Esc => return Flow::Quit,
                KeyCode::Tab | KeyCode::Char('n') if self.pending_request.is_none() => {
                    self.request_words(tx.clone());
                }
                _ => {}
            },
            AppState::Typing => return self.on_typing_key(key, now, tx),
            AppState::Results => match key.code {
                KeyCode::Esc => return Flow::Quit,
                KeyCode::Char('s') => {
                    self.state = AppState::Scores;
                    self.scores_scroll = 0;
                }
                code => self.on_results_key(code, tx),
            },
            AppState::Scores => match key.code {
                KeyCode::Esc => return Flow::Quit,
                KeyCode::Char('b') | KeyCode::Backspace => self.state = AppState::Results,
                KeyCode::Up => self.scores_scroll = self.scores_scroll.saturating_sub(1),
                // clamped when rendered
                KeyCode::Down => self.scores_scroll += 1,
                KeyCode::Enter | KeyCode::Char('r') => self.retry(tx),
                KeyCode::Tab | KeyCode::Char('n') => {
                    self.request_words(tx.clone());
                }
                _ => {}
            },
        }

        Flow::Continue
    }

    fn on_typing_key(&mut self, key: KeyEvent, now: Instant, tx: &Sender<KeyboredEvent>) -> Flow {
        self.keyboard.press(&key, now);

        let Some(command) = input::command_for(&key) else {
            return Flow::Continue;
        };
        let Some(driver) = self.driver.as_mut() else {
            return Flow::Continue;
        };

        match driver.apply(command, now) {
            Signal::Quit => return Flow::Quit,
            Signal::NewText => {
                self.request_words(tx.clone());
            }
            Signal::Restart | Signal::Continue => self.collect_record(),
        }

        Flow::Continue
    }

    fn on_results_key(&mut self, code: KeyCode, tx: &Sender<KeyboredEvent>) {
        match code {
            KeyCode::Enter | KeyCode::Char('r') => self.retry(tx),
            KeyCode::Tab | KeyCode::Char('n') => {
                self.request_words(tx.clone());
            }
            KeyCode::Char('k') => self.update_settings(|s| s.toggle(Toggle::KeyboardVisible)),
            KeyCode::Char('h') => self.update_settings(|s| s.toggle(Toggle::HighlightKeys)),
            KeyCode::Char('o') => self.update_settings(|s| s.toggle(Toggle::KeyboardContainer)),
            KeyCode::Char('f') => self.update_settings(|s| s.toggle(Toggle::TextContainer)),
            KeyCode::Char('c') => self.update_settings(|s| s.toggle(Toggle::CompactMode)),
            KeyCode::Char('w') => self.update_settings(|s| s.toggle(Toggle::ShowWpm)),
            KeyCode::Char('a') => self.update_settings(|s| s.toggle(Toggle::ShowAccuracy)),
            KeyCode::Char('t') => self.update_settings(Settings::cycle_theme),
            KeyCode::Char('m') => self.update_game(Settings::switch_mode),
            KeyCode::Char('g') => self.update_game(Settings::cycle_goal),
            KeyCode::Char('d') => self.update_game(Settings::reset_to_defaults),
            _ => {}
        }
    }

    /// Same words again when the session shape is unchanged, fresh words
    /// otherwise
    fn retry(&mut self, tx: &Sender<KeyboredEvent>) {
        let config = self.session_config();
        match self.driver.as_mut() {
            Some(driver) if driver.session().config() == config => {
                driver.restart();
                self.state = AppState::Typing;
            }
            _ => {
                self.request_words(tx.clone());
            }
        }
    }

    fn collect_record(&mut self) {
        if let Some(record) = self.driver.as_mut().and_then(SessionDriver::take_record) {
            self.scores.append(self.storage.as_ref(), record);
            self.state = AppState::Results;
        }
    }

    fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        self.settings.persist(self.storage.as_ref());
    }

    /// Game changes made in the app replace any command line override
    fn update_game(&mut self, change: impl FnOnce(&mut Settings)) {
        self.settings = self.effective_settings();
        self.mode_override = None;
        self.goal_override = None;
        self.update_settings(change);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let Some(data_dir) = AppDirs::data_dir() else {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "cannot determine a data directory")
            .exit();
    };
    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&log_path) {
            eprintln!("keybored: logging disabled: {e}");
        }
    }
    info!(data_dir = %data_dir.display(), "starting");

    let mut app = App::new(cli, Box::new(FileStorage::new(&data_dir)));

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
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        warn!(error = %e, "terminal loop failed");
    }
    info!("bye");
    result
}

fn start_tui<B: Backend, E: KeyboredEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let tx = runner.sender();
    app.request_words(tx.clone());

    loop {
        terminal.draw(|f| ui(app, f))?;

        if app.handle(runner.step(), Instant::now(), &tx) == Flow::Quit {
            break;
        }
    }

    // dropping the driver stops the session clock
    app.driver = None;
    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    ui::screen::current_screen(&app.state).render(app, f);
}
