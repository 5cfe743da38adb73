use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::card::CardId;
use crate::command::{parse_command, Command};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::history::{self, GameRecord, History};
use crate::renderer::Renderer;
use crate::session::{RevealOutcome, Session};

/// The interactive host.  It owns the current `Session` and translates
/// commands into engine calls and engine outcomes into renderer calls.
pub struct Game<R: Renderer> {
    config: GameConfig,
    session: Session,
    renderer: R,
    history: History,
    /// Where `history` is persisted; `None` keeps it in memory only.
    history_path: Option<PathBuf>,
    /// Index of the current game's record in `history.records`.
    record: usize,
}

impl<R: Renderer> Game<R> {
    /// Start the first game with the on-disk history.
    pub fn init(config: GameConfig, renderer: R) -> Result<Self, GameError> {
        Self::with_history(config, renderer, History::load(), History::default_path())
    }

    pub fn with_history(
        config: GameConfig,
        renderer: R,
        mut history: History,
        history_path: Option<PathBuf>,
    ) -> Result<Self, GameError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let session = Session::start_game(config.pair_count, config.selection, seed)?;

        history
            .records
            .push(GameRecord::new(seed, session.deck(), config.selection, history::now()));
        let record = history.records.len() - 1;

        Ok(Game {
            config,
            session,
            renderer,
            history,
            history_path,
            record,
        })
    }

    /// Run the interactive game loop until the player quits.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        self.persist();
        self.renderer.render(&self.session);

        loop {
            print!("> ");
            if stdout.flush().is_err() {
                break;
            }

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                // EOF
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }

            match parse_command(&line) {
                Err(e) => self.renderer.error(&e),
                Ok(cmd) => {
                    if self.handle(cmd) {
                        break;
                    }
                }
            }
        }

        self.shutdown();
    }

    /// Dispatch a command.  Returns `true` if the game should exit.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => {
                self.renderer.info("Thanks for playing. Goodbye!");
                return true;
            }
            Command::Help => {
                self.renderer.help();
            }
            Command::Stats => {
                self.renderer.stats(&self.history);
            }
            Command::NewGame { pairs } => {
                self.new_game(pairs);
            }
            Command::Reveal(id) => {
                self.reveal(id);
            }
            Command::Conceal(id) => match self.session.conceal(id) {
                Ok(()) => self.renderer.render(&self.session),
                Err(e) => self.renderer.error(&e.to_string()),
            },
        }
        false
    }

    fn reveal(&mut self, id: CardId) {
        let outcome = match self.session.reveal(id) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.renderer.error(&e.to_string());
                return;
            }
        };

        self.renderer.render(&self.session);

        match outcome {
            RevealOutcome::Pending(_) => {}
            RevealOutcome::Matched(a, b) => {
                self.renderer
                    .info(&format!("Cards {} and {} match and are removed.", a, b));
            }
            RevealOutcome::Mismatched(a, b) => {
                if let (Some(&first), Some(&second)) = (self.session.card(a), self.session.card(b)) {
                    self.renderer.mismatch(&first, &second);
                }
            }
        }

        if let Some(done) = self.session.completion() {
            self.close_record();
            self.persist();
            let best = self.history.best_flips(done.pair_count);
            self.renderer.win(&done, best);
        }
    }

    /// Replace the session with a freshly dealt one.  A rejected size leaves
    /// the current game untouched.
    fn new_game(&mut self, pairs: Option<usize>) {
        let pair_count = pairs.unwrap_or(self.config.pair_count);
        let seed: u64 = rand::random();

        let session = match Session::start_game(pair_count, self.config.selection, seed) {
            Ok(s) => s,
            Err(e) => {
                self.renderer.error(&e.to_string());
                return;
            }
        };

        self.close_record();
        self.config.pair_count = pair_count;
        self.session = session;
        self.history.records.push(GameRecord::new(
            seed,
            self.session.deck(),
            self.config.selection,
            history::now(),
        ));
        self.record = self.history.records.len() - 1;
        self.persist();

        self.renderer
            .info(&format!("A new game of {} pairs has been dealt.", pair_count));
        self.renderer.render(&self.session);
    }

    /// Close the current record unless it already is.
    fn close_record(&mut self) {
        if let Some(record) = self.history.records.get_mut(self.record) {
            if record.end_time.is_none() {
                record.finish(&self.session, history::now());
            }
        }
    }

    fn shutdown(&mut self) {
        self.close_record();
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.history_path else {
            return;
        };
        if let Err(e) = self.history.save_to(path) {
            eprintln!("[WARN] Could not save game history: {}", e);
        }
    }
}
