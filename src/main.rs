mod card;
mod command;
mod config;
mod deck;
mod error;
mod game;
mod history;
mod renderer;
mod session;

use clap::Parser;

use config::{Cli, GameConfig};
use game::Game;
use renderer::CliRenderer;

fn main() {
    let config = GameConfig::from(Cli::parse());

    println!(
        r#"
┌─────────────────────────────────────────┐
│        PAIRS – memory card game         │
│   Type 'help' or '?' for commands.      │
└─────────────────────────────────────────┘
"#
    );

    let renderer = CliRenderer::new();
    let mut game = match Game::init(config, renderer) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Cannot start: {}", e);
            std::process::exit(2);
        }
    };
    game.run();
}
