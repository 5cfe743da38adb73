use crate::card::CardId;

/// All commands a player can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Turn a face-down card face-up.
    Reveal(CardId),
    /// Turn a lone face-up card back down.
    Conceal(CardId),
    /// Abandon the current game and deal a new one, optionally resized.
    NewGame { pairs: Option<usize> },
    /// Show the game history summary.
    Stats,
    /// Quit the game.
    Quit,
    /// Print help.
    Help,
}

/// Parse a single line of text input into a `Command`.
///
/// Syntax reference (case-insensitive):
/// ```
/// flip <id> | f <id> | <id>   -- Reveal a card
/// hide <id> | h <id>          -- Conceal a lone face-up card
/// new [pairs] | n [pairs]     -- New game
/// stats | s                   -- Game history
/// quit | q                    -- Quit
/// help | ?                    -- Help
/// ```
pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let cmd = tokens[0].to_lowercase();

    match cmd.as_str() {
        "flip" | "f" => {
            if tokens.len() < 2 {
                return Err("Usage: flip <card>".to_string());
            }
            Ok(Command::Reveal(parse_card_id(tokens[1])?))
        }
        "hide" | "h" => {
            if tokens.len() < 2 {
                return Err("Usage: hide <card>".to_string());
            }
            Ok(Command::Conceal(parse_card_id(tokens[1])?))
        }
        "new" | "n" => {
            let pairs = match tokens.get(1) {
                Some(t) => Some(
                    t.parse()
                        .map_err(|_| format!("'{}' is not a valid pair count", t))?,
                ),
                None => None,
            };
            Ok(Command::NewGame { pairs })
        }
        "stats" | "s" => Ok(Command::Stats),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "help" | "?" => Ok(Command::Help),
        // A bare number is shorthand for `flip`.
        _ if cmd.chars().all(|c| c.is_ascii_digit()) => Ok(Command::Reveal(parse_card_id(&cmd)?)),
        _ => Err(format!("Unknown command '{}'. Type 'help' for help.", tokens[0])),
    }
}

/// Range checks are left to the session, which knows the deck size.
fn parse_card_id(s: &str) -> Result<CardId, String> {
    s.parse()
        .map(CardId)
        .map_err(|_| format!("'{}' is not a valid card number", s))
}
