use std::fmt::Write as _;

use crossterm::style::{self, Color as TermColor, Stylize};

use crate::card::{Card, CardAttribute, Color};
use crate::history::History;
use crate::session::{CardState, GameComplete, Phase, Session};

/// Trait that abstracts the presentation layer.
///
/// The session decides; the renderer only shows what it is told.
pub trait Renderer {
    /// Render the full board.
    fn render(&mut self, session: &Session);
    /// Display an informational message.
    fn info(&mut self, msg: &str);
    /// Display an error message.
    fn error(&mut self, msg: &str);
    /// Display the help text.
    fn help(&mut self);
    /// Show a pair that did not match; the cards are already face-down.
    fn mismatch(&mut self, first: &Card, second: &Card);
    /// Display the win screen.
    fn win(&mut self, result: &GameComplete, best: Option<u32>);
    /// Display the history summary.
    fn stats(&mut self, history: &History);
}

// ---------------------------------------------------------------------------
// CLI Renderer
// ---------------------------------------------------------------------------

/// Cards per row on the board.
const ROW_WIDTH: usize = 5;

/// A simple ANSI-color CLI renderer.
pub struct CliRenderer;

impl CliRenderer {
    pub fn new() -> Self {
        CliRenderer
    }

    fn term_color(color: Color) -> TermColor {
        match color {
            // Plain black is unreadable on most dark terminals.
            Color::Black => TermColor::DarkGrey,
            Color::Red => TermColor::Red,
            Color::Green => TermColor::Green,
            Color::Gray => TermColor::Grey,
            Color::Brown => TermColor::DarkYellow,
            Color::Yellow => TermColor::Yellow,
            Color::Purple => TermColor::Magenta,
            Color::Orange => TermColor::Rgb { r: 255, g: 140, b: 0 },
        }
    }

    fn face_str(attr: CardAttribute) -> String {
        style::style(attr.shape.glyph())
            .with(Self::term_color(attr.color))
            .bold()
            .to_string()
    }

    fn slot_str(session: &Session, card: &Card) -> String {
        match session.card_state(card.id) {
            Ok(CardState::FaceUp) => format!("[{}]", Self::face_str(card.attribute)),
            Ok(CardState::FaceDown) => "[??]".to_string(),
            Ok(CardState::Matched) | Err(_) => "    ".to_string(),
        }
    }

    /// The board as text, one row of ids over one row of cards.
    pub fn board_text(session: &Session) -> String {
        let mut out = String::new();
        let cards = session.deck().cards();

        for row in cards.chunks(ROW_WIDTH) {
            out.push_str("  ");
            for card in row {
                let _ = write!(out, " {:^4} ", card.id.index());
            }
            out.push('\n');

            out.push_str("  ");
            for card in row {
                let _ = write!(out, " {} ", Self::slot_str(session, card));
            }
            out.push_str("\n\n");
        }

        let _ = write!(
            out,
            "  Matched: {}/{}   Pairs left: {}   Flips: {}",
            session.matched_count(),
            session.deck().len(),
            session.remaining_pairs(),
            session.total_flips()
        );
        if let (Phase::OneRevealed, [up]) = (session.phase(), session.face_up()) {
            let _ = write!(out, "   (card {} is up, pick a second card)", up);
        }
        out
    }
}

impl Renderer for CliRenderer {
    fn render(&mut self, session: &Session) {
        println!();
        println!("{}", Self::board_text(session));
        println!();
    }

    fn info(&mut self, msg: &str) {
        println!("{} {}", "[INFO]".cyan(), msg);
    }

    fn error(&mut self, msg: &str) {
        println!("{} {}", "[ERR ]".red(), msg);
    }

    fn help(&mut self) {
        println!(
            r#"
╔══════════════════════════════════════════════════════════════╗
║                 PAIRS – CLI Help                             ║
╠══════════════════════════════════════════════════════════════╣
║  GOAL: Clear the board by finding every matching pair.       ║
║                                                              ║
║  CARDS: each face shows a shape in a color:                  ║
║    () circle   >< cross   [] square   ## fill                ║
║    Two cards match when both shape and color are equal.      ║
║                                                              ║
║  RULES:                                                      ║
║    · Turn two cards face-up, one at a time                   ║
║    · A matching pair is removed from the board               ║
║    · A mismatched pair is turned face-down again             ║
║    · Try to finish in as few flips as possible               ║
╠══════════════════════════════════════════════════════════════╣
║  COMMANDS (case-insensitive):                                ║
║                                                              ║
║  flip <n> | f <n> | <n>  Turn card n face-up                 ║
║  hide <n> | h <n>        Turn a lone face-up card back down  ║
║  new [pairs]             Start a new game                    ║
║  stats                   Show your game history              ║
║  quit                    Exit                                ║
║  help | ?                Show this help                      ║
╚══════════════════════════════════════════════════════════════╝
"#
        );
    }

    fn mismatch(&mut self, first: &Card, second: &Card) {
        println!(
            "{} card {} {} and card {} {} do not match.",
            "[MISS]".yellow(),
            first.id,
            Self::face_str(first.attribute),
            second.id,
            Self::face_str(second.attribute),
        );
    }

    fn win(&mut self, result: &GameComplete, best: Option<u32>) {
        println!(
            "\n{}\n\n  You cleared all {} pairs with {} flips.",
            "  *** BOARD CLEARED ***".yellow().bold(),
            result.pair_count,
            result.total_flips,
        );
        match best {
            Some(best) if best >= result.total_flips => {
                println!("  That's your best on this board size!")
            }
            Some(best) => println!("  Your best on this board size is {} flips.", best),
            None => {}
        }
        println!("  Type 'new' for another game.\n");
    }

    fn stats(&mut self, history: &History) {
        println!();
        println!(
            "  Games played: {}   Completed: {}",
            history.games_played(),
            history.games_completed()
        );
        for pairs in history.completed_sizes() {
            if let Some(best) = history.best_flips(pairs) {
                println!("  {:>2} pairs: best {} flips", pairs, best);
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardId, Shape};
    use crate::deck::Deck;

    fn session() -> Session {
        let a = CardAttribute::new(Shape::Circle, Color::Red);
        let b = CardAttribute::new(Shape::Cross, Color::Green);
        let c = CardAttribute::new(Shape::Fill, Color::Orange);
        Session::new(Deck::from_attributes(vec![a, b, c, a, b, c]).unwrap())
    }

    #[test]
    fn fresh_board_is_all_face_down() {
        let text = CliRenderer::board_text(&session());
        assert_eq!(text.matches("[??]").count(), 6);
        assert!(text.contains("Pairs left: 3"));
        assert!(text.contains("Flips: 0"));
    }

    #[test]
    fn face_up_and_matched_cards_are_drawn() {
        let mut s = session();
        s.reveal(CardId(0)).unwrap();
        s.reveal(CardId(3)).unwrap();
        s.reveal(CardId(1)).unwrap();

        let text = CliRenderer::board_text(&s);
        assert_eq!(text.matches("[??]").count(), 3);
        assert!(text.contains("><"));
        assert!(!text.contains("()"));
        assert!(text.contains("Matched: 2/6"));
        assert!(text.contains("Pairs left: 2"));
        assert!(text.contains("Flips: 3"));
        assert!(text.contains("(card 1 is up, pick a second card)"));
    }
}
