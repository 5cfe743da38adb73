use std::fmt;

use serde::{Deserialize, Serialize};

/// The figure printed on a card face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Cross,
    Square,
    Fill,
}

impl Shape {
    /// All four shapes, in canonical order.
    pub const ALL: [Shape; 4] = [Shape::Circle, Shape::Cross, Shape::Square, Shape::Fill];

    /// Glyph used in CLI rendering.
    pub fn glyph(self) -> &'static str {
        match self {
            Shape::Circle => "()",
            Shape::Cross => "><",
            Shape::Square => "[]",
            Shape::Fill => "##",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Cross => "cross",
            Shape::Square => "square",
            Shape::Fill => "fill",
        }
    }
}

/// The fixed palette a card face is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Red,
    Green,
    Gray,
    Brown,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    /// All eight colors, in canonical order.
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Gray,
        Color::Brown,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
        }
    }
}

/// What makes two cards a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardAttribute {
    pub shape: Shape,
    pub color: Color,
}

/// Number of distinct attributes: 4 shapes × 8 colors.
pub const NUM_ATTRIBUTES: usize = Shape::ALL.len() * Color::ALL.len();

impl CardAttribute {
    pub const fn new(shape: Shape, color: Color) -> Self {
        CardAttribute { shape, color }
    }

    /// Every attribute, shape-major then color-minor.
    pub fn all() -> Vec<CardAttribute> {
        let mut attrs = Vec::with_capacity(NUM_ATTRIBUTES);
        for &shape in &Shape::ALL {
            for &color in &Color::ALL {
                attrs.push(CardAttribute::new(shape, color));
            }
        }

        debug_assert_eq!(attrs.len(), NUM_ATTRIBUTES);
        attrs
    }
}

impl fmt::Display for CardAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color.name(), self.shape.name())
    }
}

/// Opaque card identity: the card's position in its deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub usize);

impl CardId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub attribute: CardAttribute,
}

impl Card {
    /// Gameplay equality: same attribute, regardless of identity.
    pub fn matches(&self, other: &Card) -> bool {
        self.attribute == other.attribute
    }
}
