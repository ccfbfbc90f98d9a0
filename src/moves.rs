//! Move and player value types with GTP text encoding.
//!
//! A [`Move`] is an immutable value: a player plus either board coordinates
//! or a pass. The GTP codec is a pure bijection — encoding a move and parsing
//! it back yields an equal move for every coordinate on boards up to 25x25.

use std::fmt;

use thiserror::Error;

/// GTP column letters. The letter 'I' is skipped by Go convention to avoid
/// confusion with 'J', which caps the encodable board size at 25x25.
pub const GTP_COLUMNS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Score sign convention: positive favors Black, negative favors White.
    /// This sign is fixed for the whole crate.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Player::Black => 1.0,
            Player::White => -1.0,
        }
    }

    /// One-letter initial used in comments and SGF-style formatting.
    #[inline]
    pub fn initial(self) -> char {
        match self {
            Player::Black => 'B',
            Player::White => 'W',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial())
    }
}

/// Sign of an optional player: +1 for Black, -1 for White, 0 when absent.
#[inline]
pub fn player_sign(player: Option<Player>) -> f64 {
    player.map(Player::sign).unwrap_or(0.0)
}

/// Errors from parsing GTP move text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("empty move text")]
    Empty,

    #[error("invalid column letter in {0:?}")]
    InvalidColumn(String),

    #[error("invalid row number in {0:?}")]
    InvalidRow(String),
}

/// A play by a player: board coordinates or a pass.
///
/// `coords` are zero-based `(x, y)` with `(0, 0)` at the lower-left ("A1");
/// `None` means pass. A move may carry no player for synthetic positions
/// (e.g. an empty root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub player: Option<Player>,
    pub coords: Option<(u8, u8)>,
}

impl Move {
    /// A stone placed at `coords` by `player`.
    pub fn place(player: Player, coords: (u8, u8)) -> Self {
        Self {
            player: Some(player),
            coords: Some(coords),
        }
    }

    /// A pass by `player`.
    pub fn pass(player: Player) -> Self {
        Self {
            player: Some(player),
            coords: None,
        }
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.coords.is_none()
    }

    /// GTP text for this move, e.g. `"D4"` or `"pass"`.
    pub fn gtp(&self) -> String {
        match self.coords {
            None => "pass".to_string(),
            Some((x, y)) => {
                let col = GTP_COLUMNS[x as usize] as char;
                format!("{}{}", col, y as u32 + 1)
            }
        }
    }

    /// Parse GTP text (`"D4"`, `"pass"`, case-insensitive) into a move by
    /// `player`.
    pub fn from_gtp(text: &str, player: Player) -> Result<Self, ParseMoveError> {
        if text.is_empty() {
            return Err(ParseMoveError::Empty);
        }
        if text.eq_ignore_ascii_case("pass") {
            return Ok(Move::pass(player));
        }

        let bytes = text.as_bytes();
        let col_char = bytes[0].to_ascii_uppercase();
        let x = GTP_COLUMNS
            .iter()
            .position(|&c| c == col_char)
            .ok_or_else(|| ParseMoveError::InvalidColumn(text.to_string()))? as u8;

        let row: &str = &text[1..];
        let row: u32 = row
            .parse()
            .map_err(|_| ParseMoveError::InvalidRow(text.to_string()))?;
        if row == 0 || row > GTP_COLUMNS.len() as u32 {
            return Err(ParseMoveError::InvalidRow(text.to_string()));
        }

        Ok(Move::place(player, (x, (row - 1) as u8)))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gtp())
    }
}
