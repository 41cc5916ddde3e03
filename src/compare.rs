//! Letter-only line comparison
//!
//! Two lines are compared by their ASCII letters alone: every byte outside
//! `A-Z`/`a-z` is skipped and letters are compared case-insensitively. The
//! scan runs either from the start of both lines or from their ends.

use crate::error::{OneginError, OneginResult};
use std::cmp::Ordering;
use std::str::FromStr;

/// Which end of the lines the scan starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// First letter to last
    #[default]
    Forward,
    /// Last letter to first (rhyme order)
    Backward,
}

impl FromStr for Direction {
    type Err = OneginError;

    fn from_str(s: &str) -> OneginResult<Self> {
        match s.to_lowercase().as_str() {
            "forward" | "direct" | "d" => Ok(Direction::Forward),
            "backward" | "reversed" | "reverse" | "r" => Ok(Direction::Backward),
            _ => Err(OneginError::invalid_argument(&format!(
                "unknown comparison direction: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        };
        write!(f, "{name}")
    }
}

#[inline]
fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Read position inside one line.
///
/// Forward cursors hold the index of the next byte and are exhausted at
/// `len`. Backward cursors hold the count of unread bytes, so the current
/// byte is `bytes[pos - 1]` and they are exhausted at zero. An empty line is
/// exhausted from the start in both directions.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    direction: Direction,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], direction: Direction) -> Self {
        let pos = match direction {
            Direction::Forward => 0,
            Direction::Backward => bytes.len(),
        };
        Self {
            bytes,
            pos,
            direction,
        }
    }

    #[inline]
    fn current(&self) -> Option<u8> {
        match self.direction {
            Direction::Forward => self.bytes.get(self.pos).copied(),
            Direction::Backward => self.pos.checked_sub(1).map(|i| self.bytes[i]),
        }
    }

    #[inline]
    fn advance(&mut self) {
        match self.direction {
            Direction::Forward => self.pos += 1,
            Direction::Backward => self.pos -= 1,
        }
    }

    fn skip_non_letters(&mut self) {
        while let Some(byte) = self.current() {
            if is_letter(byte) {
                break;
            }
            self.advance();
        }
    }
}

/// Compare two lines by their letters, scanning in `direction`.
///
/// Lines whose letter sequences match case-insensitively are `Equal`. When
/// one letter sequence is a prefix of the other, the shorter one sorts first.
/// Never fails and never allocates.
pub fn compare_alphabetic(a: &[u8], b: &[u8], direction: Direction) -> Ordering {
    let mut left = Cursor::new(a, direction);
    let mut right = Cursor::new(b, direction);

    while let (Some(x), Some(y)) = (left.current(), right.current()) {
        if x.to_ascii_lowercase() == y.to_ascii_lowercase() {
            left.advance();
            right.advance();
        } else if is_letter(x) && is_letter(y) {
            break;
        } else {
            if !is_letter(x) {
                left.advance();
            }
            if !is_letter(y) {
                right.advance();
            }
        }
    }

    left.skip_non_letters();
    right.skip_non_letters();

    match (left.current(), right.current()) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(x), Some(y)) => x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()),
    }
}

/// Lower-cased letters of `bytes` in scan order.
///
/// Two lines compare `Equal` exactly when their keys are equal.
#[cfg(test)]
pub(crate) fn alphabetic_key(bytes: &[u8], direction: Direction) -> Vec<u8> {
    let letters = bytes
        .iter()
        .filter(|&&b| is_letter(b))
        .map(|b| b.to_ascii_lowercase());
    match direction {
        Direction::Forward => letters.collect(),
        Direction::Backward => letters.rev().collect(),
    }
}
