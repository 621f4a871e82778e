//! Logic pertaining to stone colours.
//!
//! Renju is played between Black and White, and the two are emphatically not
//! interchangeable: Black opens, and only Black is subject to the forbidden
//! move rules (double-three, double-four, overline). An empty intersection is
//! simply the absence of a stone, so board cells are `Option<Stone>`.

use anyhow::anyhow;
use std::fmt::Display;
use std::ops::Not;
use std::str::FromStr;
use Stone::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub const COUNT: usize = 2;

    /// Check whether the stone is black
    pub fn is_black(self) -> bool {
        self == Black
    }

    /// Check whether the stone is white
    pub fn is_white(self) -> bool {
        self == White
    }

    /// Index into per-colour tables (black first).
    pub const fn idx(self) -> usize {
        self as usize
    }
}

impl Not for Stone {
    type Output = Self;

    /// The opposing colour
    fn not(self) -> Self {
        match self {
            Black => White,
            White => Black,
        }
    }
}

impl Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Black => write!(f, "x"),
            White => write!(f, "o"),
        }
    }
}

impl FromStr for Stone {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "x" | "X" | "black" | "b" => Ok(Black),
            "o" | "O" | "white" | "w" => Ok(White),
            _ => Err(anyhow!("Not a valid stone colour: {s:?}")),
        }
    }
}
