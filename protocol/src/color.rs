//! 阵营定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// 先手（白方）
    First,
    /// 后手（黑方）
    Second,
}

impl Color {
    /// 所有阵营，按行棋顺序
    pub const ALL: [Color; 2] = [Color::First, Color::Second];

    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::First => Color::Second,
            Color::Second => Color::First,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::First => write!(f, "first"),
            Color::Second => write!(f, "second"),
        }
    }
}

impl FromStr for Color {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "white" | "w" => Ok(Color::First),
            "second" | "black" | "b" => Ok(Color::Second),
            _ => Err(GameError::InvalidColor {
                input: s.to_string(),
            }),
        }
    }
}
