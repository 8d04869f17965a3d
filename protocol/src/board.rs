//! 局面接口
//!
//! 搜索引擎只通过这个 trait 访问具体游戏：生成合法走法、生成后继局面、
//! 判断终局。局面对搜索来说是不可变的值，每次下探都产生新的局面。

use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{GameError, Result};

/// 游戏局面
pub trait Board: Clone + Send + Sync + 'static {
    /// 走法（作为走法-分值表的键，需要可比较、可哈希）
    type Move: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// 当前局面的所有合法走法，无子可动时为空
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// 走一步后的新局面，不修改 `self`
    fn generate_successor(&self, mv: &Self::Move) -> Self;

    /// 刚走完的一方是否已经达成胜利条件
    fn is_game_over(&self) -> bool;

    /// 解析文本走法，并检查其是否合法
    fn parse_legal_move(&self, input: &str) -> Result<Self::Move>
    where
        Self::Move: FromStr,
        <Self::Move as FromStr>::Err: std::fmt::Display,
    {
        let input = input.trim();
        let mv = input
            .parse::<Self::Move>()
            .map_err(|e| GameError::ParseMove {
                input: input.to_string(),
                reason: e.to_string(),
            })?;

        if self.legal_moves().contains(&mv) {
            Ok(mv)
        } else {
            Err(GameError::IllegalMove {
                mv: input.to_string(),
            })
        }
    }
}
