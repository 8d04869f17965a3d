//! 错误类型定义

use thiserror::Error;

/// 局面边界上的错误（解析、合法性检查）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 无效的阵营
    #[error("Invalid color: {input}")]
    InvalidColor { input: String },

    /// 走法不在合法走法列表中
    #[error("Illegal move: {mv}")]
    IllegalMove { mv: String },

    /// 无法解析走法
    #[error("Cannot parse move '{input}': {reason}")]
    ParseMove { input: String, reason: String },
}

/// 局面操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
