//! 双人完全信息博弈的局面与评估接口
//!
//! 包含:
//! - 阵营定义
//! - 局面 trait（合法走法、后继局面、终局判断）
//! - 静态评估 trait 及其适配器
//! - 搜索常量（必胜分值、并行参数）

mod board;
mod color;
mod constants;
mod error;
mod evaluator;

pub use board::Board;
pub use color::Color;
pub use constants::*;
pub use error::{GameError, Result};
pub use evaluator::{shared, Evaluator, Negated, SharedEvaluator};
