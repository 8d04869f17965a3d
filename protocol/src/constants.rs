//! 搜索常量定义

use std::time::Duration;

/// 必胜分值（评估函数的输出必须严格落在 (-WIN_SCORE, WIN_SCORE) 之内）
pub const WIN_SCORE: f64 = 99999.0;

/// 必败分值
pub const LOSS_SCORE: f64 = -WIN_SCORE;

/// 并行搜索的默认工作线程数
pub const DEFAULT_WORKERS: usize = 8;

/// 并行搜索等待结果的默认超时（秒）
pub const DEFAULT_JOIN_TIMEOUT_SECS: u64 = 99_999;

/// 并行搜索等待结果的默认超时 Duration
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(DEFAULT_JOIN_TIMEOUT_SECS);
