//! 代理配置

use std::time::Duration;

use protocol::{Color, DEFAULT_JOIN_TIMEOUT_SECS, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// 搜索策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// 完整 Minimax，不剪枝
    Minimax,
    /// Alpha-Beta 剪枝，可选根节点并行
    AlphaBeta,
    /// 对手均匀随机的期望搜索
    Expectimax,
}

impl SearchStrategy {
    /// 是否支持根节点并行
    pub fn supports_parallel(&self) -> bool {
        matches!(self, SearchStrategy::AlphaBeta)
    }

    /// 是否在对手叶节点使用对手评估器
    pub fn uses_opponent_evaluator(&self) -> bool {
        matches!(self, SearchStrategy::AlphaBeta)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Minimax => "minimax",
            SearchStrategy::AlphaBeta => "alpha-beta",
            SearchStrategy::Expectimax => "expectimax",
        }
    }
}

/// 终局分值的记法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalScore {
    /// 任何一方走成终局都记为 `WIN_SCORE`
    #[default]
    AlwaysWin,
    /// 按走子方取符号：代理走成终局为 `WIN_SCORE`，对手走成终局为 `LOSS_SCORE`
    ByMover,
}

/// 代理配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub strategy: SearchStrategy,
    pub color: Color,
    /// 向前看几步己方走法，至少为 1（1 表示只评估当前这一步）
    pub depth: u32,
    /// 根节点并行（仅 Alpha-Beta）
    pub parallel: bool,
    /// 并行工作线程数
    pub workers: usize,
    /// 并行等待超时（毫秒）
    pub timeout_ms: u64,
    /// 平局随机选择的种子，缺省时使用系统熵
    pub seed: Option<u64>,
    /// 终局分值的记法
    pub terminal_score: TerminalScore,
}

impl AgentConfig {
    pub fn new(strategy: SearchStrategy, color: Color, depth: u32) -> Self {
        Self {
            strategy,
            color,
            depth,
            ..Self::default()
        }
    }

    /// 开启根节点并行
    pub fn parallel(mut self, workers: usize) -> Self {
        self.parallel = true;
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_terminal_score(mut self, terminal_score: TerminalScore) -> Self {
        self.terminal_score = terminal_score;
        self
    }

    /// 内部深度上限：外部深度减一，0 表示不向前看
    pub fn depth_limit(&self) -> u32 {
        self.depth.saturating_sub(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.depth < 1 {
            return Err(AgentError::configuration(format!(
                "depth must be >= 1, got {}",
                self.depth
            )));
        }
        if self.parallel && !self.strategy.supports_parallel() {
            return Err(AgentError::configuration(format!(
                "parallel search is only available for alpha-beta, not {}",
                self.strategy.name()
            )));
        }
        if self.workers == 0 {
            return Err(AgentError::configuration("worker count must be >= 1"));
        }
        if self.timeout_ms == 0 {
            return Err(AgentError::configuration("join timeout must be positive"));
        }
        Ok(())
    }

    /// 从 JSON 解析并校验
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::AlphaBeta,
            color: Color::First,
            depth: 1,
            parallel: false,
            workers: DEFAULT_WORKERS,
            timeout_ms: DEFAULT_JOIN_TIMEOUT_SECS * 1000,
            seed: None,
            terminal_score: TerminalScore::AlwaysWin,
        }
    }
}
