//! 错误类型定义

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// 单个并行工作单元的失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFault {
    /// 根走法在合法走法列表中的下标
    pub index: usize,
    /// 根走法（Debug 格式）
    pub mv: String,
    /// panic 信息
    pub message: String,
}

impl fmt::Display for WorkerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root move #{} ({}): {}", self.index, self.mv, self.message)
    }
}

/// 代理错误类型
#[derive(Error, Debug)]
pub enum AgentError {
    /// 构造参数无效（深度、评估器、并行配置）
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// 并行搜索中有工作单元失败
    #[error("{} root search worker(s) failed: {}", .failures.len(), join_faults(.failures))]
    WorkerFailure { failures: Vec<WorkerFault> },

    /// 并行搜索等待超时
    #[error("Parallel search timed out after {elapsed:?} ({completed}/{total} root moves done)")]
    Timeout {
        elapsed: Duration,
        completed: usize,
        total: usize,
    },

    /// 所有根走法的分值都无法比较（评估器返回 NaN）
    #[error("No comparable score among {moves} evaluated root moves")]
    InvalidScore { moves: usize },

    /// 线程池创建失败
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// 人类玩家的输入已关闭
    #[error("Input closed before a move was entered")]
    InputClosed,

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// 创建配置错误
    pub fn configuration(reason: impl Into<String>) -> Self {
        AgentError::Configuration {
            reason: reason.into(),
        }
    }
}

fn join_faults(failures: &[WorkerFault]) -> String {
    failures
        .iter()
        .map(WorkerFault::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 代理操作结果类型
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_failure_message() {
        let err = AgentError::WorkerFailure {
            failures: vec![
                WorkerFault {
                    index: 0,
                    mv: "'a'".to_string(),
                    message: "boom".to_string(),
                },
                WorkerFault {
                    index: 3,
                    mv: "'d'".to_string(),
                    message: "bad eval".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 root search worker(s) failed: root move #0 ('a'): boom; root move #3 ('d'): bad eval"
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = AgentError::configuration("depth must be >= 1");
        assert_eq!(err.to_string(), "Configuration error: depth must be >= 1");
    }
}
