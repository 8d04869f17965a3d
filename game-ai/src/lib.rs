//! 对抗博弈搜索引擎
//!
//! 包含:
//! - Minimax / Alpha-Beta / Expectimax 估值函数
//! - 平局随机选择的搜索代理
//! - Alpha-Beta 根节点并行分发
//! - 随机代理与人类代理
//!
//! 局面规则与静态评估由调用方通过 [`protocol::Board`] 和
//! [`protocol::Evaluator`] 提供。

mod agent;
mod config;
mod dispatch;
mod error;
mod human;
mod random;
mod search;
mod table;
mod value;

#[cfg(test)]
mod testing;

pub use agent::Agent;
pub use config::{AgentConfig, SearchStrategy, TerminalScore};
pub use dispatch::{Dispatched, ParallelDispatcher, RootTask};
pub use error::{AgentError, Result, WorkerFault};
pub use human::HumanAgent;
pub use random::RandomAgent;
pub use search::{SearchAgent, SearchAgentBuilder};
pub use table::ValueTable;
pub use value::{alpha_beta_value, expectimax_value, minimax_value, root_value, SearchContext};
