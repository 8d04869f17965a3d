//! 根节点并行搜索
//!
//! 每个根走法作为一个独立任务提交到固定大小的线程池，各自使用全窗口
//! `(-WIN_SCORE, WIN_SCORE)` 做 Alpha-Beta 搜索。任务之间不共享 alpha/beta，
//! 根节点的跨分支剪枝因此失效，换来的是各分支完全独立。
//!
//! 结果按走法下标合并，完成顺序不影响结果。等待有超时上限，超时后置位取消
//! 标志，未完成的任务在下一个节点处退出，线程池随之释放。

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use protocol::{Board, Color, SharedEvaluator};
use tracing::{debug, info, warn};

use crate::config::{AgentConfig, SearchStrategy, TerminalScore};
use crate::error::{AgentError, Result, WorkerFault};
use crate::table::ValueTable;
use crate::value::{root_value, SearchContext};

/// 一个根走法的搜索任务，按值移交给工作线程
pub struct RootTask<B: Board> {
    position: B,
    mv: B::Move,
    color: Color,
    depth_limit: u32,
    evaluator: SharedEvaluator<B>,
    opponent_evaluator: SharedEvaluator<B>,
    terminal_score: TerminalScore,
}

impl<B: Board> RootTask<B> {
    pub fn new(
        position: B,
        mv: B::Move,
        color: Color,
        depth_limit: u32,
        evaluator: SharedEvaluator<B>,
        opponent_evaluator: SharedEvaluator<B>,
    ) -> Self {
        Self {
            position,
            mv,
            color,
            depth_limit,
            evaluator,
            opponent_evaluator,
            terminal_score: TerminalScore::AlwaysWin,
        }
    }

    pub fn with_terminal_score(mut self, terminal_score: TerminalScore) -> Self {
        self.terminal_score = terminal_score;
        self
    }

    /// 执行搜索，返回 (分值, 访问节点数)
    pub fn run(&self, cancel: &AtomicBool) -> (f64, u64) {
        let ctx = SearchContext::new(self.color, self.depth_limit, &*self.evaluator)
            .with_opponent_evaluator(&*self.opponent_evaluator)
            .with_terminal_score(self.terminal_score)
            .with_cancel(cancel);
        let value = root_value(SearchStrategy::AlphaBeta, &ctx, &self.mv, &self.position);
        (value, ctx.nodes())
    }
}

/// 并行分发的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched<M> {
    pub values: ValueTable<M>,
    pub nodes: u64,
}

/// 根节点并行分发器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelDispatcher {
    workers: usize,
    timeout: Duration,
}

impl ParallelDispatcher {
    pub fn new(workers: usize, timeout: Duration) -> Self {
        Self {
            workers: workers.max(1),
            timeout,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.workers, config.timeout())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 每个任务提交一个工作单元，阻塞直到全部完成、出错或超时
    pub fn dispatch<B: Board>(&self, tasks: Vec<RootTask<B>>) -> Result<Dispatched<B::Move>> {
        let total = tasks.len();
        let moves: Vec<B::Move> = tasks.iter().map(|task| task.mv.clone()).collect();
        if total == 0 {
            return Ok(Dispatched {
                values: ValueTable::new(),
                nodes: 0,
            });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.min(total))
            .thread_name(|i| format!("search-worker-{i}"))
            .build()?;

        info!(
            "并行搜索开始: {} 个根走法, {} 个工作线程",
            total,
            pool.current_num_threads()
        );

        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::unbounded();
        let started = Instant::now();

        for (index, task) in tasks.into_iter().enumerate() {
            let tx = tx.clone();
            let cancel = Arc::clone(&cancel);
            pool.spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| task.run(&cancel)));
                // 超时后接收端已关闭，发送失败可以忽略
                let _ = tx.send((index, outcome.map_err(panic_message)));
            });
        }
        drop(tx);

        let deadline = started.checked_add(self.timeout);
        let mut values: Vec<Option<f64>> = vec![None; total];
        let mut failures = Vec::new();
        let mut nodes = 0;
        let mut completed = 0;

        while completed < total {
            let received = match deadline {
                Some(deadline) => rx.recv_deadline(deadline),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((index, Ok((value, searched)))) => {
                    values[index] = Some(value);
                    nodes += searched;
                    completed += 1;
                }
                Ok((index, Err(message))) => {
                    failures.push(WorkerFault {
                        index,
                        mv: format!("{:?}", moves[index]),
                        message,
                    });
                    completed += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    cancel.store(true, Ordering::Relaxed);
                    let elapsed = started.elapsed();
                    warn!(
                        "并行搜索超时: {:?}, 完成 {}/{}",
                        elapsed, completed, total
                    );
                    return Err(AgentError::Timeout {
                        elapsed,
                        completed,
                        total,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let mut table = ValueTable::with_capacity(total);
        for (index, (mv, value)) in moves.into_iter().zip(values).enumerate() {
            match value {
                Some(value) => table.insert(mv, value),
                None if !failures.iter().any(|f: &WorkerFault| f.index == index) => {
                    failures.push(WorkerFault {
                        index,
                        mv: format!("{:?}", mv),
                        message: "worker exited without reporting a value".to_string(),
                    });
                }
                None => {}
            }
        }

        if !failures.is_empty() {
            failures.sort_by_key(|f| f.index);
            warn!("并行搜索有 {} 个工作单元失败", failures.len());
            return Err(AgentError::WorkerFailure { failures });
        }

        debug!(
            "并行搜索完成: 用时 {:?}, 节点数 {}",
            started.elapsed(),
            nodes
        );
        Ok(Dispatched {
            values: table,
            nodes,
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
