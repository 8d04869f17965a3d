//! 走法估值
//!
//! 实现 Minimax、Alpha-Beta 剪枝和 Expectimax 三种递归估值函数。
//!
//! 三者共用同一套展开规则：
//! 1. 在 `position` 上走 `mv` 得到新局面；
//! 2. 走子方就此获胜则返回必胜分值（按 [`TerminalScore`] 决定是否区分走子方）；
//! 3. 达到深度上限时返回静态评估；
//! 4. 否则按下一步轮到谁展开：代理一方取最大值，对手一方取最小值（Expectimax 取均值）。
//!
//! 深度只在轮到代理一方走子时加一，因此深度上限表示"向前看几步己方走法"。
//! Alpha/Beta 作为参数逐层传递，没有任何跨分支共享的可变状态。

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use protocol::{Board, Color, Evaluator, LOSS_SCORE, WIN_SCORE};

use crate::config::{SearchStrategy, TerminalScore};

/// 一次根走法估值所需的上下文
pub struct SearchContext<'a, B: Board> {
    color: Color,
    depth_limit: u32,
    evaluator: &'a dyn Evaluator<B>,
    /// 只在 Alpha-Beta 的对手叶节点上使用
    opponent_evaluator: &'a dyn Evaluator<B>,
    terminal_score: TerminalScore,
    nodes: Cell<u64>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a, B: Board> SearchContext<'a, B> {
    /// 创建上下文，对手叶节点默认使用同一个评估器
    pub fn new(color: Color, depth_limit: u32, evaluator: &'a dyn Evaluator<B>) -> Self {
        Self {
            color,
            depth_limit,
            evaluator,
            opponent_evaluator: evaluator,
            terminal_score: TerminalScore::AlwaysWin,
            nodes: Cell::new(0),
            cancel: None,
        }
    }

    pub fn with_opponent_evaluator(mut self, evaluator: &'a dyn Evaluator<B>) -> Self {
        self.opponent_evaluator = evaluator;
        self
    }

    /// 设置取消标志，标志置位后估值函数立即返回
    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_terminal_score(mut self, terminal_score: TerminalScore) -> Self {
        self.terminal_score = terminal_score;
        self
    }

    /// 已访问的节点数
    pub fn nodes(&self) -> u64 {
        self.nodes.get()
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

/// 展开一个走法后的结果
enum Expansion<B: Board> {
    /// 已得到分值，无需递归
    Scored(f64),
    /// 轮到代理一方，取最大值
    Max {
        next: B,
        moves: Vec<B::Move>,
        depth: u32,
    },
    /// 轮到对手，取最小值或期望
    Min {
        next: B,
        moves: Vec<B::Move>,
        depth: u32,
    },
}

/// 三种估值函数共用的展开步骤
///
/// `mover` 是走 `mv` 的一方。`opponent_leaf` 用于对手无子可动时的静态评估。
fn expand<B: Board>(
    ctx: &SearchContext<'_, B>,
    mv: &B::Move,
    position: &B,
    depth: u32,
    mover: Color,
    opponent_leaf: &dyn Evaluator<B>,
) -> Expansion<B> {
    ctx.nodes.set(ctx.nodes.get() + 1);
    if ctx.cancelled() {
        return Expansion::Scored(0.0);
    }

    let next = position.generate_successor(mv);

    // 走子方达成胜利条件
    if next.is_game_over() {
        let score = match ctx.terminal_score {
            TerminalScore::ByMover if mover != ctx.color => LOSS_SCORE,
            _ => WIN_SCORE,
        };
        return Expansion::Scored(score);
    }

    let next_color = mover.opponent();

    // 到达深度限制，返回静态评估
    if depth == ctx.depth_limit {
        return Expansion::Scored(ctx.evaluator.evaluate(&next, ctx.color));
    }

    let moves = next.legal_moves();

    if next_color == ctx.color {
        // 无子可动：直接静态评估，不再递归
        if moves.is_empty() {
            return Expansion::Scored(ctx.evaluator.evaluate(&next, next_color));
        }
        Expansion::Max {
            next,
            moves,
            depth: depth + 1,
        }
    } else {
        if moves.is_empty() {
            return Expansion::Scored(opponent_leaf.evaluate(&next, next_color));
        }
        Expansion::Min { next, moves, depth }
    }
}

/// Minimax 估值（不剪枝）
///
/// 双方的叶节点都使用 `ctx` 的主评估器。
pub fn minimax_value<B: Board>(
    ctx: &SearchContext<'_, B>,
    mv: &B::Move,
    position: &B,
    depth: u32,
    mover: Color,
) -> f64 {
    match expand(ctx, mv, position, depth, mover, ctx.evaluator) {
        Expansion::Scored(score) => score,
        Expansion::Max { next, moves, depth } => moves
            .iter()
            .map(|m| minimax_value(ctx, m, &next, depth, mover.opponent()))
            .fold(LOSS_SCORE, f64::max),
        Expansion::Min { next, moves, depth } => moves
            .iter()
            .map(|m| minimax_value(ctx, m, &next, depth, mover.opponent()))
            .fold(WIN_SCORE, f64::min),
    }
}

/// Alpha-Beta 剪枝估值
///
/// 返回值与 [`minimax_value`] 相同（只要评估值落在 `(alpha, beta)` 内），
/// 区别仅在于遍历的节点数。对手无子可动时使用对手评估器。
pub fn alpha_beta_value<B: Board>(
    ctx: &SearchContext<'_, B>,
    mv: &B::Move,
    position: &B,
    mut alpha: f64,
    mut beta: f64,
    depth: u32,
    mover: Color,
) -> f64 {
    match expand(ctx, mv, position, depth, mover, ctx.opponent_evaluator) {
        Expansion::Scored(score) => score,
        Expansion::Max { next, moves, depth } => {
            let mut value = LOSS_SCORE;
            for m in &moves {
                let score = alpha_beta_value(ctx, m, &next, alpha, beta, depth, mover.opponent());
                value = value.max(score);
                // Beta 剪枝
                if value >= beta {
                    return value;
                }
                alpha = alpha.max(value);
            }
            value
        }
        Expansion::Min { next, moves, depth } => {
            let mut value = WIN_SCORE;
            for m in &moves {
                let score = alpha_beta_value(ctx, m, &next, alpha, beta, depth, mover.opponent());
                value = value.min(score);
                // Alpha 剪枝
                if value <= alpha {
                    return value;
                }
                beta = beta.min(value);
            }
            value
        }
    }
}

/// Expectimax 估值
///
/// 对手的每个应着等概率出现，对手节点的值是各应着值的平均。
pub fn expectimax_value<B: Board>(
    ctx: &SearchContext<'_, B>,
    mv: &B::Move,
    position: &B,
    depth: u32,
    mover: Color,
) -> f64 {
    match expand(ctx, mv, position, depth, mover, ctx.evaluator) {
        Expansion::Scored(score) => score,
        Expansion::Max { next, moves, depth } => moves
            .iter()
            .map(|m| expectimax_value(ctx, m, &next, depth, mover.opponent()))
            .fold(LOSS_SCORE, f64::max),
        Expansion::Min { next, moves, depth } => {
            let p = 1.0 / moves.len() as f64;
            moves
                .iter()
                .map(|m| p * expectimax_value(ctx, m, &next, depth, mover.opponent()))
                .sum()
        }
    }
}

/// 根走法估值：深度 0，代理一方走子，Alpha-Beta 使用全窗口
pub fn root_value<B: Board>(
    strategy: SearchStrategy,
    ctx: &SearchContext<'_, B>,
    mv: &B::Move,
    position: &B,
) -> f64 {
    match strategy {
        SearchStrategy::Minimax => minimax_value(ctx, mv, position, 0, ctx.color),
        SearchStrategy::AlphaBeta => {
            alpha_beta_value(ctx, mv, position, LOSS_SCORE, WIN_SCORE, 0, ctx.color)
        }
        SearchStrategy::Expectimax => expectimax_value(ctx, mv, position, 0, ctx.color),
    }
}
