//! 静态评估接口

use std::sync::Arc;

use crate::board::Board;
use crate::color::Color;

/// 静态评估函数：给定局面和视角阵营，返回实数分值
///
/// 必须是纯函数。实现可以任意昂贵（例如调用学习得到的模型），
/// 但输出范围应严格小于 [`WIN_SCORE`](crate::WIN_SCORE)，否则剪枝结果不可靠。
pub trait Evaluator<B: Board>: Send + Sync {
    fn evaluate(&self, position: &B, color: Color) -> f64;
}

impl<B, F> Evaluator<B> for F
where
    B: Board,
    F: Fn(&B, Color) -> f64 + Send + Sync,
{
    fn evaluate(&self, position: &B, color: Color) -> f64 {
        self(position, color)
    }
}

/// 可在线程间共享的评估器
pub type SharedEvaluator<B> = Arc<dyn Evaluator<B>>;

/// 包装成共享评估器
pub fn shared<B, E>(evaluator: E) -> SharedEvaluator<B>
where
    B: Board,
    E: Evaluator<B> + 'static,
{
    Arc::new(evaluator)
}

/// 取反评估器：把单一视角的启发式变成对手视角
#[derive(Debug, Clone, Copy)]
pub struct Negated<E>(pub E);

impl<B, E> Evaluator<B> for Negated<E>
where
    B: Board,
    E: Evaluator<B>,
{
    fn evaluate(&self, position: &B, color: Color) -> f64 {
        -self.0.evaluate(position, color)
    }
}
