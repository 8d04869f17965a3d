//! 代理接口
//!
//! 外部的对局循环只通过 [`Agent::select_move`] 向代理要走法。
//! 返回 `Ok(None)` 表示当前局面没有合法走法，由调用方判定对局结束。

use protocol::{Board, Color};

use crate::error::Result;

/// 给定局面、返回走法的玩家
pub trait Agent<B: Board> {
    /// 代理执哪一方
    fn color(&self) -> Color;

    /// 显示名称
    fn name(&self) -> &str {
        "Agent"
    }

    /// 为当前局面选择一个走法，无合法走法时返回 `None`
    fn select_move(&mut self, position: &B) -> Result<Option<B::Move>>;
}

impl<B: Board, A: Agent<B> + ?Sized> Agent<B> for Box<A> {
    fn color(&self) -> Color {
        (**self).color()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn select_move(&mut self, position: &B) -> Result<Option<B::Move>> {
        (**self).select_move(position)
    }
}
