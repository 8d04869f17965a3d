//! 搜索代理
//!
//! 把搜索策略、评估器、阵营和深度组合成统一的"给定局面、返回走法"接口。
//! 每个根走法单独估值（Alpha-Beta 每个根走法都从全窗口开始），
//! 然后在并列最大值中均匀随机选择。

use std::sync::Arc;
use std::time::Duration;

use protocol::{shared, Board, Color, Evaluator, SharedEvaluator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::config::{AgentConfig, SearchStrategy, TerminalScore};
use crate::dispatch::{ParallelDispatcher, RootTask};
use crate::error::{AgentError, Result};
use crate::table::ValueTable;
use crate::value::{root_value, SearchContext};

/// 搜索代理
pub struct SearchAgent<B: Board> {
    config: AgentConfig,
    evaluator: SharedEvaluator<B>,
    /// 只有 Alpha-Beta 会保留对手评估器
    opponent_evaluator: Option<SharedEvaluator<B>>,
    dispatcher: Option<ParallelDispatcher>,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl<B: Board> SearchAgent<B> {
    /// 从配置创建，配置无效时返回 [`AgentError::Configuration`]
    pub fn new(
        config: AgentConfig,
        evaluator: SharedEvaluator<B>,
        opponent_evaluator: Option<SharedEvaluator<B>>,
    ) -> Result<Self> {
        config.validate()?;

        let opponent_evaluator = match opponent_evaluator {
            Some(_) if !config.strategy.uses_opponent_evaluator() => {
                warn!(
                    "{} 只使用一个评估器，忽略对手评估器",
                    config.strategy.name()
                );
                None
            }
            other => other,
        };

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let dispatcher = config
            .parallel
            .then(|| ParallelDispatcher::from_config(&config));

        Ok(Self {
            config,
            evaluator,
            opponent_evaluator,
            dispatcher,
            rng,
            nodes_searched: 0,
        })
    }

    pub fn builder(strategy: SearchStrategy) -> SearchAgentBuilder<B> {
        SearchAgentBuilder::new(strategy)
    }

    /// Minimax 代理
    pub fn minimax<E>(color: Color, depth: u32, evaluator: E) -> Result<Self>
    where
        E: Evaluator<B> + 'static,
    {
        let config = AgentConfig::new(SearchStrategy::Minimax, color, depth);
        Self::new(config, shared(evaluator), None)
    }

    /// Alpha-Beta 代理，对手叶节点使用 `opponent_evaluator`
    pub fn alpha_beta<E, O>(
        color: Color,
        depth: u32,
        evaluator: E,
        opponent_evaluator: O,
    ) -> Result<Self>
    where
        E: Evaluator<B> + 'static,
        O: Evaluator<B> + 'static,
    {
        let config = AgentConfig::new(SearchStrategy::AlphaBeta, color, depth);
        Self::new(config, shared(evaluator), Some(shared(opponent_evaluator)))
    }

    /// Expectimax 代理
    pub fn expectimax<E>(color: Color, depth: u32, evaluator: E) -> Result<Self>
    where
        E: Evaluator<B> + 'static,
    {
        let config = AgentConfig::new(SearchStrategy::Expectimax, color, depth);
        Self::new(config, shared(evaluator), None)
    }

    /// 替换平局随机数源
    pub fn with_rng(mut self, rng: ChaCha8Rng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.config.strategy
    }

    /// 上一次选择走法时访问的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 选择走法并返回其分值
    pub fn select_move_with_value(&mut self, position: &B) -> Result<Option<(B::Move, f64)>> {
        self.nodes_searched = 0;

        let moves = position.legal_moves();
        if moves.is_empty() {
            debug!("{}: 无合法走法", self.config.strategy.name());
            return Ok(None);
        }

        let values = self.value_table(position, moves)?;
        // 有合法走法时必须选出一个，全部分值不可比较说明评估器出错
        let Some((mv, value)) = values.choose_best(&mut self.rng) else {
            warn!(
                "{}: {} 个走法的分值都无法比较",
                self.config.strategy.name(),
                values.len()
            );
            return Err(AgentError::InvalidScore {
                moves: values.len(),
            });
        };

        debug!(
            "{}: {} 个走法, 最佳分值 {}, 并列 {} 个, 节点数 {}",
            self.config.strategy.name(),
            values.len(),
            value,
            values.best_moves().len(),
            self.nodes_searched
        );
        Ok(Some((mv, value)))
    }

    /// 计算每个合法走法的分值
    pub fn evaluate_moves(&mut self, position: &B) -> Result<ValueTable<B::Move>> {
        self.nodes_searched = 0;
        let moves = position.legal_moves();
        self.value_table(position, moves)
    }

    fn value_table(&mut self, position: &B, moves: Vec<B::Move>) -> Result<ValueTable<B::Move>> {
        let opponent_evaluator = self
            .opponent_evaluator
            .as_ref()
            .unwrap_or(&self.evaluator);

        if let Some(dispatcher) = &self.dispatcher {
            let tasks = moves
                .into_iter()
                .map(|mv| {
                    RootTask::new(
                        position.clone(),
                        mv,
                        self.config.color,
                        self.config.depth_limit(),
                        Arc::clone(&self.evaluator),
                        Arc::clone(opponent_evaluator),
                    )
                    .with_terminal_score(self.config.terminal_score)
                })
                .collect();
            let dispatched = dispatcher.dispatch(tasks)?;
            self.nodes_searched = dispatched.nodes;
            return Ok(dispatched.values);
        }

        let depth_limit = self.config.depth_limit();
        let ctx = SearchContext::new(self.config.color, depth_limit, &*self.evaluator)
            .with_opponent_evaluator(&**opponent_evaluator)
            .with_terminal_score(self.config.terminal_score);
        let mut values = ValueTable::with_capacity(moves.len());
        for mv in moves {
            let value = root_value(self.config.strategy, &ctx, &mv, position);
            values.insert(mv, value);
        }
        self.nodes_searched = ctx.nodes();
        Ok(values)
    }
}

impl<B: Board> Agent<B> for SearchAgent<B> {
    fn color(&self) -> Color {
        self.config.color
    }

    fn name(&self) -> &str {
        self.config.strategy.name()
    }

    fn select_move(&mut self, position: &B) -> Result<Option<B::Move>> {
        Ok(self.select_move_with_value(position)?.map(|(mv, _)| mv))
    }
}

/// 搜索代理构造器
pub struct SearchAgentBuilder<B: Board> {
    config: AgentConfig,
    evaluator: Option<SharedEvaluator<B>>,
    opponent_evaluator: Option<SharedEvaluator<B>>,
    rng: Option<ChaCha8Rng>,
}

impl<B: Board> SearchAgentBuilder<B> {
    pub fn new(strategy: SearchStrategy) -> Self {
        Self {
            config: AgentConfig {
                strategy,
                ..AgentConfig::default()
            },
            evaluator: None,
            opponent_evaluator: None,
            rng: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.config.color = color;
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.config.depth = depth;
        self
    }

    /// 开启根节点并行
    pub fn parallel(mut self, workers: usize) -> Self {
        self.config = self.config.parallel(workers);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// 终局分值记法，默认任何终局都记为必胜
    pub fn terminal_score(mut self, terminal_score: TerminalScore) -> Self {
        self.config.terminal_score = terminal_score;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn rng(mut self, rng: ChaCha8Rng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn evaluator<E: Evaluator<B> + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Some(shared(evaluator));
        self
    }

    pub fn shared_evaluator(mut self, evaluator: SharedEvaluator<B>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn opponent_evaluator<E: Evaluator<B> + 'static>(mut self, evaluator: E) -> Self {
        self.opponent_evaluator = Some(shared(evaluator));
        self
    }

    pub fn shared_opponent_evaluator(mut self, evaluator: SharedEvaluator<B>) -> Self {
        self.opponent_evaluator = Some(evaluator);
        self
    }

    pub fn build(self) -> Result<SearchAgent<B>> {
        let evaluator = self.evaluator.ok_or_else(|| {
            AgentError::configuration(format!(
                "{} requires an evaluator",
                self.config.strategy.name()
            ))
        })?;
        let agent = SearchAgent::new(self.config, evaluator, self.opponent_evaluator)?;
        Ok(match self.rng {
            Some(rng) => agent.with_rng(rng),
            None => agent,
        })
    }
}
