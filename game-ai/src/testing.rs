//! 测试用局面与评估器

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use protocol::{Board, Color, Evaluator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 博弈树的形状描述
pub(crate) enum Shape {
    Leaf(f64),
    Won,
    Node(f64, Vec<Shape>),
}

pub(crate) fn leaf(score: f64) -> Shape {
    Shape::Leaf(score)
}

pub(crate) fn node(score: f64, children: Vec<Shape>) -> Shape {
    Shape::Node(score, children)
}

/// 走到这里的一方获胜
pub(crate) fn won() -> Shape {
    Shape::Won
}

struct TreeNode {
    score: f64,
    won: bool,
    children: Vec<usize>,
}

/// 显式博弈树局面，走法是子节点下标
#[derive(Clone)]
pub(crate) struct TreeBoard {
    nodes: Arc<Vec<TreeNode>>,
    at: usize,
}

impl TreeBoard {
    pub(crate) fn new(root: Shape) -> Self {
        let mut nodes = Vec::new();
        flatten(&root, &mut nodes);
        Self {
            nodes: Arc::new(nodes),
            at: 0,
        }
    }

    /// 随机博弈树：每层 1-4 个分支，偶尔出现提前终局或无子可动
    pub(crate) fn random(seed: u64, plies: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let children = (0..rng.gen_range(2..=4))
            .map(|_| random_shape(&mut rng, plies - 1))
            .collect();
        Self::new(node(0.0, children))
    }

    /// 当前节点的静态分值
    pub(crate) fn score(&self) -> f64 {
        self.nodes[self.at].score
    }
}

impl fmt::Debug for TreeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeBoard(#{}, score {})", self.at, self.score())
    }
}

fn flatten(shape: &Shape, nodes: &mut Vec<TreeNode>) -> usize {
    let index = nodes.len();
    nodes.push(TreeNode {
        score: 0.0,
        won: false,
        children: Vec::new(),
    });
    match shape {
        Shape::Leaf(score) => nodes[index].score = *score,
        Shape::Won => nodes[index].won = true,
        Shape::Node(score, children) => {
            let children = children.iter().map(|c| flatten(c, nodes)).collect();
            nodes[index].score = *score;
            nodes[index].children = children;
        }
    }
    index
}

fn random_shape(rng: &mut ChaCha8Rng, plies: u32) -> Shape {
    let score = rng.gen_range(-50..=50) as f64;
    if plies == 0 {
        return leaf(score);
    }
    match rng.gen_range(0..100) {
        0..=4 => won(),
        5..=9 => leaf(score),
        _ => {
            let children = (0..rng.gen_range(1..=4))
                .map(|_| random_shape(rng, plies - 1))
                .collect();
            node(score, children)
        }
    }
}

impl Board for TreeBoard {
    type Move = usize;

    fn legal_moves(&self) -> Vec<usize> {
        (0..self.nodes[self.at].children.len()).collect()
    }

    fn generate_successor(&self, mv: &usize) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            at: self.nodes[self.at].children[*mv],
        }
    }

    fn is_game_over(&self) -> bool {
        self.nodes[self.at].won
    }
}

/// 直接读取节点分值，忽略阵营
pub(crate) fn tree_score(board: &TreeBoard, _color: Color) -> f64 {
    board.score()
}

/// 记录调用次数和最后一次视角的评估器
pub(crate) struct CountingEval {
    calls: AtomicUsize,
    last_color: Mutex<Option<Color>>,
}

impl CountingEval {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_color: Mutex::new(None),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_color(&self) -> Option<Color> {
        *self.last_color.lock().unwrap()
    }
}

impl Evaluator<TreeBoard> for CountingEval {
    fn evaluate(&self, position: &TreeBoard, color: Color) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_color.lock().unwrap() = Some(color);
        position.score()
    }
}

/// 遇到指定分值时 panic 的评估器
pub(crate) struct PanicOn(pub(crate) f64);

impl Evaluator<TreeBoard> for PanicOn {
    fn evaluate(&self, position: &TreeBoard, _color: Color) -> f64 {
        if position.score() == self.0 {
            panic!("evaluator exploded on {}", self.0);
        }
        position.score()
    }
}

/// 每次评估都睡眠一段时间
pub(crate) struct SlowEval(pub(crate) Duration);

impl Evaluator<TreeBoard> for SlowEval {
    fn evaluate(&self, position: &TreeBoard, _color: Color) -> f64 {
        thread::sleep(self.0);
        position.score()
    }
}

/// 取子游戏：每次取 1-3 个，取走最后一个者胜
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Nim {
    pub(crate) pile: u32,
}

impl Board for Nim {
    type Move = u32;

    fn legal_moves(&self) -> Vec<u32> {
        (1..=self.pile.min(3)).collect()
    }

    fn generate_successor(&self, mv: &u32) -> Self {
        Nim {
            pile: self.pile - mv,
        }
    }

    fn is_game_over(&self) -> bool {
        self.pile == 0
    }
}

pub(crate) fn nim_flat(_board: &Nim, _color: Color) -> f64 {
    0.0
}

/// 测试日志，`RUST_LOG=game_ai=debug` 查看搜索过程
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
