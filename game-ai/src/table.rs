//! 走法-分值表
//!
//! 每次选择走法时新建，选出最佳走法后丢弃。按合法走法的顺序保存，
//! 保证同一个随机种子总能复现同样的平局选择；另有哈希索引用于按走法查找。

use std::collections::HashMap;
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::Rng;

/// 走法-分值表
#[derive(Debug, Clone)]
pub struct ValueTable<M> {
    entries: Vec<(M, f64)>,
    index: HashMap<M, usize>,
}

impl<M> Default for ValueTable<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// 按顺序比较走法和分值
impl<M: PartialEq> PartialEq for ValueTable<M> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<M: Clone + Eq + Hash> ValueTable<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// 记录走法的分值，已存在则覆盖
    pub fn insert(&mut self, mv: M, value: f64) {
        match self.index.get(&mv) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(mv.clone(), self.entries.len());
                self.entries.push((mv, value));
            }
        }
    }

    pub fn get(&self, mv: &M) -> Option<f64> {
        self.index.get(mv).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&M, f64)> {
        self.entries.iter().map(|(mv, value)| (mv, *value))
    }

    /// 最大分值，NaN 只在全部分值都是 NaN 时出现
    pub fn max_value(&self) -> Option<f64> {
        self.entries.iter().map(|(_, value)| *value).reduce(f64::max)
    }

    /// 分值恰好等于最大值的所有走法（不做容差比较）
    pub fn best_moves(&self) -> Vec<&M> {
        let Some(best) = self.max_value() else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|(_, value)| *value == best)
            .map(|(mv, _)| mv)
            .collect()
    }

    /// 在并列最佳的走法中均匀随机选一个，没有可比较的分值时返回 `None`
    pub fn choose_best<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(M, f64)> {
        let best = self.max_value()?;
        self.best_moves()
            .choose(rng)
            .map(|mv| ((*mv).clone(), best))
    }
}

impl<M: Clone + Eq + Hash> FromIterator<(M, f64)> for ValueTable<M> {
    fn from_iter<I: IntoIterator<Item = (M, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (mv, value) in iter {
            table.insert(mv, value);
        }
        table
    }
}
