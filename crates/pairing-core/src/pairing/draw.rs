use rand::Rng;
use std::collections::VecDeque;

/// Source of uniformly random indices.
pub trait Draw {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> Draw for R {
    fn index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices. Values are clamped into range and an
/// exhausted script answers `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraw {
    script: VecDeque<usize>,
    requested: Vec<usize>,
}

impl ScriptedDraw {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
            requested: Vec::new(),
        }
    }

    /// The `len` of every draw made so far, in order.
    pub fn requested(&self) -> &[usize] {
        &self.requested
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Draw for ScriptedDraw {
    fn index(&mut self, len: usize) -> usize {
        self.requested.push(len);
        let next = self.script.pop_front().unwrap_or(0);
        next.min(len.saturating_sub(1))
    }
}
