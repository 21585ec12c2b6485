//! Iterative 4-connected flood fill over a visited bitmap.

use std::sync::atomic::{AtomicBool, Ordering};

use common::BitBuffer2;

use crate::error::{Error, Result};

/// Pops between two reads of the cancellation flag.
const CANCEL_POLL_INTERVAL: usize = 4096;

/// Pixels collected by one fill, in discovery order.
#[derive(Debug)]
pub(super) struct Fill {
    pub pixels: Vec<u32>,
    /// The fill stopped at the pixel ceiling. Its unexplored frontier was
    /// released back to the scan.
    pub truncated: bool,
}

/// Reusable flood-fill state. The stack is kept between seeds to avoid
/// reallocating it for every region.
pub(super) struct FloodFill<'a> {
    width: usize,
    height: usize,
    limit: usize,
    cancel: Option<&'a AtomicBool>,
    stack: Vec<u32>,
}

impl<'a> FloodFill<'a> {
    pub fn new(width: usize, height: usize, limit: usize, cancel: Option<&'a AtomicBool>) -> Self {
        Self {
            width,
            height,
            limit,
            cancel,
            stack: Vec::new(),
        }
    }

    /// Collects the 4-connected run of unvisited pixels containing `seed`.
    ///
    /// Pixels are marked visited when pushed, so each is pushed at most once.
    /// On reaching `limit` pixels the fill stops and unmarks everything still
    /// on the stack; those pixels stay available to later seeds.
    pub fn run(&mut self, visited: &mut BitBuffer2, seed: usize) -> Result<Fill> {
        let was_visited = visited.test_and_set(seed);
        debug_assert!(!was_visited, "seed {seed} already visited");

        self.stack.clear();
        self.stack.push(seed as u32);
        let mut pixels = Vec::new();
        let mut pops = 0usize;

        while let Some(idx) = self.stack.pop() {
            pops += 1;
            if pops % CANCEL_POLL_INTERVAL == 0 && self.is_cancelled() {
                return Err(Error::Cancelled);
            }

            if pixels.len() == self.limit {
                visited.set(idx as usize, false);
                for &pending in &self.stack {
                    visited.set(pending as usize, false);
                }
                self.stack.clear();
                return Ok(Fill {
                    pixels,
                    truncated: true,
                });
            }

            pixels.push(idx);
            self.push_neighbors(visited, idx as usize);
        }

        Ok(Fill {
            pixels,
            truncated: false,
        })
    }

    #[inline]
    fn push_neighbors(&mut self, visited: &mut BitBuffer2, idx: usize) {
        let x = idx % self.width;
        let y = idx / self.width;

        if x > 0 {
            self.push_unvisited(visited, idx - 1);
        }
        if x + 1 < self.width {
            self.push_unvisited(visited, idx + 1);
        }
        if y > 0 {
            self.push_unvisited(visited, idx - self.width);
        }
        if y + 1 < self.height {
            self.push_unvisited(visited, idx + self.width);
        }
    }

    #[inline]
    fn push_unvisited(&mut self, visited: &mut BitBuffer2, idx: usize) {
        if !visited.test_and_set(idx) {
            self.stack.push(idx as u32);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
