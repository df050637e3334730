use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::solver::puzzle_state::PuzzleState;

/// Order in which pending states are expanded.
///
/// FIFO and LIFO frontiers ignore the priority.
pub(crate) trait Frontier<'a> {
    fn push(&mut self, priority: f64, state: PuzzleState<'a>);
    fn pop(&mut self) -> Option<PuzzleState<'a>>;
    fn len(&self) -> usize;
}

#[derive(Default)]
pub(crate) struct Fifo<'a>(VecDeque<PuzzleState<'a>>);

impl<'a> Frontier<'a> for Fifo<'a> {
    fn push(&mut self, _priority: f64, state: PuzzleState<'a>) {
        self.0.push_back(state);
    }

    fn pop(&mut self) -> Option<PuzzleState<'a>> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Default)]
pub(crate) struct Lifo<'a>(Vec<PuzzleState<'a>>);

impl<'a> Frontier<'a> for Lifo<'a> {
    fn push(&mut self, _priority: f64, state: PuzzleState<'a>) {
        self.0.push(state);
    }

    fn pop(&mut self) -> Option<PuzzleState<'a>> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Lowest priority first, ties go to the state pushed first.
#[derive(Default)]
pub(crate) struct Heap<'a> {
    heap: BinaryHeap<Reverse<SearchNode<'a>>>,
    pushed: u64,
}

impl<'a> Frontier<'a> for Heap<'a> {
    fn push(&mut self, priority: f64, state: PuzzleState<'a>) {
        self.heap.push(Reverse(SearchNode {
            priority,
            seq: self.pushed,
            state,
        }));
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<PuzzleState<'a>> {
        self.heap.pop().map(|Reverse(node)| node.state)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

struct SearchNode<'a> {
    priority: f64,
    seq: u64,
    state: PuzzleState<'a>,
}

impl Ord for SearchNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for SearchNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode<'_> {}

#[cfg(test)]
mod tests {
    use typed_arena::Arena;

    use super::*;
    use crate::level::Level;
    use crate::solver::puzzle_state::SearchSpace;
    use crate::solver::StaticData;

    /// Indices into `pushed` in pop order.
    fn drain<'a>(pushed: &[PuzzleState<'a>], frontier: &mut dyn Frontier<'a>) -> Vec<usize> {
        let mut order = Vec::new();
        while let Some(state) = frontier.pop() {
            order.push(pushed.iter().position(|s| *s == state).unwrap());
        }
        order
    }

    #[test]
    fn pop_orders() {
        let level: Level = r"
#####
#   #
# @ #
#  .#
#  $#
#####
"
        .parse()
        .unwrap();
        let sd = StaticData::new(level.map.clone());
        let arena = Arena::new();
        let space = SearchSpace::new(&sd, &arena);
        let root = PuzzleState::root(&space, &level.state);
        // up, down, left, right
        let succs = root.successors();
        assert_eq!(succs.len(), 4);
        let mut fifo = Fifo::default();
        let mut lifo = Lifo::default();
        let mut heap = Heap::default();
        let priorities = [2.0, 1.0, 2.0, 1.0];
        for (succ, &priority) in succs.iter().zip(&priorities) {
            fifo.push(priority, succ.clone());
            lifo.push(priority, succ.clone());
            heap.push(priority, succ.clone());
        }
        assert_eq!(heap.len(), 4);

        assert_eq!(drain(succs, &mut fifo), vec![0, 1, 2, 3]);
        assert_eq!(drain(succs, &mut lifo), vec![3, 2, 1, 0]);
        // equal priorities pop in insertion order
        assert_eq!(drain(succs, &mut heap), vec![1, 3, 0, 2]);
        assert_eq!(heap.len(), 0);
    }
}
