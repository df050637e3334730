use std::cell::{OnceCell, RefCell};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use fnv::FnvHashSet;
use typed_arena::Arena;

use crate::data::{Pos, DIRECTIONS};
use crate::moves::{Move, Moves};
use crate::solver::StaticData;
use crate::state::State;

/// Identity of a search state, cheap to copy into visited sets.
pub(crate) type StateKey<'a> = (Pos, &'a [Pos]);

/// Sorted box arrays, each distinct arrangement stored once.
///
/// Moving the player without pushing reuses the parent's slice,
/// only pushes allocate.
pub(crate) struct BoxStore<'a> {
    arena: &'a Arena<Pos>,
    interned: RefCell<FnvHashSet<&'a [Pos]>>,
}

impl<'a> BoxStore<'a> {
    pub(crate) fn new(arena: &'a Arena<Pos>) -> Self {
        BoxStore {
            arena,
            interned: RefCell::new(FnvHashSet::default()),
        }
    }

    /// `boxes` must already be sorted.
    pub(crate) fn intern(&self, boxes: &[Pos]) -> &'a [Pos] {
        let mut interned = self.interned.borrow_mut();
        if let Some(&existing) = interned.get(boxes) {
            return existing;
        }
        let arena: &'a Arena<Pos> = self.arena;
        let stored: &'a [Pos] = arena.alloc_extend(boxes.iter().cloned());
        interned.insert(stored);
        stored
    }

    pub(crate) fn len(&self) -> usize {
        self.interned.borrow().len()
    }
}

/// Everything states of one search share.
pub(crate) struct SearchSpace<'a> {
    pub(crate) sd: &'a StaticData,
    pub(crate) boxes: BoxStore<'a>,
}

impl<'a> SearchSpace<'a> {
    pub(crate) fn new(sd: &'a StaticData, arena: &'a Arena<Pos>) -> Self {
        SearchSpace {
            sd,
            boxes: BoxStore::new(arena),
        }
    }
}

struct HistoryNode {
    mov: Move,
    prev: Option<Rc<HistoryNode>>,
}

impl Drop for HistoryNode {
    // the default drop recurses once per move and long DFS paths would blow the stack
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(node) = prev {
            match Rc::try_unwrap(node) {
                Ok(mut node) => prev = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// Moves leading to a state, shared with all its ancestors.
#[derive(Clone, Default)]
pub(crate) struct History {
    last: Option<Rc<HistoryNode>>,
    len: usize,
}

impl History {
    fn with(&self, mov: Move) -> History {
        History {
            last: Some(Rc::new(HistoryNode {
                mov,
                prev: self.last.clone(),
            })),
            len: self.len + 1,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn to_moves(&self) -> Moves {
        let mut moves = Vec::with_capacity(self.len);
        let mut cur = self.last.as_ref();
        while let Some(node) = cur {
            moves.push(node.mov);
            cur = node.prev.as_ref();
        }
        moves.reverse();
        Moves::new(moves)
    }
}

/// A node of the search: player and box positions plus the path that led here.
///
/// Equality and hashing only look at the positions.
pub(crate) struct PuzzleState<'a> {
    player_pos: Pos,
    boxes: &'a [Pos],
    history: History,
    space: &'a SearchSpace<'a>,
    successors: OnceCell<Vec<PuzzleState<'a>>>,
}

impl<'a> PuzzleState<'a> {
    pub(crate) fn root(space: &'a SearchSpace<'a>, state: &State) -> Self {
        let mut boxes = state.boxes.clone();
        boxes.sort();
        PuzzleState {
            player_pos: state.player_pos,
            boxes: space.boxes.intern(&boxes),
            history: History::default(),
            space,
            successors: OnceCell::new(),
        }
    }

    pub(crate) fn player_pos(&self) -> Pos {
        self.player_pos
    }

    pub(crate) fn boxes(&self) -> &'a [Pos] {
        self.boxes
    }

    pub(crate) fn key(&self) -> StateKey<'a> {
        (self.player_pos, self.boxes)
    }

    /// Number of moves from the root.
    pub(crate) fn depth(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn moves(&self) -> Moves {
        self.history.to_moves()
    }

    pub(crate) fn sd(&self) -> &'a StaticData {
        self.space.sd
    }

    pub(crate) fn to_state(&self) -> State {
        State::new(self.player_pos, self.boxes.to_vec())
    }

    pub(crate) fn reached_goal(&self) -> bool {
        let map = &self.space.sd.map;
        self.boxes.iter().all(|&b| map.is_goal(b))
    }

    /// Legal successors in `DIRECTIONS` order, computed on first use.
    ///
    /// Pushes into a dead end are left out.
    pub(crate) fn successors(&self) -> &[PuzzleState<'a>] {
        self.successors.get_or_init(|| self.expand())
    }

    fn expand(&self) -> Vec<PuzzleState<'a>> {
        let sd = self.space.sd;
        let mut new_states = Vec::with_capacity(DIRECTIONS.len());

        for &dir in &DIRECTIONS {
            let new_player_pos = self.player_pos + dir;
            if !sd.map.contains(new_player_pos) || sd.map.is_wall(new_player_pos) {
                continue;
            }

            match self.box_index(new_player_pos) {
                None => {
                    new_states.push(self.child(new_player_pos, self.boxes, Move::new(dir, false)));
                }
                Some(box_index) => {
                    let push_dest = new_player_pos + dir;
                    if !sd.map.contains(push_dest)
                        || sd.map.is_wall(push_dest)
                        || self.box_index(push_dest).is_some()
                        || sd.dead_ends[push_dest]
                    {
                        continue;
                    }

                    let mut new_boxes = self.boxes.to_vec();
                    new_boxes[box_index] = push_dest;
                    new_boxes.sort();
                    let new_boxes = self.space.boxes.intern(&new_boxes);
                    new_states.push(self.child(new_player_pos, new_boxes, Move::new(dir, true)));
                }
            }
        }

        new_states
    }

    fn child(&self, player_pos: Pos, boxes: &'a [Pos], mov: Move) -> PuzzleState<'a> {
        PuzzleState {
            player_pos,
            boxes,
            history: self.history.with(mov),
            space: self.space,
            successors: OnceCell::new(),
        }
    }

    fn box_index(&self, pos: Pos) -> Option<usize> {
        self.boxes.binary_search(&pos).ok()
    }
}

impl Clone for PuzzleState<'_> {
    // the successor cache isn't shared with clones
    fn clone(&self) -> Self {
        PuzzleState {
            player_pos: self.player_pos,
            boxes: self.boxes,
            history: self.history.clone(),
            space: self.space,
            successors: OnceCell::new(),
        }
    }
}

impl PartialEq for PuzzleState<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.player_pos == other.player_pos && self.boxes == other.boxes
    }
}

impl Eq for PuzzleState<'_> {}

impl Hash for PuzzleState<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Debug for PuzzleState<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.space.sd.map.xsb_with_state(&self.to_state())
        )
    }
}
