use crate::model::{CellState, Grid};
use std::rc::Rc;

/// Row/column offsets of the eight Moore neighbours.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// B3/S23.
pub(crate) fn next_state(current: CellState, live_neighbors: u8) -> CellState {
    match (current, live_neighbors) {
        (CellState::Alive, n) if n < 2 => CellState::Dead,
        (CellState::Alive, n) if n > 3 => CellState::Dead,
        (CellState::Dead, 3) => CellState::Alive,
        (state, _) => state,
    }
}

/// Live cells among the eight toroidal neighbours of `(row, col)`.
///
/// Every cell, corners included, goes through the same modular wrap. On a
/// grid one cell wide or high a neighbour can be the same cell reached from
/// two directions, and it is counted once per direction.
pub(crate) fn count_live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let h = grid.height() as isize;
    let w = grid.width() as isize;
    let (r, c) = (row as isize, col as isize);

    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(dr, dc)| {
            let nr = (r + dr).rem_euclid(h) as usize;
            let nc = (c + dc).rem_euclid(w) as usize;
            grid.get(nr, nc)
        })
        .filter(|cell| cell.is_alive())
        .count() as u8
}

/// Computes the successor of `current` into a fresh buffer.
///
/// The flag is `true` iff at least one cell differs.
pub(crate) fn step(current: &Grid) -> (Grid, bool) {
    let mut changed = false;
    let next = current.map_cells(|r, c, now| {
        let next = next_state(now, count_live_neighbors(current, r, c));
        changed |= next != now;
        next
    });
    (next, changed)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunState {
    Idle,
    Running,
    Halted(HaltReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HaltReason {
    IterationCap,
    /// The last emitted generation equals its successor.
    Converged,
}

/// Snapshot handed to the renderer. `index` counts from 0 (the initial grid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Generation {
    pub(crate) index: usize,
    pub(crate) grid: Rc<Grid>,
}

/// Drives one run as a lazy, finite sequence of generations.
///
/// The first call to `next` emits the initial grid. Each later call steps
/// the previously emitted generation, so the caller can render and pause
/// between calls before any new work is done. A step that produces no
/// change halts the run and the repeated generation is not emitted again.
/// Once `max_iterations` generations have been emitted the last one is
/// still stepped, so a fixed point reached on the final frame halts as
/// `Converged` rather than `IterationCap`.
pub(crate) struct Simulation {
    initial: Option<Grid>,
    last: Option<Rc<Grid>>,
    emitted: usize,
    max_iterations: usize,
    state: RunState,
}

impl Simulation {
    pub(crate) fn new(initial: Grid, max_iterations: usize) -> Self {
        Self {
            initial: Some(initial),
            last: None,
            emitted: 0,
            max_iterations,
            state: RunState::Idle,
        }
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn emitted(&self) -> usize {
        self.emitted
    }

    pub(crate) fn halt_reason(&self) -> Option<HaltReason> {
        match self.state {
            RunState::Halted(reason) => Some(reason),
            _ => None,
        }
    }

    fn halt(&mut self, reason: HaltReason) {
        self.state = RunState::Halted(reason);
        self.initial = None;
        self.last = None;
    }

    fn emit(&mut self, grid: Grid) -> Generation {
        let grid = Rc::new(grid);
        let frame = Generation {
            index: self.emitted,
            grid: Rc::clone(&grid),
        };
        self.emitted += 1;
        if self.emitted >= self.max_iterations {
            let (_, changed) = step(&grid);
            self.halt(if changed {
                HaltReason::IterationCap
            } else {
                HaltReason::Converged
            });
        } else {
            self.state = RunState::Running;
            self.last = Some(grid);
        }
        frame
    }
}

impl Iterator for Simulation {
    type Item = Generation;

    fn next(&mut self) -> Option<Generation> {
        match self.state {
            RunState::Halted(_) => None,
            _ if self.emitted >= self.max_iterations => {
                self.halt(HaltReason::IterationCap);
                None
            }
            RunState::Idle => {
                let initial = self.initial.take()?;
                Some(self.emit(initial))
            }
            RunState::Running => {
                let last = self.last.take()?;
                let (next, changed) = step(&last);
                if !changed {
                    self.halt(HaltReason::Converged);
                    return None;
                }
                Some(self.emit(next))
            }
        }
    }
}
