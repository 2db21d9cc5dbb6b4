//! Game state: flood queue, phases, move budget, click and tick handling.

use crate::board::{Board, CellColor, CellId};
use rand::rngs::StdRng;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

/// Move budget for a board: floor(2 × cells × colours / 150).
pub fn allowed_moves(cell_count: usize, color_count: usize) -> u32 {
    (2 * cell_count * color_count / 150) as u32
}

/// Flooded cells queued for the staggered visual reveal, oldest first.
/// Logical flooding is instant; this only paces presentation.
#[derive(Debug, Default)]
pub struct FloodQueue {
    queue: VecDeque<CellId>,
    queued: HashSet<CellId>,
}

impl FloodQueue {
    /// Queue cells for reveal. Cells already queued, or not flooded, are
    /// skipped.
    pub fn enqueue_flooded(&mut self, board: &Board, delta: &[CellId]) {
        for &id in delta {
            if board.cell(id).flooded && self.queued.insert(id) {
                self.queue.push_back(id);
            }
        }
    }

    /// Oldest queued cell, or `None` once everything is revealed.
    pub fn pop(&mut self) -> Option<CellId> {
        let id = self.queue.pop_front()?;
        self.queued.remove(&id);
        Some(id)
    }

    pub fn is_pending(&self, id: CellId) -> bool {
        self.queued.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.queued.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StartScreen,
    Setup,
    Playing,
    Won,
    Lost,
}

/// One game: board, reveal queue, move accounting and phase. Replaced
/// wholesale on reset.
#[derive(Debug)]
pub struct GameState {
    pub board: Board,
    pub queue: FloodQueue,
    pub phase: Phase,
    target: CellColor,
    moves: u32,
    move_limit: u32,
    started_at: Option<Instant>,
    last_reveal: Option<CellId>,
    rng: StdRng,
}

impl GameState {
    pub fn new(size: usize, cell_size: u16, mut rng: StdRng) -> Self {
        let board = Board::new(size, cell_size, &mut rng);
        let target = board.cell(0).color;
        let move_limit = allowed_moves(board.cell_count(), CellColor::ALL.len());
        let mut queue = FloodQueue::default();
        queue.enqueue_flooded(&board, &[0]);
        Self {
            board,
            queue,
            phase: Phase::StartScreen,
            target,
            moves: 0,
            move_limit,
            started_at: None,
            last_reveal: None,
            rng,
        }
    }

    /// Throw the old game away and start over on a fresh random board.
    pub fn reset(&mut self) {
        self.board = Board::new(self.board.size(), self.board.cell_size(), &mut self.rng);
        self.target = self.board.cell(0).color;
        self.moves = 0;
        self.move_limit = allowed_moves(self.board.cell_count(), CellColor::ALL.len());
        self.queue.clear();
        self.queue.enqueue_flooded(&self.board, &[0]);
        self.phase = Phase::StartScreen;
        self.started_at = None;
        self.last_reveal = None;
    }

    /// Leave the start screen; the first tick afterwards begins play.
    pub fn start(&mut self) {
        if self.phase == Phase::StartScreen {
            self.phase = Phase::Setup;
            self.started_at = Some(Instant::now());
        }
    }

    /// Fixed-rate tick: finishes setup, then reveals one queued cell.
    /// Popping an empty queue is a plain no-op, so the reveal keeps
    /// draining after the game is decided.
    pub fn tick(&mut self) {
        match self.phase {
            Phase::StartScreen => {}
            Phase::Setup => self.phase = Phase::Playing,
            Phase::Playing | Phase::Won | Phase::Lost => self.last_reveal = self.queue.pop(),
        }
    }

    /// Click at a point in board pixel space. Only meaningful while
    /// playing; a point outside every cell changes nothing at all.
    pub fn click(&mut self, x: i32, y: i32) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(id) = self.board.cell_at(x, y) else {
            return;
        };
        self.target = self.board.cell(id).color;
        self.moves += 1;
        let delta = self.board.flood(self.target);
        self.queue.enqueue_flooded(&self.board, &delta);
        if self.board.all_flooded() && self.moves <= self.move_limit {
            self.phase = Phase::Won;
        } else if self.moves > self.move_limit {
            self.phase = Phase::Lost;
        }
    }

    /// Colour of the most recent click, initially the origin's colour.
    pub fn target_color(&self) -> CellColor {
        self.target
    }

    pub fn move_count(&self) -> u32 {
        self.moves
    }

    pub fn move_limit(&self) -> u32 {
        self.move_limit
    }

    pub fn is_won(&self) -> bool {
        self.phase == Phase::Won
    }

    pub fn is_lost(&self) -> bool {
        self.phase == Phase::Lost
    }

    /// Milliseconds since play began; 0 on the start screen.
    pub fn elapsed_millis(&self) -> u64 {
        self.started_at.map_or(0, |t| t.elapsed().as_millis() as u64)
    }

    /// Cell revealed by the most recent tick, as (row, col).
    pub fn animation_step(&self) -> Option<(usize, usize)> {
        self.last_reveal.map(|id| self.board.pos(id))
    }

    #[cfg(test)]
    fn with_board(board: Board, move_limit: u32) -> Self {
        use rand::SeedableRng;
        let target = board.cell(0).color;
        Self {
            board,
            queue: FloodQueue::default(),
            phase: Phase::Playing,
            target,
            moves: 0,
            move_limit,
            started_at: None,
            last_reveal: None,
            rng: StdRng::seed_from_u64(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CELL_SIZE;
    use rand::SeedableRng;

    use crate::board::CellColor::{Blue, Green, Magenta, Red};

    fn state_2x2(move_limit: u32) -> GameState {
        let board = Board::from_colors(2, CELL_SIZE, &[Red, Blue, Green, Magenta]);
        GameState::with_board(board, move_limit)
    }

    /// Pixel centre of the cell at (row, col).
    fn center(row: usize, col: usize) -> (i32, i32) {
        let cs = i32::from(CELL_SIZE);
        (col as i32 * cs + cs / 2, row as i32 * cs + cs / 2)
    }

    #[test]
    fn test_allowed_moves_formula() {
        assert_eq!(allowed_moves(4, 4), 0);
        assert_eq!(allowed_moves(4, 6), 0);
        assert_eq!(allowed_moves(484, 6), 38);
    }

    #[test]
    fn test_queue_enqueue_is_idempotent() {
        let mut board = Board::from_colors(2, CELL_SIZE, &[Red, Blue, Green, Magenta]);
        let delta = board.flood(Blue);
        let mut queue = FloodQueue::default();
        queue.enqueue_flooded(&board, &delta);
        queue.enqueue_flooded(&board, &delta);
        assert_eq!(queue.len(), 1);
        // Unflooded cells are never queued.
        queue.enqueue_flooded(&board, &[3]);
        assert_eq!(queue.len(), 1);
        assert!(queue.is_pending(1));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), None);
        // After its reveal a cell may be queued again by a later flood.
        queue.enqueue_flooded(&board, &[1]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_phase_flow() {
        let mut state = GameState::new(4, CELL_SIZE, StdRng::seed_from_u64(7));
        assert_eq!(state.phase, Phase::StartScreen);
        state.tick();
        assert_eq!(state.phase, Phase::StartScreen);
        assert_eq!(state.elapsed_millis(), 0);
        state.start();
        assert_eq!(state.phase, Phase::Setup);
        state.tick();
        assert_eq!(state.phase, Phase::Playing);
        // Enter is only meaningful on the start screen.
        state.start();
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_click_ignored_outside_playing() {
        let mut state = GameState::new(4, CELL_SIZE, StdRng::seed_from_u64(8));
        let (x, y) = center(1, 1);
        state.click(x, y);
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn test_click_outside_board_is_noop() {
        let mut state = state_2x2(10);
        let before = state.target_color();
        state.click(500, 500);
        state.click(0, 10);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.target_color(), before);
        assert!(state.queue.is_empty());
    }

    #[test]
    fn test_uniform_board_wins_in_one_click() {
        let board = Board::from_colors(2, CELL_SIZE, &[Red, Red, Red, Red]);
        let mut state = GameState::with_board(board, 2);
        let (x, y) = center(0, 0);
        state.click(x, y);
        assert!(state.is_won());
        assert_eq!(state.move_count(), 1);
        assert!(state.board.all_flooded());
    }

    #[test]
    fn test_four_click_walkthrough() {
        let mut state = state_2x2(10);
        let (x, y) = center(0, 0);
        state.click(x, y); // origin's own colour: empty delta, move still spent
        assert_eq!(state.move_count(), 1);
        assert!(state.queue.is_empty());
        let (x, y) = center(0, 1);
        state.click(x, y);
        assert_eq!(state.target_color(), Blue);
        assert!(state.board.cell(1).flooded);
        let (x, y) = center(1, 0);
        state.click(x, y);
        assert_eq!(state.target_color(), Green);
        let (x, y) = center(1, 1);
        state.click(x, y);
        assert_eq!(state.move_count(), 4);
        assert!(state.is_won());
        assert!(state.board.all_flooded());
        assert!(state.board.all_cells().all(|(_, c)| c.color == Magenta));
    }

    #[test]
    fn test_zero_budget_loses_on_first_miss() {
        let mut state = state_2x2(0);
        let (x, y) = center(0, 1);
        state.click(x, y);
        assert!(state.is_lost());
        assert_eq!(state.move_count(), 1);
        // Lost is sticky: further clicks change nothing.
        let (x, y) = center(1, 1);
        state.click(x, y);
        assert!(state.is_lost());
        assert_eq!(state.move_count(), 1);
        state.reset();
        assert!(!state.is_lost());
        assert_eq!(state.phase, Phase::StartScreen);
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn test_win_on_final_allowed_move() {
        let mut state = state_2x2(3);
        for (row, col) in [(0, 1), (1, 0), (1, 1)] {
            let (x, y) = center(row, col);
            state.click(x, y);
        }
        assert_eq!(state.move_count(), 3);
        assert!(state.is_won());
    }

    #[test]
    fn test_tick_reveals_one_cell_per_tick() {
        let mut state = state_2x2(10);
        let (x, y) = center(0, 1);
        state.click(x, y);
        assert_eq!(state.queue.len(), 1);
        state.tick();
        assert_eq!(state.animation_step(), Some((0, 1)));
        assert!(state.queue.is_empty());
        state.tick();
        assert_eq!(state.animation_step(), None);
    }

    #[test]
    fn test_reset_produces_fresh_board() {
        let mut state = GameState::new(6, CELL_SIZE, StdRng::seed_from_u64(9));
        state.start();
        state.tick();
        let (x, y) = center(0, 1);
        state.click(x, y);
        state.reset();
        assert_eq!(state.phase, Phase::StartScreen);
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.board.size(), 6);
        let flooded: Vec<CellId> = state
            .board
            .all_cells()
            .filter(|(_, c)| c.flooded)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(flooded, vec![0]);
        assert_eq!(state.target_color(), state.board.cell(0).color);
        // The origin is queued for the opening reveal.
        assert_eq!(state.queue.len(), 1);
        assert!(state.queue.is_pending(0));
    }
}
