//! Board: cell arena, neighbour links, pixel hit test, flood propagation.

use rand::Rng;

/// Side of a board cell in the virtual pixel space used for click mapping.
pub const CELL_SIZE: u16 = 20;

/// Default board side length in cells.
pub const BOARD_SIZE: u16 = 22;

/// Stable row-major index of a cell in the board arena.
pub type CellId = usize;

/// The six board colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    Blue,
    Red,
    Green,
    Yellow,
    Orange,
    Magenta,
}

impl CellColor {
    pub const ALL: [Self; 6] = [
        Self::Blue,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Orange,
        Self::Magenta,
    ];

    /// Colour index 0..6 for theme.cell_color().
    pub fn color_index(self) -> u8 {
        match self {
            Self::Blue => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Orange => 4,
            Self::Magenta => 5,
        }
    }
}

/// Single square of the game area. Neighbour links are indices into the
/// owning board's arena, `None` past an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub color: CellColor,
    pub flooded: bool,
    pub up: Option<CellId>,
    pub down: Option<CellId>,
    pub left: Option<CellId>,
    pub right: Option<CellId>,
}

impl Cell {
    /// The four neighbour links in up/down/left/right order.
    pub fn neighbors(&self) -> [Option<CellId>; 4] {
        [self.up, self.down, self.left, self.right]
    }
}

/// N×N board of cells, stored row-major. The origin (index 0) starts
/// flooded; its colour is the initial flood colour.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cell_size: u16,
    cells: Vec<Cell>,
}

impl Board {
    /// New board with colours drawn uniformly from the palette.
    pub fn new(size: usize, cell_size: u16, rng: &mut impl Rng) -> Self {
        Self::build(size, cell_size, |_| {
            CellColor::ALL[rng.gen_range(0..CellColor::ALL.len())]
        })
    }

    #[cfg(test)]
    pub(crate) fn from_colors(size: usize, cell_size: u16, colors: &[CellColor]) -> Self {
        assert_eq!(colors.len(), size * size);
        Self::build(size, cell_size, |id| colors[id])
    }

    fn build(size: usize, cell_size: u16, mut color_at: impl FnMut(CellId) -> CellColor) -> Self {
        assert!(size > 0 && cell_size > 0);
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let id = row * size + col;
                cells.push(Cell {
                    color: color_at(id),
                    flooded: false,
                    up: (row > 0).then(|| id - size),
                    down: (row + 1 < size).then(|| id + size),
                    left: (col > 0).then(|| id - 1),
                    right: (col + 1 < size).then(|| id + 1),
                });
            }
        }
        cells[0].flooded = true;
        Self { size, cell_size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn cell_size(&self) -> u16 {
        self.cell_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    /// (row, col) of a cell index.
    #[inline]
    pub fn pos(&self, id: CellId) -> (usize, usize) {
        (id / self.size, id % self.size)
    }

    /// All cells in row-major order. Restartable.
    pub fn all_cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate()
    }

    /// Cell whose pixel bounds contain the point. Left/top edges are
    /// exclusive, right/bottom inclusive.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellId> {
        if x <= 0 || y <= 0 {
            return None;
        }
        let cs = i32::from(self.cell_size);
        let col = (x - 1) / cs;
        let row = (y - 1) / cs;
        if col >= self.size as i32 || row >= self.size as i32 {
            return None;
        }
        Some(row as usize * self.size + col as usize)
    }

    pub fn all_flooded(&self) -> bool {
        self.cells.iter().all(|c| c.flooded)
    }

    /// Grow the flood region to the given colour until stable. A pass scans
    /// every cell; a cell joins the region when it matches the target and
    /// touches a flooded neighbour. Passes repeat until one changes nothing,
    /// so chains running against scan order still flood fully in one call.
    /// Returns the newly flooded cells in discovery order.
    pub fn flood(&mut self, target: CellColor) -> Vec<CellId> {
        // Repaint the existing region first so colour and flooded agree
        // while the frontier grows.
        for cell in &mut self.cells {
            if cell.flooded {
                cell.color = target;
            }
        }
        let mut delta = Vec::new();
        loop {
            let mut changed = false;
            for id in 0..self.cells.len() {
                let cell = self.cells[id];
                if cell.flooded || cell.color != target {
                    continue;
                }
                let touches_region = cell
                    .neighbors()
                    .iter()
                    .flatten()
                    .any(|&n| self.cells[n].flooded);
                if touches_region {
                    self.cells[id].flooded = true;
                    delta.push(id);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        delta
    }
}
