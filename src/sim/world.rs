//! Chunked tile world
//!
//! The world is an unbounded grid of fixed-size chunks, generated the first
//! time the player comes near them. Anything not generated yet reads as wall
//! so neither the mover nor the ray caster can slip into unexplored space.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CHUNK_HEIGHT, CHUNK_WIDTH};

/// Local cell that generated chunks always leave open
pub const ANCHOR_CELL: (usize, usize) = (1, 1);

/// A single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Open,
    Wall,
}

/// Integer chunk coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const ORIGIN: ChunkCoord = ChunkCoord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world-space point (`None` for non-finite input)
    pub fn containing(pos: Vec2) -> Option<Self> {
        if !pos.is_finite() {
            return None;
        }
        Some(Self {
            x: (pos.x / CHUNK_WIDTH as f32).floor() as i32,
            y: (pos.y / CHUNK_HEIGHT as f32).floor() as i32,
        })
    }

    /// World position of the chunk's top-left corner
    pub fn origin(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 * CHUNK_WIDTH as f32,
            self.y as f32 * CHUNK_HEIGHT as f32,
        )
    }

    /// World position of the centre of a local cell
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        self.origin() + Vec2::new(col as f32 + 0.5, row as f32 + 0.5)
    }

    /// This chunk and its eight neighbours
    ///
    /// Neighbours past the edge of the `i32` coordinate range are skipped.
    pub fn neighborhood(self) -> impl Iterator<Item = ChunkCoord> {
        let Self { x, y } = self;
        (-1..=1).flat_map(move |dy| {
            (-1..=1).filter_map(move |dx| Some(ChunkCoord::new(x.checked_add(dx)?, y.checked_add(dy)?)))
        })
    }

    /// Whether any part of the chunk lies in negative world space
    pub fn is_negative(&self) -> bool {
        self.x < 0 || self.y < 0
    }
}

/// Fixed-size block of cells, immutable once generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    cells: [[Cell; CHUNK_WIDTH]; CHUNK_HEIGHT],
}

impl Chunk {
    pub fn from_cells(cells: [[Cell; CHUNK_WIDTH]; CHUNK_HEIGHT]) -> Self {
        Self { cells }
    }

    /// Cell at a local index; out-of-range reads as wall
    pub fn cell(&self, col: usize, row: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::Wall)
    }

    pub fn is_wall(&self, col: usize, row: usize) -> bool {
        self.cell(col, row) == Cell::Wall
    }

    pub fn rows(&self) -> &[[Cell; CHUNK_WIDTH]; CHUNK_HEIGHT] {
        &self.cells
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c == Cell::Wall).count()
    }

    /// Open cells not on the chunk's outer ring
    pub fn open_interior_cells(&self) -> Vec<(usize, usize)> {
        (1..CHUNK_HEIGHT - 1)
            .flat_map(|row| (1..CHUNK_WIDTH - 1).map(move |col| (col, row)))
            .filter(|&(col, row)| !self.is_wall(col, row))
            .collect()
    }
}

/// Generate a random chunk
///
/// Each cell is a wall with `wall_probability`, except [`ANCHOR_CELL`].
/// Rows that come out fully walled get one random cell reopened.
pub fn generate_chunk<R: Rng + ?Sized>(rng: &mut R, wall_probability: f64) -> Chunk {
    let p = wall_probability.clamp(0.0, 1.0);
    let mut cells = [[Cell::Open; CHUNK_WIDTH]; CHUNK_HEIGHT];

    for (row, line) in cells.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            if (col, row) == ANCHOR_CELL {
                continue;
            }
            if rng.random_bool(p) {
                *cell = Cell::Wall;
            }
        }
    }

    for line in cells.iter_mut() {
        if line.iter().all(|c| *c == Cell::Wall) {
            let col = rng.random_range(0..CHUNK_WIDTH);
            line[col] = Cell::Open;
        }
    }

    Chunk { cells }
}

/// The fixed chunk at the origin
///
/// Open border all round with a mirrored block pattern inside, so the
/// spawn point at (1.5, 1.5) is always open and can walk out of the chunk.
pub fn spawn_chunk() -> Chunk {
    const LAYOUT: [[u8; CHUNK_WIDTH]; CHUNK_HEIGHT] = [
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 1, 1, 0, 0, 0],
        [0, 0, 1, 0, 0, 1, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 1, 0, 0, 1, 0, 0],
        [0, 0, 0, 1, 1, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0],
    ];

    let mut cells = [[Cell::Open; CHUNK_WIDTH]; CHUNK_HEIGHT];
    for (row, line) in LAYOUT.iter().enumerate() {
        for (col, &v) in line.iter().enumerate() {
            if v == 1 {
                cells[row][col] = Cell::Wall;
            }
        }
    }
    Chunk { cells }
}

/// Sparse chunk store
#[derive(Debug, Clone, Default)]
pub struct World {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Insert a chunk directly (used for hand-built layouts)
    pub fn insert(&mut self, coord: ChunkCoord, chunk: Chunk) {
        self.chunks.insert(coord, chunk);
    }

    /// Drop every chunk
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Whether the cell under a world point is a wall
    ///
    /// Ungenerated chunks and non-finite coordinates read as wall.
    pub fn wall_at(&self, pos: Vec2) -> bool {
        let Some(coord) = ChunkCoord::containing(pos) else {
            return true;
        };
        let Some(chunk) = self.chunks.get(&coord) else {
            return true;
        };
        let (col, row) = local_cell(pos, coord);
        chunk.is_wall(col, row)
    }

    /// Generate any missing chunk around `pos`
    ///
    /// Returns the coordinates generated by this call, in neighbourhood order,
    /// so the caller can populate them.
    pub fn ensure_neighborhood<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        rng: &mut R,
        wall_probability: f64,
    ) -> Vec<ChunkCoord> {
        let Some(center) = ChunkCoord::containing(pos) else {
            return Vec::new();
        };

        let mut generated = Vec::new();
        for coord in center.neighborhood() {
            if self.chunks.contains_key(&coord) {
                continue;
            }
            let chunk = if coord == ChunkCoord::ORIGIN {
                spawn_chunk()
            } else {
                generate_chunk(rng, wall_probability)
            };
            log::debug!(
                "Generated chunk ({}, {}) with {} walls",
                coord.x,
                coord.y,
                chunk.wall_count()
            );
            self.chunks.insert(coord, chunk);
            generated.push(coord);
        }
        generated
    }
}

/// Local cell index of a world point inside `coord`, clamped to the grid
fn local_cell(pos: Vec2, coord: ChunkCoord) -> (usize, usize) {
    let col = pos.x.floor() as i64 - coord.x as i64 * CHUNK_WIDTH as i64;
    let row = pos.y.floor() as i64 - coord.y as i64 * CHUNK_HEIGHT as i64;
    (
        col.clamp(0, CHUNK_WIDTH as i64 - 1) as usize,
        row.clamp(0, CHUNK_HEIGHT as i64 - 1) as usize,
    )
}
