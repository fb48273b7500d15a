//! Collectible pages
//!
//! Pages are dropped into freshly generated chunks, drawn when the viewer
//! can see them, and picked up by walking close. Collected pages stay in the
//! list so the win count can always be recomputed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::PLAYER_SPAWN;
use super::raycast::line_of_sight;
use super::world::{Chunk, ChunkCoord, World};
use crate::angle_to;

/// A page pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u32,
    pub pos: Vec2,
    /// Opaque image id for the renderer
    pub image: u32,
    pub collected: bool,
}

/// Placement rules for new pages
#[derive(Debug, Clone, Copy)]
pub struct PageSpawnRules {
    pub chance: f64,
    /// Only spawn while fewer than this many pages are uncollected
    pub max_outstanding: usize,
    pub image_count: u32,
    /// Cells whose centre lies within this distance of the spawn point are
    /// never chosen, so nothing is picked up before the first move
    pub pickup_radius: f32,
}

/// Every page spawned this run plus the collection counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSet {
    pages: Vec<Page>,
    collected: u32,
    next_id: u32,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    pub fn outstanding(&self) -> usize {
        self.pages.iter().filter(|p| !p.collected).count()
    }

    /// Place a page at an exact position
    pub fn place(&mut self, pos: Vec2, image: u32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.pages.push(Page {
            id,
            pos,
            image,
            collected: false,
        });
        id
    }

    /// Maybe drop a page into a newly generated chunk
    ///
    /// Rolls `rules.chance` once; the page lands on a random open interior
    /// cell outside pickup range of [`PLAYER_SPAWN`]. Returns the new page's id.
    pub fn offer_chunk<R: Rng + ?Sized>(
        &mut self,
        coord: ChunkCoord,
        chunk: &Chunk,
        rules: &PageSpawnRules,
        rng: &mut R,
    ) -> Option<u32> {
        if coord.is_negative() || self.outstanding() >= rules.max_outstanding {
            return None;
        }
        if !rng.random_bool(rules.chance.clamp(0.0, 1.0)) {
            return None;
        }
        let cells: Vec<(usize, usize)> = chunk
            .open_interior_cells()
            .into_iter()
            .filter(|&(col, row)| coord.cell_center(col, row).distance(PLAYER_SPAWN) >= rules.pickup_radius)
            .collect();
        if cells.is_empty() {
            return None;
        }
        let (col, row) = cells[rng.random_range(0..cells.len())];
        let image = rng.random_range(0..rules.image_count.max(1));
        let id = self.place(coord.cell_center(col, row), image);
        log::debug!("Page {} placed in chunk ({}, {})", id, coord.x, coord.y);
        Some(id)
    }

    /// Collect every uncollected page within `radius` of `viewer`
    ///
    /// Returns how many were picked up by this call.
    pub fn check_collection(&mut self, viewer: Vec2, radius: f32) -> u32 {
        let mut picked = 0;
        for page in self.pages.iter_mut().filter(|p| !p.collected) {
            if page.pos.distance(viewer) < radius {
                page.collected = true;
                picked += 1;
                log::info!("Collected page {}", page.id);
            }
        }
        self.collected += picked;
        picked
    }

    /// Uncollected pages the viewer can currently see
    pub fn visible<'a>(
        &'a self,
        world: &'a World,
        viewer: Vec2,
        heading: f32,
        fov: f32,
        max_distance: f32,
    ) -> impl Iterator<Item = &'a Page> + 'a {
        self.pages
            .iter()
            .filter(move |p| !p.collected && is_visible(world, p.pos, viewer, heading, fov, max_distance))
    }
}

/// Whether `target` is inside the field of view with a clear line of sight
pub fn is_visible(
    world: &World,
    target: Vec2,
    viewer: Vec2,
    heading: f32,
    fov: f32,
    max_distance: f32,
) -> bool {
    in_fov(viewer, heading, fov, target) && line_of_sight(world, viewer, target, max_distance)
}

/// Angular half of the visibility test
pub fn in_fov(viewer: Vec2, heading: f32, fov: f32, target: Vec2) -> bool {
    angle_to(viewer, heading, target).abs() <= fov * 0.5
}
