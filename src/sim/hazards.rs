//! Area hazards
//!
//! A hazard sits armed until the player walks into it, then applies its
//! effect once per tick for a fixed number of ticks and goes spent. Trap
//! and darkness restore their stored defaults on expiry; poison damage and
//! slow-zone slowdown are left in place.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::light::{DEFAULT_RADIUS_SCALE, LightState};
use super::player::Player;
use super::world::{Chunk, ChunkCoord};

/// Move speed never drops below this fraction of the base speed
const MIN_SPEED_FRACTION: f32 = 0.1;
/// Light radius never drops below this scale
const MIN_RADIUS_SCALE: f32 = 0.1;

/// Hazard variety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Poison,
    Trap,
    Darkness,
    SlowZone,
}

/// Per-kind tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardProfile {
    /// Ticks of effect before the hazard is spent
    pub max_duration: u32,
    /// Effect strength per tick at severity 1.0
    pub strength: f32,
    /// Whether expiry restores the stored default
    pub reverts: bool,
}

impl HazardKind {
    pub const ALL: [HazardKind; 4] = [
        HazardKind::Poison,
        HazardKind::Trap,
        HazardKind::Darkness,
        HazardKind::SlowZone,
    ];

    pub fn profile(&self) -> HazardProfile {
        match self {
            // Health per tick
            HazardKind::Poison => HazardProfile {
                max_duration: 300,
                strength: 0.05,
                reverts: false,
            },
            // Speed fraction lost per tick
            HazardKind::Trap => HazardProfile {
                max_duration: 120,
                strength: 0.05,
                reverts: true,
            },
            // Light radius fraction lost per tick
            HazardKind::Darkness => HazardProfile {
                max_duration: 600,
                strength: 0.01,
                reverts: true,
            },
            HazardKind::SlowZone => HazardProfile {
                max_duration: 240,
                strength: 0.01,
                reverts: false,
            },
        }
    }

    /// Apply one tick of effect
    fn apply(&self, severity: f32, player: &mut Player, light: &mut LightState) {
        let strength = self.profile().strength * severity;
        match self {
            HazardKind::Poison => player.damage(strength),
            HazardKind::Trap | HazardKind::SlowZone => {
                let floor = player.base_move_speed * MIN_SPEED_FRACTION;
                player.move_speed = (player.move_speed * (1.0 - strength)).max(floor);
            }
            HazardKind::Darkness => {
                light.radius_scale = (light.radius_scale * (1.0 - strength)).max(MIN_RADIUS_SCALE);
            }
        }
    }

    /// Restore the stored default on expiry
    fn revert(&self, player: &mut Player, light: &mut LightState) {
        match self {
            HazardKind::Trap => player.move_speed = player.base_move_speed,
            HazardKind::Darkness => light.radius_scale = DEFAULT_RADIUS_SCALE,
            HazardKind::Poison | HazardKind::SlowZone => {}
        }
    }
}

/// Lifecycle of a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardPhase {
    /// Waiting for the player to step in
    Armed,
    Active,
    /// Expired; never fires again
    Spent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub kind: HazardKind,
    /// Effect multiplier in [0.5, 1.5)
    pub severity: f32,
    /// Ticks since activation
    pub elapsed: u32,
    pub phase: HazardPhase,
}

impl Hazard {
    pub fn new(id: u32, pos: Vec2, kind: HazardKind, severity: f32) -> Self {
        Self {
            id,
            pos,
            kind,
            severity,
            elapsed: 0,
            phase: HazardPhase::Armed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == HazardPhase::Active
    }

    /// Arm -> Active; returns true on the transition
    pub fn activate(&mut self) -> bool {
        if self.phase != HazardPhase::Armed {
            return false;
        }
        self.phase = HazardPhase::Active;
        self.elapsed = 0;
        log::debug!("Hazard {} ({:?}) triggered", self.id, self.kind);
        true
    }

    /// One tick of an active hazard
    ///
    /// The effect is applied on ticks `1..=max_duration`; the tick after
    /// that spends the hazard and runs its revert exactly once.
    pub fn tick(&mut self, player: &mut Player, light: &mut LightState) {
        if !self.is_active() {
            return;
        }
        self.elapsed += 1;
        let profile = self.kind.profile();
        if self.elapsed > profile.max_duration {
            self.phase = HazardPhase::Spent;
            if profile.reverts {
                self.kind.revert(player, light);
            }
            log::debug!("Hazard {} ({:?}) expired", self.id, self.kind);
            return;
        }
        self.kind.apply(self.severity, player, light);
    }
}

/// Every hazard spawned this run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardField {
    hazards: Vec<Hazard>,
    next_id: u32,
}

impl HazardField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter()
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    /// Place a hazard at an exact position
    pub fn place(&mut self, pos: Vec2, kind: HazardKind, severity: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.hazards.push(Hazard::new(id, pos, kind, severity));
        id
    }

    /// Maybe drop a hazard into a newly generated chunk
    ///
    /// The origin chunk and negative chunks never receive one.
    pub fn offer_chunk<R: Rng + ?Sized>(
        &mut self,
        coord: ChunkCoord,
        chunk: &Chunk,
        chance: f64,
        rng: &mut R,
    ) -> Option<u32> {
        if coord == ChunkCoord::ORIGIN || coord.is_negative() {
            return None;
        }
        if !rng.random_bool(chance.clamp(0.0, 1.0)) {
            return None;
        }
        let cells = chunk.open_interior_cells();
        if cells.is_empty() {
            return None;
        }
        let (col, row) = cells[rng.random_range(0..cells.len())];
        let kind = HazardKind::ALL[rng.random_range(0..HazardKind::ALL.len())];
        let severity = rng.random_range(0.5..1.5);
        Some(self.place(coord.cell_center(col, row), kind, severity))
    }

    /// Activate armed hazards within `radius` of `pos`
    pub fn trigger_near(&mut self, pos: Vec2, radius: f32) -> usize {
        self.hazards
            .iter_mut()
            .filter(|h| h.pos.distance(pos) < radius)
            .map(|h| h.activate())
            .filter(|fired| *fired)
            .count()
    }

    /// Tick every active hazard in id order
    pub fn tick(&mut self, player: &mut Player, light: &mut LightState) {
        for hazard in &mut self.hazards {
            hazard.tick(player, light);
        }
    }
}
