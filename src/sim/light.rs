//! Battery lantern
//!
//! Off, or on in one of three modes. On drains the battery at the mode's
//! rate, off recharges it, and an empty battery switches the light off.

use serde::{Deserialize, Serialize};

/// Beam shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightMode {
    #[default]
    Standard,
    Focused,
    Wide,
}

impl LightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightMode::Standard => "Standard",
            LightMode::Focused => "Focused",
            LightMode::Wide => "Wide",
        }
    }

    /// Lit radius in world units
    pub fn radius(&self) -> f32 {
        match self {
            LightMode::Standard => 5.0,
            LightMode::Focused => 8.0,
            LightMode::Wide => 3.5,
        }
    }

    /// Battery drain relative to the base rate
    pub fn drain_multiplier(&self) -> f32 {
        match self {
            LightMode::Standard => 1.0,
            LightMode::Focused => 1.5,
            LightMode::Wide => 2.0,
        }
    }

    /// Next mode in the cycle
    pub fn next(&self) -> Self {
        match self {
            LightMode::Standard => LightMode::Focused,
            LightMode::Focused => LightMode::Wide,
            LightMode::Wide => LightMode::Standard,
        }
    }
}

/// Radius scale with no darkness applied
pub const DEFAULT_RADIUS_SCALE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    pub battery: f32,
    pub max_battery: f32,
    pub drain_rate: f32,
    pub recharge_rate: f32,
    pub mode: LightMode,
    pub on: bool,
    /// Multiplier on the mode radius (darkness lowers it)
    pub radius_scale: f32,
}

impl LightState {
    pub fn new(max_battery: f32, drain_rate: f32, recharge_rate: f32) -> Self {
        Self {
            battery: max_battery,
            max_battery,
            drain_rate,
            recharge_rate,
            mode: LightMode::Standard,
            on: false,
            radius_scale: DEFAULT_RADIUS_SCALE,
        }
    }

    /// Advance the battery by one tick
    pub fn tick(&mut self) {
        if self.on {
            self.battery -= self.drain_rate * self.mode.drain_multiplier();
        } else {
            self.battery += self.recharge_rate;
        }
        self.battery = self.battery.clamp(0.0, self.max_battery);

        if self.on && self.battery <= 0.0 {
            self.on = false;
            log::debug!("Light battery depleted");
        }
    }

    /// Flip the light; an empty battery refuses to switch on
    pub fn toggle(&mut self) -> bool {
        if !self.on && self.battery <= 0.0 {
            return false;
        }
        self.on = !self.on;
        true
    }

    /// Advance to the next mode; only while the light is on
    pub fn cycle_mode(&mut self) -> bool {
        if !self.on {
            return false;
        }
        self.mode = self.mode.next();
        true
    }

    /// Current lit radius, zero when off
    pub fn radius(&self) -> f32 {
        if self.on {
            self.mode.radius() * self.radius_scale
        } else {
            0.0
        }
    }

    /// Battery as a percentage of capacity
    pub fn battery_percent(&self) -> f32 {
        if self.max_battery <= 0.0 {
            return 0.0;
        }
        self.battery / self.max_battery * 100.0
    }
}
