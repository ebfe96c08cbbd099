//! Frame-gated melee swings (windup → active window → recovery).
//!
//! # Architecture
//!
//! Animation playback is host-side presentation; the simulation owns an
//! explicit frame clock per swing instead of listening for
//! animation-complete callbacks. A swing is a `SwingState` component added
//! when the attack starts and removed when its last frame elapses — every
//! entry has a matching exit, no dangling "busy" flags.
//!
//! Frames are 1-based to match the authored animation sheets (frame 1 is
//! the first frame of the swing).

use bevy::prelude::*;

use crate::combat::events::AttackKind;
use crate::components::Dead;

/// Static definition of one attack variant.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SwingSpec {
    /// Seconds per animation frame
    pub frame_duration: f32,
    /// Total frames in the swing
    pub total_frames: u32,
    /// First damaging frame (inclusive, 1-based)
    pub active_from: u32,
    /// Last damaging frame (inclusive)
    pub active_to: u32,
    pub damage: u32,
    /// Reach (world units)
    pub range: f32,
    /// |Δy| tolerance for a hit
    pub vertical_tolerance: f32,
    /// Cooldown from swing start until the next swing may begin
    pub cooldown: f32,
}

impl SwingSpec {
    pub fn duration(&self) -> f32 {
        self.total_frames as f32 * self.frame_duration
    }
}

/// An in-progress swing. Presence of this component == "attacking";
/// facing stays frozen while it exists.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SwingState {
    pub kind: AttackKind,
    pub spec: SwingSpec,
    pub elapsed: f32,
    /// Hit ledger: targets already damaged by THIS swing instance.
    /// Cleared by construction — a fresh swing starts with an empty ledger.
    pub hit_targets: Vec<Entity>,
}

impl SwingState {
    pub fn new(kind: AttackKind, spec: SwingSpec) -> Self {
        Self {
            kind,
            spec,
            elapsed: 0.0,
            hit_targets: Vec::new(),
        }
    }

    /// Current 1-based frame index.
    pub fn current_frame(&self) -> u32 {
        (self.elapsed / self.spec.frame_duration) as u32 + 1
    }

    /// Is the damaging window open this tick?
    pub fn in_active_window(&self) -> bool {
        let frame = self.current_frame();
        frame >= self.spec.active_from && frame <= self.spec.active_to
    }

    pub fn is_windup(&self) -> bool {
        self.current_frame() < self.spec.active_from
    }

    pub fn is_recovery(&self) -> bool {
        self.current_frame() > self.spec.active_to
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.spec.duration()
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit_targets.contains(&target)
    }

    pub fn register_hit(&mut self, target: Entity) {
        self.hit_targets.push(target);
    }
}

/// Cooldown gate between swings.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct SwingCooldown {
    pub remaining: f32,
}

impl SwingCooldown {
    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn arm(&mut self, secs: f32) {
        self.remaining = secs;
    }
}

/// System: tick swing cooldowns.
pub fn tick_swing_cooldowns(mut cooldowns: Query<&mut SwingCooldown>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut cooldown in cooldowns.iter_mut() {
        if cooldown.remaining > 0.0 {
            cooldown.remaining -= delta;
        }
    }
}

/// System: advance swing frame clocks, remove finished swings.
///
/// Runs after decisions and before the arbiter, so the arbiter always sees
/// the frame the swing is on THIS tick. Removal restores Idle — the hit
/// window can never outlive the swing.
pub fn update_swings(
    mut commands: Commands,
    mut swings: Query<(Entity, &mut SwingState), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut swing) in swings.iter_mut() {
        swing.elapsed += delta;
        if swing.finished() {
            commands.entity(entity).remove::<SwingState>();
        }
    }
}
