//! State Encoder
//!
//! Turns continuous agent/target geometry into a discrete [`StateKey`]:
//! - distance bucket: `floor(distance / 2)`, clamped to `0..=10`
//! - bearing bucket: signed horizontal angle from the agent's facing to the
//!   target, split into four 90° sectors starting at -180°
//!
//! | bucket | bearing        |
//! |--------|----------------|
//! | 0      | [-180°, -90°)  |
//! | 1      | [-90°, 0°)     |
//! | 2      | [0°, 90°)      |
//! | 3      | [90°, 180°)    |
//!
//! Positive bearings are to the agent's right. +180° wraps onto sector 0.
//! When the agent and target coincide horizontally, or the facing has no
//! horizontal component, the bearing is undefined and sector 0 is used.

use encounter_events::{StateKey, Vec3, BEARING_BUCKETS, MAX_DISTANCE_BUCKET};

/// Length units covered by one distance bucket.
pub const DISTANCE_BUCKET_SIZE: f32 = 2.0;

/// Degrees covered by one bearing sector.
pub const BEARING_SECTOR_DEGREES: f32 = 360.0 / BEARING_BUCKETS as f32;

/// Sector used when the bearing is undefined.
pub const UNDEFINED_BEARING_BUCKET: u8 = 0;

/// Horizontal vectors shorter than this have no usable direction.
pub const DEGENERATE_LENGTH: f32 = 1e-5;

/// Where the agent is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentPose {
    pub position: Vec3,
    /// Forward unit vector
    pub forward: Vec3,
}

impl AgentPose {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    pub fn distance_to(&self, target: Vec3) -> f32 {
        self.position.distance(target)
    }
}

/// Encodes the agent/target relationship as a state key.
pub fn encode_state(agent: &AgentPose, target: Vec3) -> StateKey {
    let relative = target - agent.position;
    let distance = distance_bucket(relative.length());
    let bearing = signed_bearing(agent.forward, relative)
        .map(bearing_bucket)
        .unwrap_or(UNDEFINED_BEARING_BUCKET);

    StateKey { distance, bearing }
}

/// Distance bucket for a distance in length units.
pub fn distance_bucket(distance: f32) -> u8 {
    // NaN survives clamp and then casts to 0
    (distance / DISTANCE_BUCKET_SIZE)
        .floor()
        .clamp(0.0, MAX_DISTANCE_BUCKET as f32) as u8
}

/// `v` projected onto the horizontal (x, z) plane.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Signed angle in degrees, in `[-180, 180]`, from `forward` to `relative`
/// measured in the horizontal plane. `None` if either vector has no
/// horizontal extent.
pub fn signed_bearing(forward: Vec3, relative: Vec3) -> Option<f32> {
    let f = horizontal(forward);
    let r = horizontal(relative);
    if f.length() < DEGENERATE_LENGTH || r.length() < DEGENERATE_LENGTH {
        return None;
    }

    // (f × r).y is positive when r is clockwise from f seen from above
    let sin = f.cross(r).y;
    let cos = f.dot(r);
    Some(sin.atan2(cos).to_degrees())
}

/// Bearing sector for an angle in `[-180, 180]`.
pub fn bearing_bucket(bearing_degrees: f32) -> u8 {
    let sector = ((bearing_degrees + 180.0) / BEARING_SECTOR_DEGREES).floor() as i32;
    sector.rem_euclid(BEARING_BUCKETS as i32) as u8
}
