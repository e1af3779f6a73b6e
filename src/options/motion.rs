use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Motion", inline)]
#[serde(default)]
/// Idle rotation, pointer response, and intro reveal timing.
pub struct MotionOptions {
    /// Idle rotation rate around the vertical axis, radians per second.
    #[schemars(title = "Spin", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub idle_speed_y: f32,
    /// Idle rotation rate around the horizontal axis, radians per second.
    #[schemars(title = "Tumble", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub idle_speed_x: f32,
    /// Maximum pointer-driven tilt in radians at the viewport edge.
    #[schemars(title = "Pointer Tilt", range(min = 0.0, max = 1.5), extend("step" = 0.01))]
    pub tilt: f32,
    /// How far the pointer swings the light away from its base vector.
    #[schemars(title = "Light Follow", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub light_offset: f32,
    /// Duration of the mount reveal tween in seconds.
    #[schemars(skip)]
    pub reveal_secs: f32,
    /// Solid scale at the start of the reveal tween.
    #[schemars(skip)]
    pub reveal_from: f32,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            idle_speed_y: 0.25,
            idle_speed_x: 0.1,
            tilt: 0.35,
            light_offset: 1.0,
            reveal_secs: 1.2,
            reveal_from: 0.6,
        }
    }
}
