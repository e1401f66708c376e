//! Data-driven game balance
//!
//! Every number the simulation reads lives in [`Tuning`]. A tuning record is
//! validated once, before a round is built, and is immutable afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts;

/// Immutable simulation parameters
///
/// Units are screen pixels and ticks. Defaults reproduce the classic
/// 400x600 layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Target tick rate of the outer loop (ticks per second)
    pub tick_rate: u32,
    /// Simulation step, in ticks (1.0 = one tick)
    pub dt: f32,

    // === Actor ===
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    /// Downward acceleration per tick²
    pub gravity: f32,
    /// Upward speed set by a jump
    pub jump_speed: f32,
    /// Ticks per animation frame
    pub animation_threshold: u32,
    pub animation_frames: u32,

    // === World ===
    /// Horizontal scroll per tick for ground and obstacles
    pub scroll_speed: f32,
    pub ground_height: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    /// Vertical clearance between the halves of a pair
    pub gap: f32,
    /// Horizontal distance between consecutive pairs
    pub horizontal_spacing: f32,
    /// Inclusive range of the randomized split height
    pub split_min: u32,
    pub split_max: u32,
    /// Height of the wider lip at the gap end of each obstacle
    pub lip_height: f32,
    /// How far the body is inset from the lip on each side
    pub body_inset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: consts::SCREEN_WIDTH,
            screen_height: consts::SCREEN_HEIGHT,
            tick_rate: consts::TICK_RATE,
            dt: 1.0,

            spawn_x: 67.0,
            spawn_y: consts::SCREEN_HEIGHT / 2.0,
            actor_width: 34.0,
            actor_height: 24.0,
            gravity: 0.5,
            jump_speed: 8.0,
            animation_threshold: 3,
            animation_frames: 3,

            scroll_speed: 5.0,
            ground_height: 100.0,

            obstacle_width: 80.0,
            obstacle_height: 500.0,
            gap: 150.0,
            horizontal_spacing: 300.0,
            split_min: 100,
            split_max: 300,
            lip_height: 37.0,
            body_inset: 3.0,
        }
    }
}

impl Tuning {
    /// Ground segments are twice the screen width
    #[inline]
    pub fn ground_width(&self) -> f32 {
        2.0 * self.screen_width
    }

    /// X of the first obstacle pair of a round
    #[inline]
    pub fn first_pair_x(&self) -> f32 {
        self.screen_width * 1.5
    }

    /// Top edge of the ground strip
    #[inline]
    pub fn ground_top(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// World displacement per tick
    #[inline]
    pub fn scroll_step(&self) -> f32 {
        self.scroll_speed * self.dt
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("dt", self.dt),
            ("spawn_x", self.spawn_x),
            ("spawn_y", self.spawn_y),
            ("actor_width", self.actor_width),
            ("actor_height", self.actor_height),
            ("gravity", self.gravity),
            ("jump_speed", self.jump_speed),
            ("scroll_speed", self.scroll_speed),
            ("ground_height", self.ground_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("gap", self.gap),
            ("horizontal_spacing", self.horizontal_spacing),
            ("lip_height", self.lip_height),
            ("body_inset", self.body_inset),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field });
            }
        }

        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("dt", self.dt),
            ("actor_width", self.actor_width),
            ("actor_height", self.actor_height),
            ("ground_height", self.ground_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("gap", self.gap),
            ("horizontal_spacing", self.horizontal_spacing),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if self.tick_rate == 0 {
            return Err(TuningError::ZeroTickRate);
        }
        if self.animation_frames == 0 || self.animation_threshold == 0 {
            return Err(TuningError::ZeroAnimation);
        }
        // The world has to move, but never jump a whole pair or ground tile per tick
        let step = self.scroll_step();
        let max_step = self.horizontal_spacing.min(self.ground_width());
        if !(step > 0.0 && step < max_step) {
            return Err(TuningError::ScrollStepOutOfRange { step, max: max_step });
        }
        let non_negative = [
            ("lip_height", self.lip_height),
            ("body_inset", self.body_inset),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }
        if self.body_inset * 2.0 >= self.obstacle_width {
            return Err(TuningError::NonPositive {
                field: "obstacle body width",
                value: self.obstacle_width - self.body_inset * 2.0,
            });
        }

        if self.split_min == 0 || self.split_min > self.split_max {
            return Err(TuningError::EmptySplitRange {
                min: self.split_min,
                max: self.split_max,
            });
        }
        let tallest_opening = self.split_max as f32 + self.gap;
        if tallest_opening > self.screen_height {
            return Err(TuningError::SplitExceedsScreen {
                max: self.split_max,
                gap: self.gap,
                screen_height: self.screen_height,
            });
        }
        // The upper half must still reach the top of the screen at the lowest split
        let upper_reach = self.screen_height - self.split_min as f32 - self.gap;
        if self.obstacle_height < upper_reach {
            return Err(TuningError::ObstacleTooShort {
                height: self.obstacle_height,
                needed: upper_reach,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        tuning.validate().map_err(ConfigError::Invalid)?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}

/// A tuning record that would break the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    NonFinite { field: &'static str },
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    ZeroTickRate,
    ZeroAnimation,
    /// Per-tick scroll (`scroll_speed * dt`) outside `(0, max)`
    ScrollStepOutOfRange { step: f32, max: f32 },
    EmptySplitRange { min: u32, max: u32 },
    SplitExceedsScreen { max: u32, gap: f32, screen_height: f32 },
    ObstacleTooShort { height: f32, needed: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NonFinite { field } => write!(f, "{field} must be finite"),
            TuningError::NonPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            TuningError::Negative { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            TuningError::ZeroTickRate => write!(f, "tick_rate must be at least 1"),
            TuningError::ZeroAnimation => {
                write!(f, "animation_frames and animation_threshold must be at least 1")
            }
            TuningError::ScrollStepOutOfRange { step, max } => write!(
                f,
                "scroll per tick must be above 0 and below {max} (got {step})"
            ),
            TuningError::EmptySplitRange { min, max } => {
                write!(f, "split range [{min}, {max}] is empty or starts at zero")
            }
            TuningError::SplitExceedsScreen {
                max,
                gap,
                screen_height,
            } => write!(
                f,
                "split_max {max} plus gap {gap} does not fit a screen of height {screen_height}"
            ),
            TuningError::ObstacleTooShort { height, needed } => write!(
                f,
                "obstacle_height {height} cannot reach the screen edge (needs {needed})"
            ),
        }
    }
}

impl std::error::Error for TuningError {}

/// Failure to obtain a configuration document
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(TuningError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "malformed config: {e}"),
            ConfigError::Invalid(e) => write!(f, "invalid tuning: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(e) => Some(e),
        }
    }
}

impl From<TuningError> for ConfigError {
    fn from(e: TuningError) -> Self {
        ConfigError::Invalid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert_eq!(tuning.validate(), Ok(()));
        assert_eq!(tuning.ground_width(), 800.0);
        assert_eq!(tuning.first_pair_x(), 600.0);
        assert_eq!(tuning.ground_top(), 500.0);
    }

    #[test]
    fn test_rejects_bad_gap_and_spacing() {
        let tuning = Tuning {
            gap: -10.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive { field: "gap", .. })
        ));

        let tuning = Tuning {
            horizontal_spacing: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive {
                field: "horizontal_spacing",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_degenerate_split_range() {
        let tuning = Tuning {
            split_min: 300,
            split_max: 100,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::EmptySplitRange { min: 300, max: 100 })
        );

        let tuning = Tuning {
            split_max: 500,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SplitExceedsScreen { .. })
        ));
    }

    #[test]
    fn test_scroll_step_bounds() {
        let stalled = Tuning {
            scroll_speed: 0.0,
            ..Default::default()
        };
        assert_eq!(
            stalled.validate(),
            Err(TuningError::ScrollStepOutOfRange {
                step: 0.0,
                max: 300.0
            })
        );

        // Faster than one pair per tick leaves nothing on screen
        let racing = Tuning {
            scroll_speed: 900.0,
            ..Default::default()
        };
        assert!(matches!(
            racing.validate(),
            Err(TuningError::ScrollStepOutOfRange { .. })
        ));

        // The bound applies to the per-tick step, so dt counts too
        let coarse = Tuning {
            scroll_speed: 200.0,
            dt: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            coarse.validate(),
            Err(TuningError::ScrollStepOutOfRange { step, .. }) if step == 400.0
        ));

        let brisk = Tuning {
            scroll_speed: 299.0,
            ..Default::default()
        };
        assert_eq!(brisk.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_finite() {
        let tuning = Tuning {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NonFinite { field: "gravity" })
        );
    }

    #[test]
    fn test_rejects_short_obstacles() {
        let tuning = Tuning {
            obstacle_height: 200.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ObstacleTooShort { .. })
        ));
    }

    #[test]
    fn test_json_partial_override() {
        let tuning = Tuning::from_json_str(r#"{ "gravity": 0.25, "gap": 180.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.25);
        assert_eq!(tuning.gap, 180.0);
        assert_eq!(tuning.horizontal_spacing, 300.0);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = Tuning::from_json_str(r#"{ "tick_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(TuningError::ZeroTickRate)));

        let err = Tuning::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("not/here.json"));
    }
}
