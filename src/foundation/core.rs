use crate::foundation::error::{ShowroomError, ShowroomResult};

/// Absolute 0-based index of a render-loop tick.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Index of the following tick.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ShowroomResult<Self> {
        if den == 0 {
            return Err(ShowroomError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ShowroomError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Convert milliseconds to frame count using ceil semantics.
    pub fn ms_to_frames_ceil(self, ms: f64) -> u64 {
        (ms * f64::from(self.num) / (1000.0 * f64::from(self.den)))
            .ceil()
            .max(0.0) as u64
    }
}

/// Output viewport dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> ShowroomResult<Self> {
        if width == 0 || height == 0 {
            return Err(ShowroomError::validation("viewport width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Width over height, as used for camera projections.
    ///
    /// A zero height yields the width itself so a minimized window never divides by zero.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
