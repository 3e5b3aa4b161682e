use crate::foundation::core::FrameIndex;

/// Per-frame statistics advanced by the render loop when the debug profiler is enabled.
#[derive(Clone, Debug, Default)]
pub struct FrameProfiler {
    frames: u64,
    window_ms: f64,
    window_frames: u32,
    fps: Option<f64>,
}

impl FrameProfiler {
    const WINDOW_MS: f64 = 1000.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `dt_ms`.
    pub fn update(&mut self, frame: FrameIndex, dt_ms: f64) {
        self.frames += 1;
        self.window_ms += dt_ms.max(0.0);
        self.window_frames += 1;

        if self.window_ms >= Self::WINDOW_MS {
            let fps = f64::from(self.window_frames) * 1000.0 / self.window_ms;
            self.fps = Some(fps);
            tracing::trace!(frame = frame.0, fps, "profiler window");
            self.window_ms = 0.0;
            self.window_frames = 0;
        }
    }

    /// Frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second over the last complete one-second window.
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
}
