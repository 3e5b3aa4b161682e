//! Contracts for the collaborators the lifecycle controller sequences.
//!
//! Everything behind these traits (rendering, camera paths, DOM-like surfaces, asset decoding)
//! is owned by the host application. The controller only decides *when* to call them.

use std::path::Path;

use crate::color::ColorToken;
use crate::foundation::core::Viewport;
use crate::schema::ConfigurationSchema;

/// One completion report from the loading system.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    /// An item finished loading; `item` is its display name.
    Progress {
        item: String,
        loaded: usize,
        total: usize,
    },
    /// The configuration schema was fetched and decoded.
    SchemaReady(ConfigurationSchema),
    /// An item could not be fetched or decoded. Fatal.
    Failed { item: String },
    /// Every required asset resolved.
    Completed,
}

/// Asynchronous schema/asset fetch, polled once per tick.
pub trait AssetLoader {
    /// Start fetching the schema at `schema_path` and the asset set. Called once.
    fn begin(&mut self, schema_path: &Path);
    /// Drain events that completed since the previous poll, in completion order.
    fn poll(&mut self) -> Vec<LoadEvent>;
}

/// Output surface and per-frame draw call.
pub trait Renderer {
    fn set_size(&mut self, viewport: Viewport);
    /// Draw the scene through `camera`.
    fn draw(&mut self, camera: CameraKind);
}

/// Per-part material/geometry swapping on the loaded model.
pub trait SceneEntities {
    fn set_entity_color(&mut self, target: &str, color: &ColorToken);
    fn set_entity_visible(&mut self, target: &str);
}

/// The two cameras a session switches between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraKind {
    /// Camera driven by the scripted intro path.
    Cinematic,
    /// User-controlled orbit camera.
    FreeLook,
}

/// Result of advancing the camera controller by one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CameraUpdate {
    /// The cinematic path reached its end during this update.
    pub cinematic_completed: bool,
}

/// Cinematic path playback and projection management.
pub trait CameraRig {
    fn start_cinematic(&mut self);
    fn stop_cinematic(&mut self);
    /// Recompute the *active* camera's projection.
    fn set_aspect(&mut self, aspect: f64);
    fn active_camera(&self) -> CameraKind;
    fn set_active_camera(&mut self, camera: CameraKind);
    /// Advance the controller's own animation clock.
    fn update(&mut self, dt_ms: f64) -> CameraUpdate;
}

/// UI surfaces the controller fades, rewrites and removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Preloader,
    WelcomeScreen,
    /// Full-screen mask hiding the camera switch.
    ScreenMask,
    AmbientTrack,
}

/// CSS-like display mode applied when an element fades in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    Block,
    Flex,
}

/// Handle to a started fade timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FadeId(pub u64);

/// Opacity and volume timelines.
///
/// Each call starts an independent timeline; [`Fader::advance`] reports every timeline that
/// ended during that step exactly once.
pub trait Fader {
    fn fade_in(&mut self, element: Element, duration_ms: u32, display: Display) -> FadeId;
    fn fade_out(&mut self, element: Element, duration_ms: u32) -> FadeId;
    fn fade_audio_in(&mut self, track: Element, duration_ms: u32, max_volume: f64) -> FadeId;
    fn fade_audio_out(&mut self, track: Element, duration_ms: u32) -> FadeId;
    /// Step every running timeline by `dt_ms` and return the ones that completed.
    fn advance(&mut self, dt_ms: f64) -> Vec<FadeId>;
}

/// Text and lifetime of the preloader/welcome surfaces.
pub trait Hud {
    /// Show the name of the most recently loaded item.
    fn set_progress_item(&mut self, item: &str);
    /// Replace the preloader with the static error surface naming `item`.
    fn show_load_error(&mut self, item: &str);
    /// Swap the preloader to its ready text and reveal the start control.
    fn show_ready(&mut self, title: &str, description: &str);
    fn remove(&mut self, element: Element);
}
