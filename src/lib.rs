//! Showroom drives an interactive 3D product showcase.
//!
//! A session loads a configuration schema and the model assets, plays a cinematic intro and then
//! hands the user a palette that recolors and reshapes parts of the product:
//!
//! - Create a [`DemoSession`] with the host's [`Collaborators`]
//! - Call [`DemoSession::tick`] once per display refresh and [`DemoSession::resize`] on resize
//! - Forward the start/skip controls and palette clicks
#![forbid(unsafe_code)]

mod foundation;

pub mod anim_ease;
pub mod anim_fade;
pub mod collab;
pub mod color;
pub mod config;
pub mod headless;
pub mod lifecycle;
pub mod loader;
pub mod palette;
pub mod profiler;
pub mod schema;

pub use crate::foundation::core::{Fps, FrameIndex, Viewport};
pub use crate::foundation::error::{ShowroomError, ShowroomResult};

pub use crate::anim_ease::Ease;
pub use crate::anim_fade::Timelines;
pub use crate::collab::{
    AssetLoader, CameraKind, CameraRig, CameraUpdate, Display, Element, FadeId, Fader, Hud,
    LoadEvent, Renderer, SceneEntities,
};
pub use crate::color::{ColorToken, Rgba8};
pub use crate::config::SessionConfig;
pub use crate::lifecycle::{CinematicExit, Collaborators, DemoSession, LifecycleState, Transition};
pub use crate::loader::FsLoader;
pub use crate::palette::{
    ConfiguratorPalette, OptionPanel, PaletteLayout, PaletteState, Swatch, SwatchAction,
    SwatchFace, Tab, TabDef,
};
pub use crate::profiler::FrameProfiler;
pub use crate::schema::{CascadeLink, Category, CategoryKind, ConfigurationSchema, OptionDef, SchemaStore};
