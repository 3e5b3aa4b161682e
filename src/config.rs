use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::anim_ease::Ease;
use crate::foundation::core::Viewport;
use crate::foundation::error::{ShowroomError, ShowroomResult};
use crate::palette::PaletteLayout;

/// Session tuning. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub schema_path: PathBuf,
    /// Extra files the loader must fetch, relative to the schema's directory.
    pub assets: Vec<PathBuf>,
    pub preloader_fade_ms: u32,
    pub welcome_fade_ms: u32,
    pub mask_fade_ms: u32,
    pub audio_fade_in_ms: u32,
    pub audio_max_volume: f64,
    pub audio_fade_out_ms: u32,
    /// Curve used by the built-in fade timelines.
    pub fade_ease: Ease,
    pub ready_title: String,
    pub ready_description: String,
    pub debug_profiler: bool,
    /// Explicit tab wiring; `None` builds one tab per schema category.
    pub layout: Option<PaletteLayout>,
    pub initial_viewport: Viewport,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("assets/meta.json"),
            assets: Vec::new(),
            preloader_fade_ms: 900,
            welcome_fade_ms: 900,
            mask_fade_ms: 900,
            audio_fade_in_ms: 2000,
            audio_max_volume: 0.5,
            audio_fade_out_ms: 2000,
            fade_ease: Ease::Linear,
            ready_title: "Automobile Configurator".to_owned(),
            ready_description:
                "A ThreeJS based car configurator. This app is intented for demo purposes only."
                    .to_owned(),
            debug_profiler: true,
            layout: None,
            initial_viewport: Viewport::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> ShowroomResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ShowroomError::serde(format!("parse session config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ShowroomResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShowroomError::validation(format!("open session config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> ShowroomResult<()> {
        if !(0.0..=1.0).contains(&self.audio_max_volume) {
            return Err(ShowroomError::validation(
                "audio_max_volume must be within [0, 1]",
            ));
        }
        if self.initial_viewport.width == 0 || self.initial_viewport.height == 0 {
            return Err(ShowroomError::validation(
                "initial_viewport width/height must be > 0",
            ));
        }
        if let Some(layout) = &self.layout {
            if layout.tabs.is_empty() {
                return Err(ShowroomError::validation("layout must list at least one tab"));
            }
        }
        Ok(())
    }
}
