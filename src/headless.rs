//! Recording collaborators for tests, debugging and the CLI runner.
//!
//! Every collaborator writes into one shared [`Transcript`], so a test can assert on the exact
//! interleaving of renderer, camera, HUD and fade commands a session issued.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::anim_ease::Ease;
use crate::anim_fade::Timelines;
use crate::collab::{
    AssetLoader, CameraKind, CameraRig, CameraUpdate, Display, Element, FadeId, Fader, Hud,
    LoadEvent, Renderer, SceneEntities,
};
use crate::color::ColorToken;
use crate::foundation::core::Viewport;
use crate::lifecycle::{Collaborators, Transition};

/// One recorded collaborator call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SetSize(Viewport),
    EntityColor { target: String, color: ColorToken },
    EntityVisible { entity: String },
    StartCinematic,
    StopCinematic,
    SetAspect { camera: CameraKind, aspect: f64 },
    SetActiveCamera(CameraKind),
    ProgressItem(String),
    LoadError(String),
    Ready { title: String },
    Remove(Element),
    FadeIn(Element, Display),
    FadeOut(Element),
    AudioIn { track: Element, max_volume: f64 },
    AudioOut(Element),
    Transition(Transition),
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetSize(v) => write!(f, "renderer size {}x{}", v.width, v.height),
            Self::EntityColor { target, color } => write!(f, "entity color {target} {color}"),
            Self::EntityVisible { entity } => write!(f, "entity visible {entity}"),
            Self::StartCinematic => f.write_str("camera start cinematic"),
            Self::StopCinematic => f.write_str("camera stop cinematic"),
            Self::SetAspect { camera, aspect } => {
                write!(f, "camera aspect {camera:?} {aspect:.4}")
            }
            Self::SetActiveCamera(camera) => write!(f, "camera active {camera:?}"),
            Self::ProgressItem(item) => write!(f, "hud progress {item}"),
            Self::LoadError(item) => write!(f, "hud load error {item}"),
            Self::Ready { title } => write!(f, "hud ready {title}"),
            Self::Remove(element) => write!(f, "hud remove {element:?}"),
            Self::FadeIn(element, display) => write!(f, "fade in {element:?} {display:?}"),
            Self::FadeOut(element) => write!(f, "fade out {element:?}"),
            Self::AudioIn { track, max_volume } => {
                write!(f, "audio in {track:?} max {max_volume}")
            }
            Self::AudioOut(track) => write!(f, "audio out {track:?}"),
            Self::Transition(t) => write!(f, "lifecycle {:?} -> {:?} @{}", t.from, t.to, t.frame.0),
        }
    }
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<Call>,
    draws: Vec<CameraKind>,
}

/// Shared, append-only record of collaborator calls. Clones share the same record.
#[derive(Clone, Debug, Default)]
pub struct Transcript(Rc<RefCell<Log>>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }

    /// Snapshot of every recorded call except draws.
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    /// Cameras used by each draw call, in frame order.
    pub fn draws(&self) -> Vec<CameraKind> {
        self.0.borrow().draws.clone()
    }

    fn draw(&self, camera: CameraKind) {
        self.0.borrow_mut().draws.push(camera);
    }
}

pub struct HeadlessRenderer {
    transcript: Transcript,
}

impl Renderer for HeadlessRenderer {
    fn set_size(&mut self, viewport: Viewport) {
        self.transcript.push(Call::SetSize(viewport));
    }

    fn draw(&mut self, camera: CameraKind) {
        self.transcript.draw(camera);
    }
}

pub struct HeadlessScene {
    transcript: Transcript,
}

impl SceneEntities for HeadlessScene {
    fn set_entity_color(&mut self, target: &str, color: &ColorToken) {
        self.transcript.push(Call::EntityColor {
            target: target.to_owned(),
            color: color.clone(),
        });
    }

    fn set_entity_visible(&mut self, target: &str) {
        self.transcript.push(Call::EntityVisible {
            entity: target.to_owned(),
        });
    }
}

pub struct HeadlessHud {
    transcript: Transcript,
}

impl Hud for HeadlessHud {
    fn set_progress_item(&mut self, item: &str) {
        self.transcript.push(Call::ProgressItem(item.to_owned()));
    }

    fn show_load_error(&mut self, item: &str) {
        self.transcript.push(Call::LoadError(item.to_owned()));
    }

    fn show_ready(&mut self, title: &str, _description: &str) {
        self.transcript.push(Call::Ready {
            title: title.to_owned(),
        });
    }

    fn remove(&mut self, element: Element) {
        self.transcript.push(Call::Remove(element));
    }
}

/// Camera rig whose cinematic is a fixed-length clock.
pub struct ScriptedCamera {
    transcript: Transcript,
    cinematic_ms: f64,
    elapsed_ms: f64,
    playing: bool,
    active: CameraKind,
}

impl ScriptedCamera {
    pub fn new(transcript: Transcript, cinematic_ms: f64) -> Self {
        Self {
            transcript,
            cinematic_ms,
            elapsed_ms: 0.0,
            playing: false,
            active: CameraKind::Cinematic,
        }
    }
}

impl CameraRig for ScriptedCamera {
    fn start_cinematic(&mut self) {
        self.playing = true;
        self.elapsed_ms = 0.0;
        self.transcript.push(Call::StartCinematic);
    }

    fn stop_cinematic(&mut self) {
        self.playing = false;
        self.transcript.push(Call::StopCinematic);
    }

    fn set_aspect(&mut self, aspect: f64) {
        self.transcript.push(Call::SetAspect {
            camera: self.active,
            aspect,
        });
    }

    fn active_camera(&self) -> CameraKind {
        self.active
    }

    fn set_active_camera(&mut self, camera: CameraKind) {
        self.active = camera;
        self.transcript.push(Call::SetActiveCamera(camera));
    }

    fn update(&mut self, dt_ms: f64) -> CameraUpdate {
        if !self.playing {
            return CameraUpdate::default();
        }
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < self.cinematic_ms {
            return CameraUpdate::default();
        }
        self.playing = false;
        CameraUpdate {
            cinematic_completed: true,
        }
    }
}

/// [`Timelines`] that also records every fade it starts.
pub struct RecordingFader {
    inner: Timelines,
    transcript: Transcript,
}

impl RecordingFader {
    pub fn timelines(&self) -> &Timelines {
        &self.inner
    }
}

impl Fader for RecordingFader {
    fn fade_in(&mut self, element: Element, duration_ms: u32, display: Display) -> FadeId {
        self.transcript.push(Call::FadeIn(element, display));
        self.inner.fade_in(element, duration_ms, display)
    }

    fn fade_out(&mut self, element: Element, duration_ms: u32) -> FadeId {
        self.transcript.push(Call::FadeOut(element));
        self.inner.fade_out(element, duration_ms)
    }

    fn fade_audio_in(&mut self, track: Element, duration_ms: u32, max_volume: f64) -> FadeId {
        self.transcript.push(Call::AudioIn { track, max_volume });
        self.inner.fade_audio_in(track, duration_ms, max_volume)
    }

    fn fade_audio_out(&mut self, track: Element, duration_ms: u32) -> FadeId {
        self.transcript.push(Call::AudioOut(track));
        self.inner.fade_audio_out(track, duration_ms)
    }

    fn advance(&mut self, dt_ms: f64) -> Vec<FadeId> {
        self.inner.advance(dt_ms)
    }
}

/// Loader replaying a fixed script: each poll yields the next batch of events.
#[derive(Debug, Default)]
pub struct ScriptedLoader {
    batches: VecDeque<Vec<LoadEvent>>,
    schema_path: Option<PathBuf>,
}

impl ScriptedLoader {
    pub fn new(batches: impl IntoIterator<Item = Vec<LoadEvent>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
            schema_path: None,
        }
    }

    /// Path passed to [`AssetLoader::begin`], if it was called.
    pub fn schema_path(&self) -> Option<&Path> {
        self.schema_path.as_deref()
    }
}

impl AssetLoader for ScriptedLoader {
    fn begin(&mut self, schema_path: &Path) {
        self.schema_path = Some(schema_path.to_path_buf());
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        self.batches.pop_front().unwrap_or_default()
    }
}

/// Build a full set of recording collaborators around `loader`.
pub fn collaborators(
    loader: Box<dyn AssetLoader>,
    cinematic_ms: f64,
    ease: Ease,
) -> (Collaborators, Transcript) {
    let transcript = Transcript::new();
    let collab = Collaborators {
        loader,
        renderer: Box::new(HeadlessRenderer {
            transcript: transcript.clone(),
        }),
        camera: Box::new(ScriptedCamera::new(transcript.clone(), cinematic_ms)),
        fader: Box::new(RecordingFader {
            inner: Timelines::new(ease),
            transcript: transcript.clone(),
        }),
        hud: Box::new(HeadlessHud {
            transcript: transcript.clone(),
        }),
        scene: Rc::new(RefCell::new(HeadlessScene {
            transcript: transcript.clone(),
        })),
    };
    (collab, transcript)
}
