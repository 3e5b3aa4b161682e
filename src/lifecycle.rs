//! Demo lifecycle: loading, ready, cinematic and interactive phases of a session.
//!
//! A [`DemoSession`] is driven from the outside by three entry points: [`DemoSession::tick`]
//! once per display refresh, [`DemoSession::resize`] on viewport changes, and the user actions
//! [`DemoSession::start_demo`] / [`DemoSession::skip_intro`]. All of them run to completion on
//! the caller's thread.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::collab::{
    AssetLoader, CameraKind, CameraRig, Display, Element, FadeId, Fader, Hud, LoadEvent,
    Renderer, SceneEntities,
};
use crate::config::SessionConfig;
use crate::foundation::core::{FrameIndex, Viewport};
use crate::foundation::error::{ShowroomError, ShowroomResult};
use crate::palette::ConfiguratorPalette;
use crate::profiler::FrameProfiler;
use crate::schema::SchemaStore;

/// Top-level phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Loading,
    /// Terminal: a required item failed to load.
    LoadError,
    Ready,
    Cinematic,
    /// Terminal for normal operation.
    Interactive,
}

/// A state change, as delivered to [`DemoSession::on_transition`] listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
    /// Tick during which the change happened.
    pub frame: FrameIndex,
}

/// What ended the cinematic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CinematicExit {
    /// The camera path reached its end.
    Completed,
    /// The user asked to skip the intro.
    Skipped,
}

/// The collaborators a session sequences.
pub struct Collaborators {
    pub loader: Box<dyn AssetLoader>,
    pub renderer: Box<dyn Renderer>,
    pub camera: Box<dyn CameraRig>,
    pub fader: Box<dyn Fader>,
    pub hud: Box<dyn Hud>,
    /// Shared with the palette's outbound command callbacks.
    pub scene: Rc<RefCell<dyn SceneEntities>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FollowUp {
    /// Preloader faded out: remove it and fade the welcome surface in.
    RevealWelcome,
    /// Screen mask fully covers the view: swap to free look, then fade the mask out.
    RevealInteractive,
    /// Ambient track faded out: dispose of it.
    DisposeAmbientTrack,
}

type TransitionListener = Box<dyn FnMut(Transition)>;

pub struct DemoSession {
    config: SessionConfig,
    state: LifecycleState,
    collab: Collaborators,
    palette: ConfiguratorPalette,
    schema: Option<SchemaStore>,
    assets_complete: bool,
    viewport: Viewport,
    frame: FrameIndex,
    profiler: Option<FrameProfiler>,
    follow_ups: BTreeMap<FadeId, (Element, FollowUp)>,
    listeners: Vec<TransitionListener>,
}

impl DemoSession {
    /// Create a session in [`LifecycleState::Loading`] and start fetching the schema.
    #[tracing::instrument(skip_all, fields(schema = %config.schema_path.display()))]
    pub fn new(config: SessionConfig, collab: Collaborators) -> ShowroomResult<Self> {
        config.validate()?;

        let mut palette = match &config.layout {
            Some(layout) => ConfiguratorPalette::with_layout(layout.clone()),
            None => ConfiguratorPalette::new(),
        };
        let scene = Rc::clone(&collab.scene);
        palette.on_entity_color_change(move |target, color| {
            scene.borrow_mut().set_entity_color(target, color);
        });
        let scene = Rc::clone(&collab.scene);
        palette.on_entity_visibility_change(move |entity| {
            scene.borrow_mut().set_entity_visible(entity);
        });

        let viewport = config.initial_viewport;
        let profiler = config.debug_profiler.then(FrameProfiler::new);
        let mut session = Self {
            config,
            state: LifecycleState::Loading,
            collab,
            palette,
            schema: None,
            assets_complete: false,
            viewport,
            frame: FrameIndex::default(),
            profiler,
            follow_ups: BTreeMap::new(),
            listeners: Vec::new(),
        };

        session.collab.loader.begin(&session.config.schema_path);
        session.resize(viewport);
        tracing::info!("session loading");
        Ok(session)
    }

    /// Register a listener for every subsequent state change.
    pub fn on_transition(&mut self, cb: impl FnMut(Transition) + 'static) {
        self.listeners.push(Box::new(cb));
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Index of the next tick.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The loaded schema, once the session reached [`LifecycleState::Ready`].
    pub fn schema(&self) -> Option<&SchemaStore> {
        match self.state {
            LifecycleState::Ready | LifecycleState::Cinematic | LifecycleState::Interactive => {
                self.schema.as_ref()
            }
            LifecycleState::Loading | LifecycleState::LoadError => None,
        }
    }

    pub fn palette(&self) -> &ConfiguratorPalette {
        &self.palette
    }

    /// The palette receives the user's tab and swatch clicks.
    pub fn palette_mut(&mut self) -> &mut ConfiguratorPalette {
        &mut self.palette
    }

    pub fn profiler(&self) -> Option<&FrameProfiler> {
        self.profiler.as_ref()
    }

    /// Apply one loading-system report. Reports arriving outside `Loading` are ignored, so
    /// nothing touches the preloader once a failure is shown.
    #[tracing::instrument(skip(self, event), fields(state = ?self.state))]
    pub fn handle_load_event(&mut self, event: LoadEvent) {
        if self.state != LifecycleState::Loading {
            tracing::debug!(?event, "load event ignored");
            return;
        }

        match event {
            LoadEvent::Progress {
                item,
                loaded,
                total,
            } => {
                tracing::debug!(%item, loaded, total, "load progress");
                self.collab.hud.set_progress_item(&item);
            }
            LoadEvent::SchemaReady(schema) => match SchemaStore::new(schema)
                .and_then(|store| self.palette.check_layout(&store).map(|()| store))
            {
                Ok(store) => {
                    self.schema = Some(store);
                    self.enter_ready_if_loaded();
                }
                Err(e) => {
                    let item = self.config.schema_path.display().to_string();
                    tracing::warn!(error = %e, "schema rejected");
                    self.fail_load(&item);
                }
            },
            LoadEvent::Failed { item } => self.fail_load(&item),
            LoadEvent::Completed => {
                self.assets_complete = true;
                self.enter_ready_if_loaded();
            }
        }
    }

    /// User pressed the start control. Returns `false` when the request was ignored.
    pub fn start_demo(&mut self) -> bool {
        if self.state != LifecycleState::Ready {
            tracing::debug!(state = ?self.state, "start request ignored");
            return false;
        }
        self.transition(LifecycleState::Cinematic);

        let fade = self
            .collab
            .fader
            .fade_out(Element::Preloader, self.config.preloader_fade_ms);
        self.track_fade(Element::Preloader, fade, Some(FollowUp::RevealWelcome));
        self.collab.camera.start_cinematic();
        let fade = self.collab.fader.fade_audio_in(
            Element::AmbientTrack,
            self.config.audio_fade_in_ms,
            self.config.audio_max_volume,
        );
        self.track_fade(Element::AmbientTrack, fade, None);
        true
    }

    /// User asked to skip the intro.
    pub fn skip_intro(&mut self) -> ShowroomResult<bool> {
        self.finish_cinematic(CinematicExit::Skipped)
    }

    /// Leave the cinematic. Both exit triggers land here; only the first one in
    /// [`LifecycleState::Cinematic`] performs the exit actions.
    ///
    /// The ambient track fades out and the screen mask fades in right away. The camera swap,
    /// welcome removal and palette setup wait until the mask covers the view.
    #[tracing::instrument(skip(self))]
    pub fn finish_cinematic(&mut self, exit: CinematicExit) -> ShowroomResult<bool> {
        if self.state != LifecycleState::Cinematic {
            tracing::debug!(state = ?self.state, "cinematic exit ignored");
            return Ok(false);
        }
        self.transition(LifecycleState::Interactive);

        let fade = self
            .collab
            .fader
            .fade_audio_out(Element::AmbientTrack, self.config.audio_fade_out_ms);
        self.track_fade(
            Element::AmbientTrack,
            fade,
            Some(FollowUp::DisposeAmbientTrack),
        );
        let fade = self.collab.fader.fade_in(
            Element::ScreenMask,
            self.config.mask_fade_ms,
            Display::Flex,
        );
        self.track_fade(Element::ScreenMask, fade, Some(FollowUp::RevealInteractive));
        Ok(true)
    }

    /// Viewport size changed. Valid in every state; the active camera is whichever one the
    /// camera rig currently renders through.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.collab.renderer.set_size(viewport);
        self.collab.camera.set_aspect(viewport.aspect());
    }

    /// One display refresh. Never waits on loading or the cinematic.
    pub fn tick(&mut self, dt_ms: f64) -> ShowroomResult<()> {
        if self.state == LifecycleState::Loading {
            for event in self.collab.loader.poll() {
                self.handle_load_event(event);
            }
        }

        if let Some(profiler) = self.profiler.as_mut() {
            profiler.update(self.frame, dt_ms);
        }

        let update = self.collab.camera.update(dt_ms);
        if update.cinematic_completed {
            self.finish_cinematic(CinematicExit::Completed)?;
        }

        for id in self.collab.fader.advance(dt_ms) {
            if let Some((_, follow_up)) = self.follow_ups.remove(&id) {
                self.run_follow_up(follow_up)?;
            }
        }

        let camera = self.collab.camera.active_camera();
        self.collab.renderer.draw(camera);
        self.frame = self.frame.next();
        Ok(())
    }

    fn run_follow_up(&mut self, follow_up: FollowUp) -> ShowroomResult<()> {
        match follow_up {
            FollowUp::RevealWelcome => {
                self.collab.hud.remove(Element::Preloader);
                if self.state == LifecycleState::Cinematic {
                    let fade = self.collab.fader.fade_in(
                        Element::WelcomeScreen,
                        self.config.welcome_fade_ms,
                        Display::Flex,
                    );
                    self.track_fade(Element::WelcomeScreen, fade, None);
                } else {
                    tracing::debug!("cinematic already left; welcome fade-in skipped");
                }
            }
            FollowUp::RevealInteractive => self.reveal_interactive()?,
            FollowUp::DisposeAmbientTrack => self.collab.hud.remove(Element::AmbientTrack),
        }
        Ok(())
    }

    fn reveal_interactive(&mut self) -> ShowroomResult<()> {
        let schema = self
            .schema
            .clone()
            .ok_or_else(|| ShowroomError::invariant("interactive mode entered without a schema"))?;
        self.palette.initialize(schema)?;

        let camera = &mut self.collab.camera;
        camera.stop_cinematic();
        camera.set_active_camera(CameraKind::FreeLook);
        camera.set_aspect(self.viewport.aspect());
        self.collab.hud.remove(Element::WelcomeScreen);

        let fade = self
            .collab
            .fader
            .fade_out(Element::ScreenMask, self.config.mask_fade_ms);
        self.track_fade(Element::ScreenMask, fade, None);
        Ok(())
    }

    /// Remember `fade` as the live timeline of `element`. A newer fade supersedes an older one on
    /// the same element, so the older follow-up is dropped.
    fn track_fade(&mut self, element: Element, fade: FadeId, follow_up: Option<FollowUp>) {
        self.follow_ups.retain(|_, (e, _)| *e != element);
        if let Some(follow_up) = follow_up {
            self.follow_ups.insert(fade, (element, follow_up));
        }
    }

    fn fail_load(&mut self, item: &str) {
        tracing::warn!(%item, "load failed");
        self.collab.hud.show_load_error(item);
        self.transition(LifecycleState::LoadError);
    }

    fn enter_ready_if_loaded(&mut self) {
        if !self.assets_complete || self.schema.is_none() {
            return;
        }
        self.collab
            .hud
            .show_ready(&self.config.ready_title, &self.config.ready_description);
        self.transition(LifecycleState::Ready);
    }

    fn transition(&mut self, to: LifecycleState) {
        let t = Transition {
            from: self.state,
            to,
            frame: self.frame,
        };
        self.state = to;
        tracing::info!(from = ?t.from, to = ?t.to, frame = t.frame.0, "lifecycle transition");
        for listener in &mut self.listeners {
            listener(t);
        }
    }
}
