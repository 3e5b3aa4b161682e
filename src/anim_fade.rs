use std::collections::BTreeMap;

use crate::anim_ease::Ease;
use crate::collab::{Display, Element, FadeId, Fader};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Opacity,
    Volume,
}

#[derive(Clone, Debug)]
struct Timeline {
    id: FadeId,
    element: Element,
    channel: Channel,
    from: f64,
    to: f64,
    duration_ms: f64,
    elapsed_ms: f64,
}

impl Timeline {
    fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// Deterministic [`Fader`] sampling elapsed time against the render-loop tick.
///
/// Elements start fully opaque except the screen mask, which starts hidden. Tracks start silent.
/// A timeline that targets a channel already owned by a running timeline supersedes it; the
/// superseded one never reports completion.
#[derive(Debug, Default)]
pub struct Timelines {
    ease: Ease,
    next_id: u64,
    running: Vec<Timeline>,
    opacity: BTreeMap<Element, f64>,
    volume: BTreeMap<Element, f64>,
    display: BTreeMap<Element, Display>,
}

impl Timelines {
    pub fn new(ease: Ease) -> Self {
        Self {
            ease,
            ..Self::default()
        }
    }

    /// Current opacity of `element` in `[0, 1]`.
    pub fn opacity(&self, element: Element) -> f64 {
        self.opacity
            .get(&element)
            .copied()
            .unwrap_or_else(|| initial_opacity(element))
    }

    /// Current volume of `track` in `[0, 1]`.
    pub fn volume(&self, track: Element) -> f64 {
        self.volume.get(&track).copied().unwrap_or(0.0)
    }

    /// Display mode applied by the latest fade-in, if any.
    pub fn display(&self, element: Element) -> Option<Display> {
        self.display.get(&element).copied()
    }

    /// Number of timelines still running.
    pub fn running(&self) -> usize {
        self.running.len()
    }

    fn start(&mut self, element: Element, channel: Channel, from: f64, to: f64, duration_ms: u32) -> FadeId {
        self.running
            .retain(|t| !(t.element == element && t.channel == channel));

        let id = FadeId(self.next_id);
        self.next_id += 1;
        self.write(element, channel, from);
        self.running.push(Timeline {
            id,
            element,
            channel,
            from,
            to,
            duration_ms: f64::from(duration_ms),
            elapsed_ms: 0.0,
        });
        tracing::trace!(?id, ?element, ?channel, from, to, duration_ms, "fade started");
        id
    }

    fn write(&mut self, element: Element, channel: Channel, value: f64) {
        let map = match channel {
            Channel::Opacity => &mut self.opacity,
            Channel::Volume => &mut self.volume,
        };
        map.insert(element, value.clamp(0.0, 1.0));
    }
}

fn initial_opacity(element: Element) -> f64 {
    match element {
        Element::ScreenMask => 0.0,
        _ => 1.0,
    }
}

impl Fader for Timelines {
    fn fade_in(&mut self, element: Element, duration_ms: u32, display: Display) -> FadeId {
        self.display.insert(element, display);
        self.start(element, Channel::Opacity, 0.0, 1.0, duration_ms)
    }

    fn fade_out(&mut self, element: Element, duration_ms: u32) -> FadeId {
        let from = self.opacity(element);
        self.start(element, Channel::Opacity, from, 0.0, duration_ms)
    }

    fn fade_audio_in(&mut self, track: Element, duration_ms: u32, max_volume: f64) -> FadeId {
        let from = self.volume(track);
        self.start(track, Channel::Volume, from, max_volume.clamp(0.0, 1.0), duration_ms)
    }

    fn fade_audio_out(&mut self, track: Element, duration_ms: u32) -> FadeId {
        let from = self.volume(track);
        self.start(track, Channel::Volume, from, 0.0, duration_ms)
    }

    fn advance(&mut self, dt_ms: f64) -> Vec<FadeId> {
        let dt_ms = dt_ms.max(0.0);
        let mut samples = Vec::with_capacity(self.running.len());
        let mut done = Vec::new();

        for t in &mut self.running {
            t.elapsed_ms += dt_ms;
        }
        for t in &self.running {
            let p = t.progress();
            let value = t.from + (t.to - t.from) * self.ease.apply(p);
            samples.push((t.element, t.channel, value));
            if p >= 1.0 {
                done.push(t.id);
            }
        }
        for (element, channel, value) in samples {
            self.write(element, channel, value);
        }
        self.running.retain(|t| !done.contains(&t.id));
        done
    }
}

#[cfg(test)]
#[path = "../tests/unit/anim_fade.rs"]
mod tests;
