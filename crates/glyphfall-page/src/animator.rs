//! Orchestration of every page animation.

use glyphfall_config::{Config, ConfigError};
use glyphfall_core::{
    Dom, ElementId, Millis, MotionPreference, PageEvent, TimerQueue, Viewport,
};
use glyphfall_rain::{Font, FrameOutcome, RainRenderer, Surface};
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::boot::BootSequencer;
use crate::hover::HoverToggler;
use crate::reveal::RevealController;
use crate::typing::TypingCycler;
use crate::year::{current_year, stamp_year};
use crate::{FONT_PROPERTY, TYPED_ID};

#[derive(Debug, Error)]
pub enum AnimatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Timer callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    FinishBoot,
    RemoveOverlay,
    TypingTick,
}

/// The page animator.
///
/// Owns the document and every component's state. The host calls
/// [`PageAnimator::load`] once, then repeatedly [`PageAnimator::advance`]
/// for timers, [`PageAnimator::frame`] for animation frames and
/// [`PageAnimator::handle`] for window and pointer events.
#[derive(Debug)]
pub struct PageAnimator<D> {
    dom: D,
    motion: MotionPreference,
    viewport: Viewport,
    loaded: bool,
    timers: TimerQueue<Task>,
    boot: BootSequencer,
    typing: TypingCycler,
    typed: Option<ElementId>,
    first_typing_tick: Option<Millis>,
    rain: RainRenderer,
    reveal: RevealController,
    hover: HoverToggler,
    rng: StdRng,
}

impl<D: Dom> PageAnimator<D> {
    pub fn new(
        config: &Config,
        dom: D,
        motion: MotionPreference,
        rng: StdRng,
    ) -> Result<Self, AnimatorError> {
        config.validate()?;
        let typing = TypingCycler::new(&config.typing).ok_or(ConfigError::NoPhrases)?;

        let family = dom
            .style_property(FONT_PROPERTY)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| config.font_family.clone());
        let font = Font::new(config.rain.font_size_px, family);

        Ok(Self {
            dom,
            motion,
            viewport: Viewport::default(),
            loaded: false,
            timers: TimerQueue::new(),
            boot: BootSequencer::new(&config.boot, motion),
            typing,
            typed: None,
            first_typing_tick: None,
            rain: RainRenderer::new(&config.rain, font, motion),
            reveal: RevealController::new(&config.reveal),
            hover: HoverToggler::new(&config.hover),
            rng,
        })
    }

    /// Page ready: stamp the year, wire observers, start the rain and the
    /// boot sequence. Later calls are ignored.
    pub fn load<S: Surface + ?Sized>(&mut self, now: Millis, viewport: Viewport, surface: &mut S) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.viewport = viewport;

        stamp_year(&mut self.dom, current_year());
        let observed = self.reveal.observe_all(&self.dom);
        let cards = self.hover.attach(&self.dom);
        self.rain.start(viewport, surface, &mut self.rng);
        self.timers
            .schedule_after(now, self.boot.finish_delay(), Task::FinishBoot);
        info!(
            motion = ?self.motion,
            observed,
            cards,
            width = viewport.width,
            height = viewport.height,
            "page loaded"
        );

        // Reduced motion finishes boot without waiting for the host.
        self.advance(now);
    }

    /// Run every timer due at or before `now`. Returns how many ran.
    pub fn advance(&mut self, now: Millis) -> usize {
        let mut ran = 0;
        while let Some((due, task)) = self.timers.pop_due(now) {
            self.run(due, task);
            ran += 1;
        }
        ran
    }

    fn run(&mut self, due: Millis, task: Task) {
        match task {
            Task::FinishBoot => self.finish_boot(due),
            Task::RemoveOverlay => self.boot.remove_overlay(&mut self.dom),
            Task::TypingTick => self.tick_typing(due),
        }
    }

    fn finish_boot(&mut self, now: Millis) {
        let Some(finish) = self.boot.finish(now, &mut self.dom) else {
            return;
        };
        if let Some(delay) = finish.remove_overlay_in {
            self.timers.schedule_after(now, delay, Task::RemoveOverlay);
        }
        self.start_typing(now, finish.typing_in);
    }

    fn start_typing(&mut self, now: Millis, delay: Millis) {
        self.typed = self.dom.element_by_id(TYPED_ID);
        if self.typed.is_none() {
            debug!("no typed element, typing disabled");
            return;
        }
        self.timers.schedule_after(now, delay, Task::TypingTick);
    }

    fn tick_typing(&mut self, due: Millis) {
        let Some(el) = self.typed else {
            return;
        };
        self.first_typing_tick.get_or_insert(due);
        let step = self.typing.tick();
        self.dom.set_text(el, &step.text);
        self.timers.schedule_after(due, step.delay, Task::TypingTick);
    }

    /// Offer an animation frame at `ts`.
    pub fn frame<S: Surface + ?Sized>(&mut self, ts: Millis, surface: &mut S) -> FrameOutcome {
        self.rain.on_frame(ts, surface, &mut self.rng)
    }

    /// Dispatch a host event.
    pub fn handle<S: Surface + ?Sized>(&mut self, event: PageEvent, surface: &mut S) {
        match event {
            PageEvent::Resize(viewport) => {
                self.viewport = viewport;
                self.rain.resize(viewport, surface, &mut self.rng);
            }
            PageEvent::PointerEnter(_) | PageEvent::PointerLeave(_) => {
                self.hover.on_pointer(event, &mut self.dom);
            }
            PageEvent::Intersection(entry) => {
                self.reveal.on_intersection(entry, &mut self.dom);
            }
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn motion(&self) -> MotionPreference {
        self.motion
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn boot(&self) -> &BootSequencer {
        &self.boot
    }

    pub fn typing(&self) -> &TypingCycler {
        &self.typing
    }

    /// Timestamp of the first typing tick, once typing has started.
    pub fn first_typing_tick(&self) -> Option<Millis> {
        self.first_typing_tick
    }

    pub fn rain(&self) -> &RainRenderer {
        &self.rain
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn next_timer_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BOOT_SCREEN_ID, BOOT_STATUS_CLASS, CARD_CLASS, OBSERVE_CLASS, YEAR_ID};
    use glyphfall_core::{IntersectionEntry, PageDocument};
    use glyphfall_rain::GlyphCanvas;
    use rand::SeedableRng;

    struct Page {
        doc: PageDocument,
        typed: ElementId,
        section: ElementId,
        card: ElementId,
    }

    fn page() -> Page {
        let mut doc = PageDocument::new();
        doc.insert(Some(BOOT_SCREEN_ID), &[]);
        doc.insert_text(None, &[BOOT_STATUS_CLASS], "booting");
        let typed = doc.insert(Some(TYPED_ID), &[]);
        let section = doc.insert(None, &[OBSERVE_CLASS]);
        let card = doc.insert(None, &[CARD_CLASS, OBSERVE_CLASS]);
        doc.insert(Some(YEAR_ID), &[]);
        Page {
            doc,
            typed,
            section,
            card,
        }
    }

    fn animator(doc: PageDocument, motion: MotionPreference) -> PageAnimator<PageDocument> {
        PageAnimator::new(&Config::default(), doc, motion, StdRng::seed_from_u64(1)).unwrap()
    }

    fn text(animator: &PageAnimator<PageDocument>, el: ElementId) -> String {
        animator.dom().text(el).unwrap_or_default().to_string()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.typing.phrases.clear();
        let result = PageAnimator::new(
            &config,
            PageDocument::new(),
            MotionPreference::Full,
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(
            result,
            Err(AnimatorError::Config(ConfigError::NoPhrases))
        ));
    }

    #[test]
    fn test_boot_then_typing_with_motion() {
        let p = page();
        let mut canvas = GlyphCanvas::new();
        let mut anim = animator(p.doc, MotionPreference::Full);
        anim.load(0, Viewport::new(1600, 900), &mut canvas);

        let year = anim.dom().element_by_id(YEAR_ID).unwrap();
        assert_eq!(text(&anim, year), current_year().to_string());

        anim.advance(1799);
        assert!(!anim.boot().is_finished());

        anim.advance(1800);
        assert!(anim.boot().is_finished());
        let status = anim.dom().elements_with_class(BOOT_STATUS_CLASS)[0];
        assert_eq!(text(&anim, status), "ready");
        assert!(anim.dom().element_by_id(BOOT_SCREEN_ID).is_some());

        anim.advance(2179);
        assert_eq!(text(&anim, p.typed), "");
        assert_eq!(anim.first_typing_tick(), None);

        anim.advance(2180);
        assert!(anim.dom().element_by_id(BOOT_SCREEN_ID).is_none());
        assert_eq!(text(&anim, p.typed), "c");
        assert_eq!(anim.first_typing_tick(), Some(2180));

        anim.advance(2180 + 36);
        assert_eq!(text(&anim, p.typed), "co");
    }

    #[test]
    fn test_reduced_motion_starts_typing_at_load() {
        let p = page();
        let mut canvas = GlyphCanvas::new();
        let mut anim = animator(p.doc, MotionPreference::Reduced);
        anim.load(50, Viewport::new(800, 600), &mut canvas);

        assert!(anim.boot().is_finished());
        assert_eq!(anim.first_typing_tick(), Some(50));
        assert_eq!(text(&anim, p.typed), "c");

        // The overlay still fades out before it is detached.
        assert!(anim.dom().element_by_id(BOOT_SCREEN_ID).is_some());
        anim.advance(50 + 379);
        assert!(anim.dom().element_by_id(BOOT_SCREEN_ID).is_some());
        anim.advance(50 + 380);
        assert!(anim.dom().element_by_id(BOOT_SCREEN_ID).is_none());

        assert_eq!(
            anim.frame(50, &mut canvas),
            FrameOutcome::Drawn { rescheduled: false }
        );
        assert_eq!(anim.frame(66, &mut canvas), FrameOutcome::Idle);
    }

    #[test]
    fn test_missing_typed_element_is_noop() {
        let mut doc = PageDocument::new();
        doc.insert(Some(BOOT_SCREEN_ID), &[]);
        let mut canvas = GlyphCanvas::new();
        let mut anim = animator(doc, MotionPreference::Reduced);
        anim.load(0, Viewport::new(800, 600), &mut canvas);

        assert!(anim.boot().is_finished());
        assert_eq!(anim.first_typing_tick(), None);
        assert_eq!(anim.next_timer_due(), Some(380));
        anim.advance(380);
        assert_eq!(anim.first_typing_tick(), None);
        assert_eq!(anim.next_timer_due(), None);
    }

    #[test]
    fn test_typing_runs_forever() {
        let p = page();
        let mut canvas = GlyphCanvas::new();
        let mut anim = animator(p.doc, MotionPreference::Reduced);
        anim.load(0, Viewport::new(800, 600), &mut canvas);

        let phrases = Config::default().typing.phrases;
        for now in (0..120_000).step_by(250) {
            anim.advance(now);
            let shown = text(&anim, p.typed);
            let phrase = &phrases[anim.typing().phrase_index()];
            let previous = &phrases[(anim.typing().phrase_index() + phrases.len() - 1) % phrases.len()];
            assert!(phrase.starts_with(&shown) || previous.starts_with(&shown));
            assert!(anim.next_timer_due().is_some());
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let p = page();
        let mut canvas = GlyphCanvas::new();
        let mut anim = animator(p.doc, MotionPreference::Full);
        anim.load(0, Viewport::new(800, 600), &mut canvas);
        anim.load(10, Viewport::new(1600, 600), &mut canvas);
        assert_eq!(anim.viewport(), Viewport::new(800, 600));
        assert_eq!(anim.next_timer_due(), Some(1800));
    }

    #[test]
    fn test_events_dispatch() {
        let p = page();
        let mut canvas = GlyphCanvas::new();
        let mut anim = animator(p.doc, MotionPreference::Full);
        anim.load(0, Viewport::new(800, 600), &mut canvas);
        assert_eq!(anim.rain().field().column_count(), 50);

        anim.handle(PageEvent::Resize(Viewport::new(1600, 900)), &mut canvas);
        assert_eq!(anim.rain().field().column_count(), 100);
        assert_eq!(canvas.size(), Viewport::new(1600, 900));

        anim.handle(PageEvent::PointerEnter(p.card), &mut canvas);
        assert!(anim.dom().has_class(p.card, "alive"));
        anim.handle(PageEvent::PointerLeave(p.card), &mut canvas);
        assert!(!anim.dom().has_class(p.card, "alive"));

        let entry = IntersectionEntry {
            target: p.section,
            ratio: 0.5,
        };
        anim.handle(PageEvent::Intersection(entry), &mut canvas);
        assert!(anim.dom().has_class(p.section, "in-view"));
        assert!(!anim.reveal().is_observing(p.section));
        assert!(anim.reveal().is_observing(p.card));
    }

    #[test]
    fn test_font_family_from_style_property() {
        let mut doc = PageDocument::new();
        doc.set_style_property(FONT_PROPERTY, " 'Fira Code' ");
        let anim = animator(doc, MotionPreference::Full);
        assert_eq!(anim.rain().font().to_string(), "14px 'Fira Code'");

        let anim = animator(PageDocument::new(), MotionPreference::Full);
        assert_eq!(anim.rain().font().to_string(), "14px monospace");
    }
}
