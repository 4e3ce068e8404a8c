//! Boot splash sequencing.

use glyphfall_config::BootConfig;
use glyphfall_core::{Dom, Millis, MotionPreference};
use tracing::debug;

use crate::{BOOT_SCREEN_ID, BOOT_STATUS_CLASS};

/// Where boot is in its one-way transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Booting,
    Finished { at: Millis },
}

/// What the caller should schedule after a finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootFinish {
    /// Delay until the overlay is removed, `None` if it is already gone.
    pub remove_overlay_in: Option<Millis>,
    /// Delay until typing starts.
    pub typing_in: Millis,
}

/// Dismisses the boot overlay once, after a delay or immediately when
/// reduced motion is preferred. The overlay always fades before removal.
#[derive(Debug, Clone)]
pub struct BootSequencer {
    state: BootState,
    motion: MotionPreference,
    delay_ms: Millis,
    fade_ms: Millis,
    remove_after_ms: Millis,
    ready_text: String,
}

impl BootSequencer {
    pub fn new(config: &BootConfig, motion: MotionPreference) -> Self {
        Self {
            state: BootState::Booting,
            motion,
            delay_ms: config.delay_ms,
            fade_ms: config.fade_ms,
            remove_after_ms: config.remove_after_ms,
            ready_text: config.ready_text.clone(),
        }
    }

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, BootState::Finished { .. })
    }

    /// Delay from page load to finish: zero under reduced motion.
    pub fn finish_delay(&self) -> Millis {
        if self.motion.is_reduced() {
            0
        } else {
            self.delay_ms
        }
    }

    /// Mark boot finished at `now`.
    ///
    /// Sets the status text and starts the overlay fade. Returns `None` if
    /// boot already finished.
    pub fn finish<D: Dom + ?Sized>(&mut self, now: Millis, dom: &mut D) -> Option<BootFinish> {
        if self.is_finished() {
            return None;
        }
        self.state = BootState::Finished { at: now };

        if let Some(status) = dom.elements_with_class(BOOT_STATUS_CLASS).first() {
            dom.set_text(*status, &self.ready_text);
        }

        let overlay = dom.element_by_id(BOOT_SCREEN_ID);
        if let Some(el) = overlay {
            dom.set_opacity(el, 0.0, self.fade_ms);
        }
        // Reduced motion only skips the wait; typing starts with the fade.
        let finish = BootFinish {
            remove_overlay_in: overlay.map(|_| self.remove_after_ms),
            typing_in: if self.motion.is_reduced() {
                0
            } else {
                self.remove_after_ms
            },
        };
        debug!(now, motion = ?self.motion, "boot finished");
        Some(finish)
    }

    /// Detach the overlay after its fade.
    pub fn remove_overlay<D: Dom + ?Sized>(&self, dom: &mut D) {
        if let Some(el) = dom.element_by_id(BOOT_SCREEN_ID) {
            dom.remove(el);
            debug!("boot overlay removed");
        }
    }

    /// Fraction of the boot delay elapsed at `now`, for progress bars.
    pub fn progress(&self, now: Millis) -> f32 {
        match self.state {
            BootState::Finished { .. } => 1.0,
            BootState::Booting if self.delay_ms == 0 => 1.0,
            BootState::Booting => (now as f32 / self.delay_ms as f32).min(1.0),
        }
    }

    /// Overlay opacity at `now` following the linear fade after finish.
    pub fn overlay_opacity(&self, now: Millis) -> f32 {
        match self.state {
            BootState::Booting => 1.0,
            BootState::Finished { .. } if self.fade_ms == 0 => 0.0,
            BootState::Finished { at } => {
                let t = now.saturating_sub(at) as f32 / self.fade_ms as f32;
                (1.0 - t).clamp(0.0, 1.0)
            }
        }
    }
}
