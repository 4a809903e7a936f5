use std::time::{Duration, Instant};
use log::trace;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RedrawState {
    Idle,
    Pending { due: Instant },
    Rendering { stale: bool },
}
/// Collapses bursts of view changes into a single delayed redraw.
///
/// The host owns the timer: it calls [`RedrawScheduler::request`] on every
/// change, arms a timer for the returned deadline when one is returned, and
/// brackets the render with [`RedrawScheduler::start`] / [`RedrawScheduler::finish`].
/// Changes that land while a render is running make `finish` ask for one more.
#[derive(Clone, Debug)]
pub struct RedrawScheduler {
    delay: Duration,
    state: RedrawState,
}
impl RedrawScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: RedrawState::Idle,
        }
    }
    /// Returns the deadline to arm when this call scheduled a new redraw,
    /// `None` when it was folded into one already pending or running.
    pub fn request(&mut self, now: Instant) -> Option<Instant> {
        match self.state {
            RedrawState::Idle => {
                let due = now + self.delay;
                self.state = RedrawState::Pending { due };
                trace!("redraw scheduled in {:?}", self.delay);
                Some(due)
            }
            RedrawState::Pending { .. } => None,
            RedrawState::Rendering { .. } => {
                self.state = RedrawState::Rendering { stale: true };
                None
            }
        }
    }
    pub fn is_pending(&self) -> bool {
        matches!(self.state, RedrawState::Pending { .. })
    }
    /// True once a pending redraw has reached its deadline.
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.state, RedrawState::Pending { due } if now >= due)
    }
    /// Claim the pending redraw. Returns false if there is nothing to render.
    pub fn start(&mut self) -> bool {
        if self.is_pending() {
            self.state = RedrawState::Rendering { stale: false };
            true
        } else {
            false
        }
    }
    /// Close the current render. When the view changed meanwhile a fresh
    /// redraw is scheduled and its deadline returned.
    pub fn finish(&mut self, now: Instant) -> Option<Instant> {
        match self.state {
            RedrawState::Rendering { stale: true } => {
                self.state = RedrawState::Idle;
                trace!("view changed during redraw, rescheduling");
                self.request(now)
            }
            RedrawState::Rendering { stale: false } => {
                self.state = RedrawState::Idle;
                None
            }
            RedrawState::Idle | RedrawState::Pending { .. } => None,
        }
    }
}
