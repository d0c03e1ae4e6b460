use heapless::Deque;

use super::types::{DragBounds, PointerId, PointerSample, Vector2};

const VELOCITY_HISTORY: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragRelease {
    pub delta: Vector2,
    /// Pixels per second.
    pub velocity: Vector2,
    pub moved: bool,
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug)]
struct MotionSample {
    t_ms: u64,
    position: Vector2,
}

#[derive(Clone, Debug)]
struct VelocityTracker {
    window_ms: u64,
    history: Deque<MotionSample, VELOCITY_HISTORY>,
}

impl VelocityTracker {
    fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            history: Deque::new(),
        }
    }

    fn push(&mut self, t_ms: u64, position: Vector2) {
        if self.history.is_full() {
            let _ = self.history.pop_front();
        }
        let _ = self.history.push_back(MotionSample { t_ms, position });
        while let Some(oldest) = self.history.front() {
            if t_ms.saturating_sub(oldest.t_ms) <= self.window_ms {
                break;
            }
            let _ = self.history.pop_front();
        }
    }

    fn windowed(&self) -> Option<Vector2> {
        let oldest = self.history.front()?;
        let newest = self.history.back()?;
        let dt_ms = newest.t_ms.saturating_sub(oldest.t_ms);
        if self.history.len() < 2 || dt_ms == 0 {
            return None;
        }
        Some((newest.position - oldest.position).scale(1_000.0 / dt_ms as f32))
    }
}

/// One pointer's drag, from pointer-down to release or cancel.
#[derive(Clone, Debug)]
pub struct DragSession {
    pointer: PointerId,
    origin: Vector2,
    started_ms: u64,
    last_ms: u64,
    raw_delta: Vector2,
    clamped_delta: Vector2,
    bounds: DragBounds,
    moved: bool,
    tracker: VelocityTracker,
}

impl DragSession {
    pub fn begin(sample: PointerSample, bounds: DragBounds, velocity_window_ms: u64) -> Self {
        let origin = sample.position();
        let mut tracker = VelocityTracker::new(velocity_window_ms);
        tracker.push(sample.t_ms, origin);
        Self {
            pointer: sample.pointer,
            origin,
            started_ms: sample.t_ms,
            last_ms: sample.t_ms,
            raw_delta: Vector2::ZERO,
            clamped_delta: Vector2::ZERO,
            bounds,
            moved: false,
            tracker,
        }
    }

    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    pub fn origin(&self) -> Vector2 {
        self.origin
    }

    pub fn raw_delta(&self) -> Vector2 {
        self.raw_delta
    }

    pub fn clamped_delta(&self) -> Vector2 {
        self.clamped_delta
    }

    pub fn bounds(&self) -> DragBounds {
        self.bounds
    }

    pub fn progress(&self) -> f32 {
        self.bounds.progress(self.clamped_delta)
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn update(&mut self, sample: PointerSample) -> Option<Vector2> {
        if sample.pointer != self.pointer {
            return None;
        }
        let position = sample.position();
        self.raw_delta = position - self.origin;
        self.clamped_delta = self.bounds.clamp(self.raw_delta);
        self.last_ms = self.last_ms.max(sample.t_ms);
        self.moved = true;
        self.tracker.push(sample.t_ms, position);
        Some(self.clamped_delta)
    }

    pub fn end(mut self, sample: PointerSample) -> Option<DragRelease> {
        if sample.pointer != self.pointer {
            return None;
        }
        let duration_ms = sample.t_ms.max(self.last_ms).saturating_sub(self.started_ms);
        if !self.moved {
            return Some(DragRelease {
                duration_ms,
                ..DragRelease::default()
            });
        }
        self.update(sample);
        Some(DragRelease {
            delta: self.clamped_delta,
            velocity: self.velocity(duration_ms),
            moved: true,
            duration_ms,
        })
    }

    pub fn cancel(self) {}

    fn velocity(&self, duration_ms: u64) -> Vector2 {
        if let Some(velocity) = self.tracker.windowed() {
            return velocity;
        }
        if duration_ms == 0 {
            return Vector2::ZERO;
        }
        self.raw_delta.scale(1_000.0 / duration_ms as f32)
    }
}

/// Holds the single live session of an interactive element.
#[derive(Clone, Debug, Default)]
pub struct DragSlot {
    session: Option<DragSession>,
}

impl DragSlot {
    pub const fn new() -> Self {
        Self { session: None }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Returns `false` when a session is already live; the first pointer wins.
    pub fn begin(
        &mut self,
        sample: PointerSample,
        bounds: DragBounds,
        velocity_window_ms: u64,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession::begin(sample, bounds, velocity_window_ms));
        true
    }

    pub fn update(&mut self, sample: PointerSample) -> Option<Vector2> {
        self.session.as_mut()?.update(sample)
    }

    pub fn end(&mut self, sample: PointerSample) -> Option<DragRelease> {
        let session = self.session.take()?;
        if session.pointer() != sample.pointer {
            self.session = Some(session);
            return None;
        }
        session.end(sample)
    }

    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                session.cancel();
                true
            }
            None => false,
        }
    }
}
