//! Interruptible tween/timer state for the renderer lifecycle.
//!
//! The source of truth for animation is the owning renderer: the orchestrator
//! ticks it with [`advance`](crate::node::NodeRenderer::advance) once per
//! frame, single-threaded. Starting a new tween on a property supersedes the
//! in-flight one; a superseded phase never fires its completion signal.

use mangrove_core::geom::Point;

/// Lifecycle phase of a renderer instance, driven by orchestrator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Steady,
    Updating,
    Exiting,
    Destroyed,
}

/// Emitted from `advance` when a phase's animation settles. `ExitComplete` is
/// the signal the orchestrator must wait for before discarding the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    EnterComplete,
    UpdateComplete,
    ExitComplete,
}

/// D3 v3's default transition easing ("cubic-in-out").
fn ease_cubic_in_out(t: f64) -> f64 {
    let t = (t * 2.0).clamp(0.0, 2.0);
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, other: Self, t: f64) -> Self {
        Point::lerp(self, other, t)
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween<T> {
    from: T,
    to: T,
    duration: f64,
    elapsed: f64,
}

/// A property value with an optional in-flight tween toward a new target.
#[derive(Debug, Clone, Copy)]
pub struct Animated<T: Lerp> {
    current: T,
    tween: Option<Tween<T>>,
}

impl<T: Lerp> Animated<T> {
    pub fn at(value: T) -> Self {
        Self {
            current: value,
            tween: None,
        }
    }

    pub fn get(&self) -> T {
        self.current
    }

    pub fn target(&self) -> T {
        self.tween.as_ref().map(|t| t.to).unwrap_or(self.current)
    }

    /// Retargets the property. Zero duration applies instantly; otherwise the
    /// current value (mid-tween or not) becomes the new starting point and any
    /// in-flight tween is superseded.
    pub fn start(&mut self, to: T, duration: f64) {
        if duration <= 0.0 {
            self.current = to;
            self.tween = None;
        } else {
            self.tween = Some(Tween {
                from: self.current,
                to,
                duration,
                elapsed: 0.0,
            });
        }
    }

    /// Steps the tween by `dt` milliseconds. Returns true when a tween
    /// finished on this step.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some(tween) = &mut self.tween else {
            return false;
        };
        tween.elapsed += dt.max(0.0);
        if tween.elapsed >= tween.duration {
            self.current = tween.to;
            self.tween = None;
            true
        } else {
            let t = ease_cubic_in_out(tween.elapsed / tween.duration);
            self.current = tween.from.lerp(tween.to, t);
            false
        }
    }

    pub fn idle(&self) -> bool {
        self.tween.is_none()
    }
}

/// One-shot delay, used for the automated activation "visit" click.
#[derive(Debug, Clone, Copy)]
pub struct DelayTimer {
    remaining: f64,
}

impl DelayTimer {
    pub fn new(delay: f64) -> Self {
        Self {
            remaining: delay.max(0.0),
        }
    }

    /// Returns true once, when the delay has elapsed. A zero delay fires on
    /// the first step, even with `dt == 0`.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.remaining -= dt.max(0.0);
        self.remaining <= 0.0
    }
}
