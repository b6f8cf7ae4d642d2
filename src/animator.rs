//! Frame scheduling.
//!
//! An [`Animator`] holds three ordered lists of frame handlers (before,
//! frame, after) and invokes them once per frame with the frame timestamp
//! and the time since the previous frame, both in milliseconds. Handlers
//! receive a mutable reference to a context owned by the caller, usually a
//! [`RenderContext`].
//!
//! ```ignore
//! let mut animator = context.animate();
//! animator.on_before(|ctx, t, _| {
//!     if let Some(scene) = ctx.scene_mut() {
//!         scene.model.reset().rotate_y(t as f32 * 1e-3);
//!     }
//! });
//! animator.start();
//! animator.run_frames(60);
//! ```
//!
//! Scheduling is cooperative: a stopped animator ignores frames, and
//! nothing interrupts a frame once its handlers start running.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::render::{PaintSurface, RenderContext};

/// Delay between frames when none is configured.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(30);

/// Called with `(context, timestamp_ms, delta_ms)`.
pub type FrameHandler<C> = Box<dyn FnMut(&mut C, f64, f64)>;

pub struct Animator<C> {
    before: Vec<FrameHandler<C>>,
    frame: Vec<FrameHandler<C>>,
    after: Vec<FrameHandler<C>>,
    frame_delay: Duration,
    running: bool,
    timestamp: f64,
    last_timestamp: Option<f64>,
}

impl<C> Default for Animator<C> {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            frame: Vec::new(),
            after: Vec::new(),
            frame_delay: DEFAULT_FRAME_DELAY,
            running: false,
            timestamp: 0.0,
            last_timestamp: None,
        }
    }
}

impl<C> Animator<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Timestamp of the last frame, in milliseconds.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    // ============ Handlers ============

    /// Run `handler` before every frame. Use this to apply animation changes.
    pub fn on_before(&mut self, handler: impl FnMut(&mut C, f64, f64) + 'static) -> &mut Self {
        self.before.push(Box::new(handler));
        self
    }

    pub fn on_frame(&mut self, handler: impl FnMut(&mut C, f64, f64) + 'static) -> &mut Self {
        self.frame.push(Box::new(handler));
        self
    }

    pub fn on_after(&mut self, handler: impl FnMut(&mut C, f64, f64) + 'static) -> &mut Self {
        self.after.push(Box::new(handler));
        self
    }

    // ============ Control ============

    pub fn start(&mut self) -> &mut Self {
        debug!(delay_ms = self.frame_delay.as_millis() as u64, "animator started");
        self.running = true;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        debug!(timestamp = self.timestamp, "animator stopped");
        self.running = false;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one frame. Returns false, doing nothing, when stopped.
    ///
    /// Without a timestamp the previous one is advanced by the frame delay.
    /// The delta of the first frame is the timestamp itself.
    pub fn frame(&mut self, context: &mut C, timestamp: Option<f64>) -> bool {
        if !self.running {
            return false;
        }

        self.timestamp = timestamp.unwrap_or_else(|| self.timestamp + self.delay_ms());
        let delta = match self.last_timestamp {
            Some(last) => self.timestamp - last,
            None => self.timestamp,
        };

        let t = self.timestamp;
        for handler in self
            .before
            .iter_mut()
            .chain(self.frame.iter_mut())
            .chain(self.after.iter_mut())
        {
            handler(context, t, delta);
        }

        self.last_timestamp = Some(t);
        true
    }

    /// Run up to `frames` frames paced by the frame delay, sleeping on the
    /// current thread in between. Each frame is scheduled against the start
    /// of the run, so time spent in handlers does not accumulate as drift.
    ///
    /// Returns the number of frames run; stops early if the animator is
    /// stopped.
    pub fn run_frames(&mut self, context: &mut C, frames: usize) -> usize {
        let start = Instant::now();
        let base = self.timestamp;
        let mut ran = 0;

        for i in 1..=frames {
            if let Some(target) = self.frame_delay.checked_mul(i as u32) {
                if let Some(wait) = (start + target).checked_duration_since(Instant::now()) {
                    thread::sleep(wait);
                }
            }
            let elapsed = start.elapsed().as_secs_f64() * 1000.0;
            if !self.frame(context, Some(base + elapsed)) {
                break;
            }
            ran += 1;
        }
        ran
    }

    fn delay_ms(&self) -> f64 {
        let delay = if self.frame_delay.is_zero() {
            DEFAULT_FRAME_DELAY
        } else {
            self.frame_delay
        };
        delay.as_nanos() as f64 / 1e6
    }
}

/// An animator that renders a [`RenderContext`] on every frame.
pub struct RenderAnimator<S: PaintSurface> {
    context: RenderContext<S>,
    animator: Animator<RenderContext<S>>,
}

impl<S: PaintSurface + 'static> RenderAnimator<S> {
    pub fn new(context: RenderContext<S>) -> Self {
        let mut animator = Animator::new();
        animator.on_frame(|ctx: &mut RenderContext<S>, _, _| {
            ctx.render();
        });
        Self { context, animator }
    }

    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.animator.frame_delay = delay;
        self
    }

    pub fn on_before(
        &mut self,
        handler: impl FnMut(&mut RenderContext<S>, f64, f64) + 'static,
    ) -> &mut Self {
        self.animator.on_before(handler);
        self
    }

    pub fn on_after(
        &mut self,
        handler: impl FnMut(&mut RenderContext<S>, f64, f64) + 'static,
    ) -> &mut Self {
        self.animator.on_after(handler);
        self
    }

    pub fn start(&mut self) -> &mut Self {
        self.animator.start();
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.animator.stop();
        self
    }

    pub fn is_running(&self) -> bool {
        self.animator.is_running()
    }

    pub fn frame(&mut self, timestamp: Option<f64>) -> bool {
        self.animator.frame(&mut self.context, timestamp)
    }

    pub fn run_frames(&mut self, frames: usize) -> usize {
        self.animator.run_frames(&mut self.context, frames)
    }

    pub fn context(&self) -> &RenderContext<S> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RenderContext<S> {
        &mut self.context
    }

    pub fn into_context(self) -> RenderContext<S> {
        self.context
    }
}

impl<S: PaintSurface + 'static> RenderContext<S> {
    /// Wrap this context in a [`RenderAnimator`].
    pub fn animate(self) -> RenderAnimator<S> {
        RenderAnimator::new(self)
    }
}
