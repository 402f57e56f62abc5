//! Pausable countdown component for bubbletea-rs applications.
//!
//! A countdown fires once after a configurable delay. It can be paused, which
//! freezes the time left, and resumed, which continues from the frozen value.
//! While running it can optionally drive a progress loop that reports a
//! percentage in `0.0..=100.0` on every frame.
//!
//! Both scheduled pieces of work (the one-shot fire and the repeating frame
//! loop) are `bubbletea_rs::tick` commands whose messages carry the countdown
//! `id` and a generation tag. Pausing or resetting bumps the tags, so any
//! message still in flight for an older generation is ignored when it arrives.
//!
//! # Basic Usage
//!
//! ```rust
//! use autotabs_widgets::countdown::new;
//! use std::time::Duration;
//!
//! let mut countdown = new(Duration::from_secs(5)).with_progress_tracking();
//! assert!(!countdown.running());
//!
//! let cmd = countdown.resume();
//! assert!(cmd.is_some());
//! assert!(countdown.running());
//!
//! // Resuming again while running schedules nothing new.
//! assert!(countdown.resume().is_none());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use autotabs_widgets::countdown::{new, Model, TimeoutMsg};
//! use std::time::Duration;
//!
//! struct App {
//!     countdown: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = new(Duration::from_secs(3));
//!         let cmd = countdown.resume();
//!         (Self { countdown, done: false }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(timeout) = msg.downcast_ref::<TimeoutMsg>() {
//!             if self.countdown.is_current(timeout) {
//!                 self.done = true;
//!                 return None;
//!             }
//!         }
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("left: {}", self.countdown.view())
//!     }
//! }
//! ```

use bubbletea_rs::{batch, tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

const FPS: u64 = 60;
const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Callback invoked once when the countdown completes.
///
/// Runs inside [`Model::update`] before the [`TimeoutMsg`] command is returned.
pub type CompleteFunc = Box<dyn FnMut() + Send>;

/// Callback invoked on every progress tick with a percentage in `0.0..=100.0`.
pub type ProgressFunc = Box<dyn FnMut(f64) + Send>;

/// Internal message delivered when the scheduled fire comes due.
///
/// Only a message carrying the current fire tag completes the countdown;
/// pausing and resetting invalidate every fire scheduled before them.
#[derive(Debug, Clone)]
pub struct FireMsg {
    /// The countdown this fire belongs to.
    pub id: i64,
    tag: i64,
}

/// Internal message driving the progress loop, one per display frame.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    /// The countdown this frame belongs to.
    pub id: i64,
    tag: i64,
    at: Instant,
}

/// Sent to the owning model when the countdown completes.
///
/// The message belongs to one arming of the countdown. Once the countdown is
/// reset, paused or resumed again it is stale; check it with
/// [`Model::is_current`] before acting on it.
#[derive(Debug, Clone)]
pub struct TimeoutMsg {
    /// The countdown that completed.
    pub id: i64,
    tag: i64,
}

/// A pausable countdown.
///
/// The countdown starts idle with `remaining() == delay()`. Call
/// [`resume`](Model::resume) to start it and return the command it yields to
/// the runtime, then forward every message to [`update`](Model::update).
pub struct Model {
    delay: Duration,
    remaining: Duration,
    running_since: Option<Instant>,

    /// How often the progress loop ticks while running.
    pub frame_interval: Duration,

    id: i64,
    fire_tag: i64,
    frame_tag: i64,

    track_progress: bool,
    progress_origin: Option<Instant>,
    progress: f64,

    on_complete: Option<CompleteFunc>,
    on_progress: Option<ProgressFunc>,
}

/// Creates a countdown that completes `delay` after it is first resumed.
pub fn new(delay: Duration) -> Model {
    new_with_frame_interval(delay, Duration::from_nanos(1_000_000_000 / FPS))
}

/// Creates a countdown whose progress loop ticks every `frame_interval`.
pub fn new_with_frame_interval(delay: Duration, frame_interval: Duration) -> Model {
    Model {
        delay,
        remaining: delay,
        running_since: None,
        frame_interval,
        id: next_id(),
        fire_tag: 0,
        frame_tag: 0,
        track_progress: false,
        progress_origin: None,
        progress: 0.0,
        on_complete: None,
        on_progress: None,
    }
}

impl Model {
    /// Registers a callback invoked once per completion.
    pub fn with_on_complete(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Registers a progress callback and enables the progress loop.
    pub fn with_on_progress(mut self, f: impl FnMut(f64) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self.track_progress = true;
        self
    }

    /// Enables the progress loop without a callback; read the value through
    /// [`progress`](Model::progress).
    pub fn with_progress_tracking(mut self) -> Self {
        self.track_progress = true;
        self
    }

    /// Unique ID of this countdown, matched against incoming messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The full countdown duration.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Time left as of the last pause, reset or completion.
    ///
    /// While running this does not include the current run segment; use
    /// [`remaining_at`](Model::remaining_at) for the live value.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Time left at `now`, accounting for the current run segment.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self
                .remaining
                .saturating_sub(now.saturating_duration_since(since)),
            None => self.remaining,
        }
    }

    /// When the pending fire is due, if the countdown is running.
    pub fn deadline(&self) -> Option<Instant> {
        self.running_since.map(|since| since + self.remaining)
    }

    /// Whether a run segment is active.
    pub fn running(&self) -> bool {
        self.running_since.is_some()
    }

    /// The last progress value reported, in `0.0..=100.0`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Whether `timeout` comes from the latest completion of this countdown.
    ///
    /// A reset, pause or resume after the completion makes the message stale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::countdown::{new, TimeoutMsg};
    /// use bubbletea_rs::Msg;
    /// use std::time::Duration;
    ///
    /// fn on_timeout(countdown: &autotabs_widgets::countdown::Model, msg: &Msg) -> bool {
    ///     msg.downcast_ref::<TimeoutMsg>()
    ///         .is_some_and(|t| countdown.is_current(t))
    /// }
    ///
    /// let countdown = new(Duration::from_secs(1));
    /// let unrelated: Msg = Box::new(42u8);
    /// assert!(!on_timeout(&countdown, &unrelated));
    /// ```
    pub fn is_current(&self, timeout: &TimeoutMsg) -> bool {
        timeout.id == self.id && timeout.tag == self.fire_tag
    }

    /// Starts or continues the countdown from its remaining time.
    ///
    /// Returns `None` when already running, so repeated calls never schedule
    /// a second fire.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::countdown::new;
    /// use std::time::Duration;
    ///
    /// let mut countdown = new(Duration::from_secs(5));
    /// assert!(countdown.resume().is_some());
    /// assert!(countdown.running());
    ///
    /// // Already running: nothing new is scheduled.
    /// assert!(countdown.resume().is_none());
    /// ```
    pub fn resume(&mut self) -> Option<Cmd> {
        self.resume_at(Instant::now())
    }

    /// Like [`resume`](Model::resume) with an explicit start of the run segment.
    pub fn resume_at(&mut self, now: Instant) -> Option<Cmd> {
        if self.running() {
            return None;
        }

        self.running_since = Some(now);
        self.fire_tag += 1;
        debug!(
            id = self.id,
            remaining_ms = self.remaining.as_millis() as u64,
            "countdown resumed"
        );

        let fire = self.fire_cmd();
        if !self.track_progress {
            return Some(fire);
        }

        self.frame_tag += 1;
        self.progress_origin = Some(now);
        self.report_progress(0.0);
        Some(batch(vec![fire, self.next_frame()]))
    }

    /// Freezes the remaining time and cancels both scheduled tasks.
    ///
    /// Pausing an idle countdown does nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::countdown::new;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut countdown = new(Duration::from_secs(5));
    /// let start = Instant::now();
    /// countdown.resume_at(start);
    /// countdown.pause_at(start + Duration::from_secs(2));
    ///
    /// assert!(!countdown.running());
    /// assert_eq!(countdown.remaining(), Duration::from_secs(3));
    /// ```
    pub fn pause(&mut self) {
        self.pause_at(Instant::now())
    }

    /// Like [`pause`](Model::pause) with an explicit end of the run segment.
    ///
    /// A pause that lands after the nominal fire time, before the fire message
    /// was processed, leaves zero time remaining.
    pub fn pause_at(&mut self, now: Instant) {
        let Some(since) = self.running_since.take() else {
            return;
        };

        let elapsed = now.saturating_duration_since(since);
        if elapsed > self.remaining {
            debug!(
                id = self.id,
                overrun_ms = (elapsed - self.remaining).as_millis() as u64,
                "countdown paused past its deadline, clamping remaining to zero"
            );
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.clear();
        self.stop_progress();
        debug!(
            id = self.id,
            remaining_ms = self.remaining.as_millis() as u64,
            "countdown paused"
        );
    }

    /// Returns the countdown to its freshly constructed state.
    ///
    /// Nothing is started; call [`resume`](Model::resume) to run again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autotabs_widgets::countdown::new;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut countdown = new(Duration::from_secs(3));
    /// let start = Instant::now();
    /// countdown.resume_at(start);
    /// countdown.pause_at(start + Duration::from_secs(1));
    ///
    /// countdown.reset();
    /// assert!(!countdown.running());
    /// assert_eq!(countdown.remaining(), countdown.delay());
    /// ```
    pub fn reset(&mut self) {
        self.clear();
        self.stop_progress();
        self.remaining = self.delay;
        self.running_since = None;
        self.progress = 0.0;
    }

    // Invalidates the pending fire.
    pub(crate) fn clear(&mut self) {
        self.fire_tag += 1;
    }

    fn stop_progress(&mut self) {
        self.frame_tag += 1;
        self.progress_origin = None;
    }

    fn report_progress(&mut self, percent: f64) {
        self.progress = percent;
        if let Some(f) = self.on_progress.as_mut() {
            f(percent);
        }
    }

    fn fire_cmd(&self) -> Cmd {
        let id = self.id;
        let tag = self.fire_tag;
        bubbletea_tick(self.remaining, move |_| Box::new(FireMsg { id, tag }) as Msg)
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.frame_tag;
        bubbletea_tick(self.frame_interval, move |_| {
            Box::new(FrameMsg {
                id,
                tag,
                at: Instant::now(),
            }) as Msg
        })
    }

    fn timeout_cmd(&self) -> Cmd {
        let id = self.id;
        let tag = self.fire_tag;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(TimeoutMsg { id, tag }) as Msg
        })
    }

    #[cfg(test)]
    pub(crate) fn current_timeout(&self) -> TimeoutMsg {
        TimeoutMsg {
            id: self.id,
            tag: self.fire_tag,
        }
    }

    /// Handles fire and frame messages addressed to this countdown.
    ///
    /// On completion the callback runs and a [`TimeoutMsg`] command is
    /// returned. On a frame the progress callback runs and the next frame is
    /// scheduled until the full delay has elapsed since the last resume.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(fire) = msg.downcast_ref::<FireMsg>() {
            if fire.id != self.id || fire.tag != self.fire_tag || !self.running() {
                return None;
            }

            self.running_since = None;
            self.remaining = Duration::ZERO;
            // A second delivery of the same fire must not complete twice.
            self.clear();
            debug!(id = self.id, "countdown completed");

            if let Some(f) = self.on_complete.as_mut() {
                f();
            }
            return Some(self.timeout_cmd());
        }

        if let Some(frame) = msg.downcast_ref::<FrameMsg>() {
            if frame.id != self.id || frame.tag != self.frame_tag {
                return None;
            }
            let origin = self.progress_origin?;

            let elapsed = frame.at.saturating_duration_since(origin);
            let percent = if self.delay.is_zero() {
                100.0
            } else {
                (elapsed.as_secs_f64() / self.delay.as_secs_f64()).min(1.0) * 100.0
            };
            trace!(id = self.id, percent, "countdown frame");
            self.report_progress(percent);

            if elapsed < self.delay {
                return Some(self.next_frame());
            }
            self.progress_origin = None;
            return None;
        }

        None
    }

    /// Renders the live remaining time, e.g. `4.2s` or `1m05s`.
    pub fn view(&self) -> String {
        format_remaining(self.remaining_at(Instant::now()))
    }
}

fn format_remaining(d: Duration) -> String {
    let tenths = d.as_millis() / 100;
    let secs = tenths / 10;
    if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}.{}s", secs, tenths % 10)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("delay", &self.delay)
            .field("remaining", &self.remaining)
            .field("running_since", &self.running_since)
            .field("progress", &self.progress)
            .field("track_progress", &self.track_progress)
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Model::default();
        let cmd = model.resume();
        (model, cmd)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(DEFAULT_DELAY)
    }
}
