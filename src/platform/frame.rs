//! Frame scheduling
//!
//! The simulation runs from the display's frame callback. [`FrameLoop`] owns
//! the single pending callback so stopping it is deterministic: once `stop`
//! returns, no callback is pending and none will be requested until `start`.

use crate::sim::GamePhase;
use crate::tuning::Tuning;

/// Something that can schedule one callback for the next display frame
pub trait FrameScheduler {
    type Handle: Copy;

    /// Schedule one callback. `None` means the request was refused.
    fn request(&mut self) -> Option<Self::Handle>;

    /// Revoke a pending callback
    fn cancel(&mut self, handle: Self::Handle);
}

/// Start/stop lifecycle around a self-rescheduling frame callback
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            frames: 0,
        }
    }

    /// Request the next frame unless one is already pending
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = self.scheduler.request();
            if self.pending.is_none() {
                log::warn!("Frame request refused; loop stays stopped");
            }
        }
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Call first thing in the frame callback: the pending request has fired
    pub fn on_frame(&mut self) {
        self.pending = None;
        self.frames += 1;
    }

    /// Keep running only while the round is active
    pub fn sync(&mut self, phase: GamePhase) {
        if phase == GamePhase::Active {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Frame callbacks delivered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Turns frame timestamps into a number of simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    fixed: bool,
    step_secs: f32,
    max_steps: u32,
    max_delta: f32,
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            fixed: tuning.fixed_timestep,
            step_secs: 1.0 / tuning.step_hz,
            max_steps: tuning.max_steps_per_frame,
            max_delta: crate::consts::MAX_FRAME_DELTA,
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Forget the previous timestamp, e.g. when the loop restarts after idling
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Number of steps to run for a frame at `time_ms`
    pub fn steps_for(&mut self, time_ms: f64) -> u32 {
        if !self.fixed {
            self.last_time = Some(time_ms);
            return 1;
        }

        let dt = match self.last_time {
            Some(last) => (((time_ms - last) / 1000.0) as f32).clamp(0.0, self.max_delta),
            // First frame after a (re)start always runs one step
            None => self.step_secs,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.step_secs && steps < self.max_steps {
            self.accumulator -= self.step_secs;
            steps += 1;
        }
        // Drop backlog the cap didn't let us simulate
        if steps == self.max_steps {
            self.accumulator = self.accumulator.min(self.step_secs);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every request and cancellation
    #[derive(Default)]
    struct ManualScheduler {
        next: u32,
        requested: Vec<u32>,
        cancelled: Vec<u32>,
        refuse: bool,
    }

    impl FrameScheduler for &mut ManualScheduler {
        type Handle = u32;

        fn request(&mut self) -> Option<u32> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            self.requested.push(self.next);
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut sched = ManualScheduler::default();
        {
            let mut frame_loop = FrameLoop::new(&mut sched);
            frame_loop.start();
            frame_loop.start();
            assert!(frame_loop.is_running());
            frame_loop.stop();
        }
        assert_eq!(sched.requested, vec![1]);
    }

    #[test]
    fn test_stop_cancels_pending() {
        let mut sched = ManualScheduler::default();
        {
            let mut frame_loop = FrameLoop::new(&mut sched);
            frame_loop.start();
            frame_loop.stop();
            assert!(!frame_loop.is_running());
            frame_loop.stop();
        }
        assert_eq!(sched.cancelled, vec![1]);
    }

    #[test]
    fn test_no_request_after_phase_leaves_active() {
        let mut sched = ManualScheduler::default();
        {
            let mut frame_loop = FrameLoop::new(&mut sched);
            frame_loop.sync(GamePhase::Active);

            // Frame fires, round continues
            frame_loop.on_frame();
            frame_loop.sync(GamePhase::Active);

            // Frame fires, round ended during the step
            frame_loop.on_frame();
            frame_loop.sync(GamePhase::Ended);
            assert!(!frame_loop.is_running());
            assert_eq!(frame_loop.frames(), 2);
        }
        assert_eq!(sched.requested, vec![1, 2]);
        // Nothing was pending when the round ended, so nothing to cancel
        assert!(sched.cancelled.is_empty());
    }

    #[test]
    fn test_reset_input_cancels_pending_frame() {
        let mut sched = ManualScheduler::default();
        {
            let mut frame_loop = FrameLoop::new(&mut sched);
            frame_loop.sync(GamePhase::Active);
            frame_loop.sync(GamePhase::Idle);
        }
        assert_eq!(sched.cancelled, vec![1]);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let mut sched = ManualScheduler::default();
        {
            let mut frame_loop = FrameLoop::new(&mut sched);
            frame_loop.start();
        }
        assert_eq!(sched.cancelled, vec![1]);
    }

    #[test]
    fn test_refused_request_leaves_loop_stopped() {
        let mut sched = ManualScheduler {
            refuse: true,
            ..Default::default()
        };
        let mut frame_loop = FrameLoop::new(&mut sched);
        frame_loop.start();
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn test_clock_one_step_per_frame_when_not_fixed() {
        let tuning = Tuning {
            fixed_timestep: false,
            ..Default::default()
        };
        let mut clock = FrameClock::new(&tuning);
        assert_eq!(clock.steps_for(0.0), 1);
        assert_eq!(clock.steps_for(5.0), 1);
        assert_eq!(clock.steps_for(500.0), 1);
    }

    #[test]
    fn test_clock_matches_60hz_display() {
        let mut clock = FrameClock::new(&Tuning::default());
        let frame_ms = 1000.0 / 60.0;
        let mut total = 0;
        for i in 0..=60 {
            total += clock.steps_for(i as f64 * frame_ms);
        }
        // First frame plus one step for each of the 60 frame intervals, give or take rounding
        assert!((60..=61).contains(&total), "total = {}", total);
    }

    #[test]
    fn test_clock_halves_steps_on_120hz_display() {
        let mut clock = FrameClock::new(&Tuning::default());
        let frame_ms = 1000.0 / 120.0;
        let mut total = 0;
        for i in 0..=120 {
            total += clock.steps_for(i as f64 * frame_ms);
        }
        assert!((60..=61).contains(&total), "total = {}", total);
    }

    #[test]
    fn test_clock_caps_steps_after_a_stall() {
        let mut clock = FrameClock::new(&Tuning::default());
        clock.steps_for(0.0);
        let steps = clock.steps_for(10_000.0);
        assert_eq!(steps, Tuning::default().max_steps_per_frame);
        // Backlog is dropped, so the next regular frame runs about one step
        assert!(clock.steps_for(10_000.0 + 1000.0 / 60.0) <= 2);
    }
}
