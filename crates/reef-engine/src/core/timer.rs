// core/timer.rs
//
// Recurring timers driven by simulation time, not frame count.
// The owner polls `fired()` after each `advance()`; nothing is called back,
// so a cancelled timer can never touch a torn-down world.

/// Handle to a recurring timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// One firing of a timer during the last `advance()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub id: TimerId,
    /// Caller-defined payload (lane index, event kind, ...).
    pub tag: u32,
}

#[derive(Debug, Clone)]
struct RepeatingTimer {
    id: TimerId,
    tag: u32,
    interval: f32,
    remaining: f32,
}

/// A set of independent recurring timers sharing one clock.
#[derive(Debug, Default)]
pub struct TimerSet {
    timers: Vec<RepeatingTimer>,
    next_id: u32,
    fired: Vec<TimerFire>,
}

impl TimerSet {
    /// Shortest interval accepted; anything smaller is raised to this.
    pub const MIN_INTERVAL: f32 = 1.0e-3;
    /// Upper bound on firings of one timer per `advance()`.
    pub const MAX_FIRES_PER_ADVANCE: u32 = 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every `interval` seconds, first after one full interval.
    pub fn every(&mut self, interval: f32, tag: u32) -> TimerId {
        self.every_after(interval, interval, tag)
    }

    /// Fire every `interval` seconds, first after `first_delay` (0 = next advance).
    pub fn every_after(&mut self, interval: f32, first_delay: f32, tag: u32) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(RepeatingTimer {
            id,
            tag,
            interval: interval.max(Self::MIN_INTERVAL),
            remaining: first_delay.max(0.0),
        });
        id
    }

    /// Cancel one timer. Returns false if it was already gone.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.fired.retain(|f| f.id != id);
        self.timers.len() != before
    }

    /// Cancel every timer and forget pending fires.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.fired.clear();
    }

    /// Advance all timers by `dt` and record which fired.
    /// A timer whose interval elapsed several times fires several times,
    /// up to `MAX_FIRES_PER_ADVANCE`.
    pub fn advance(&mut self, dt: f32) -> &[TimerFire] {
        self.fired.clear();
        let dt = dt.max(0.0);
        for timer in &mut self.timers {
            timer.remaining -= dt;
            let mut fires = 0;
            while timer.remaining <= 0.0 && fires < Self::MAX_FIRES_PER_ADVANCE {
                self.fired.push(TimerFire { id: timer.id, tag: timer.tag });
                timer.remaining += timer.interval;
                fires += 1;
            }
            if timer.remaining <= 0.0 {
                // Dropped backlog; resume the normal cadence from now.
                timer.remaining = timer.interval;
            }
        }
        &self.fired
    }

    /// Fires recorded by the most recent `advance()`.
    pub fn fired(&self) -> &[TimerFire] {
        &self.fired
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_interval() {
        let mut timers = TimerSet::new();
        timers.every(3.0, 0);
        assert!(timers.advance(2.9).is_empty());
        assert_eq!(timers.advance(0.2).len(), 1);
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn cadence_independent_of_frame_size() {
        let mut fine = TimerSet::new();
        let mut coarse = TimerSet::new();
        fine.every(1.0, 0);
        coarse.every(1.0, 0);

        let mut fine_count = 0;
        for _ in 0..600 {
            fine_count += fine.advance(1.0 / 60.0).len();
        }
        let mut coarse_count = 0;
        for _ in 0..40 {
            coarse_count += coarse.advance(0.25).len();
        }
        assert_eq!(coarse_count, 10);
        assert!((9..=10).contains(&fine_count), "fine fired {}", fine_count);
    }

    #[test]
    fn zero_first_delay_fires_immediately() {
        let mut timers = TimerSet::new();
        timers.every_after(3.0, 0.0, 7);
        let fired = timers.advance(0.016);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].tag, 7);
    }

    #[test]
    fn independent_timers_keep_their_tags() {
        let mut timers = TimerSet::new();
        timers.every(1.0, 0);
        timers.every(2.0, 1);
        let tags: Vec<u32> = timers.advance(2.0).iter().map(|f| f.tag).collect();
        assert_eq!(tags.iter().filter(|t| **t == 0).count(), 2);
        assert_eq!(tags.iter().filter(|t| **t == 1).count(), 1);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerSet::new();
        let a = timers.every(1.0, 0);
        timers.every(1.0, 1);
        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        let fired = timers.advance(1.5);
        assert!(fired.iter().all(|f| f.id != a));

        timers.cancel_all();
        assert!(timers.is_empty());
        assert!(timers.advance(10.0).is_empty());
        assert!(timers.fired().is_empty());
    }

    #[test]
    fn huge_step_is_bounded() {
        let mut timers = TimerSet::new();
        timers.every(0.0, 0);
        let n = timers.advance(100.0).len() as u32;
        assert_eq!(n, TimerSet::MAX_FIRES_PER_ADVANCE);
    }
}
