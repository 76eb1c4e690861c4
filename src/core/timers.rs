//! Simulation clock with one repeating interval and one one-shot timer.
//!
//! Time only moves when the owner calls [`SimClock::next_due`] or
//! [`SimClock::advance_to`], so combat cooldowns are exact and tests never
//! depend on wall-clock time.

/// Which timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The repeating heartbeat
    Interval,
    /// The single delayed action
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    period_ms: u64,
    next_fire_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_ms: u64,
    interval: Option<Interval>,
    one_shot_at: Option<u64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Arms the repeating timer. Returns false if one is already armed.
    pub fn arm_interval(&mut self, period_ms: u64) -> bool {
        if self.interval.is_some() {
            return false;
        }
        let period_ms = period_ms.max(1);
        self.interval = Some(Interval {
            period_ms,
            next_fire_ms: self.now_ms + period_ms,
        });
        true
    }

    pub fn disarm_interval(&mut self) {
        self.interval = None;
    }

    pub fn interval_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Schedules the one-shot timer. Returns false if one is already pending.
    pub fn schedule_once(&mut self, delay_ms: u64) -> bool {
        if self.one_shot_at.is_some() {
            return false;
        }
        self.one_shot_at = Some(self.now_ms + delay_ms);
        true
    }

    pub fn cancel_once(&mut self) {
        self.one_shot_at = None;
    }

    pub fn one_shot_pending(&self) -> bool {
        self.one_shot_at.is_some()
    }

    /// Pops the earliest timer due at or before `until_ms`, moving the clock
    /// to its fire time. Returns None once nothing else is due.
    pub fn next_due(&mut self, until_ms: u64) -> Option<TimerKind> {
        let interval_at = self
            .interval
            .map(|i| i.next_fire_ms)
            .filter(|&at| at <= until_ms);
        let once_at = self.one_shot_at.filter(|&at| at <= until_ms);

        match (interval_at, once_at) {
            (None, None) => None,
            (Some(at), None) => Some(self.fire_interval(at)),
            (None, Some(at)) => Some(self.fire_once(at)),
            // A tie goes to the one-shot
            (Some(i_at), Some(o_at)) if o_at <= i_at => Some(self.fire_once(o_at)),
            (Some(i_at), Some(_)) => Some(self.fire_interval(i_at)),
        }
    }

    /// Moves the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn fire_interval(&mut self, at: u64) -> TimerKind {
        self.now_ms = self.now_ms.max(at);
        if let Some(interval) = self.interval.as_mut() {
            interval.next_fire_ms = at + interval.period_ms;
        }
        TimerKind::Interval
    }

    fn fire_once(&mut self, at: u64) -> TimerKind {
        self.now_ms = self.now_ms.max(at);
        self.one_shot_at = None;
        TimerKind::OneShot
    }
}
