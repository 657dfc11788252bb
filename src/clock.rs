//! Tick scheduling for the game loop.

use std::time::{Duration, Instant};

/// How many update ticks fire per second when the loop keeps up.
pub(crate) const TICKS_PER_SECOND: u32 = 60;

/// A single fired tick of the game loop.
pub(crate) struct Tick {
    /// Seconds since the previous fired tick.
    pub(crate) delta_time: f32,
    /// Seconds since the clock was started.
    pub(crate) elapsed_time: f32,
    /// Amount of ticks fired in the last accumulated second.
    ///
    /// `Some` once per second, after which the counter resets.
    pub(crate) ticks_last_second: Option<u32>,
}

/// Tick source deciding when the game loop may fire.
///
/// Fed monotonic timestamps by the event loop, fires at most one tick per
/// poll once the frame budget since the previous fired tick has elapsed.
/// Polls under budget don't advance time.
pub(crate) struct FrameClock {
    /// Target interval between two fired ticks.
    ///
    /// Integer milliseconds, 1000 / 60 truncates to 16ms which keeps the
    /// loop slightly ahead of 60Hz.
    budget: Duration,
    /// Timestamp of the previous fired tick.
    previous_tick: Instant,
    /// Seconds since the clock started.
    elapsed_time: f32,
    /// Ticks fired since the last per-second report.
    tick_count: u32,
    /// Seconds accumulated since the last per-second report.
    second_timer: f32,
}

impl FrameClock {
    /// Start a clock, the first tick can fire one budget after `now`.
    pub(crate) fn new(now: Instant, ticks_per_second: u32) -> Self {
        Self {
            budget: Duration::from_millis(1000 / u64::from(ticks_per_second)),
            previous_tick: now,
            elapsed_time: 0.0,
            tick_count: 0,
            second_timer: 0.0,
        }
    }

    /// Restart the clock from `now`, clearing all accumulated time.
    pub(crate) fn reset(&mut self, now: Instant) {
        self.previous_tick = now;
        self.elapsed_time = 0.0;
        self.tick_count = 0;
        self.second_timer = 0.0;
    }

    /// Poll the clock, firing a tick when the budget has elapsed.
    ///
    /// The delta time of a fired tick is the actual spacing since the
    /// previous fired tick, not the budget.
    pub(crate) fn tick(&mut self, now: Instant) -> Option<Tick> {
        let since_previous = now.duration_since(self.previous_tick);
        if since_previous < self.budget {
            return None;
        }

        let delta_time = since_previous.as_secs_f32();
        self.previous_tick = now;
        self.elapsed_time += delta_time;

        self.tick_count += 1;
        self.second_timer += delta_time;

        // Report the tick count once per accumulated second
        let ticks_last_second = if self.second_timer >= 1.0 {
            let count = self.tick_count;
            self.tick_count = 0;
            self.second_timer = 0.0;

            Some(count)
        } else {
            None
        };

        Some(Tick {
            delta_time,
            elapsed_time: self.elapsed_time,
            ticks_last_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{FrameClock, TICKS_PER_SECOND};

    /// Spacing slightly above the 60Hz budget.
    const SPACING: Duration = Duration::from_micros(16_670);

    #[test]
    fn tick_fires_once_the_budget_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, TICKS_PER_SECOND);

        let tick = clock.tick(start + Duration::from_millis(20)).unwrap();
        assert!((tick.delta_time - 0.020).abs() < 1e-4);
        assert!((tick.elapsed_time - 0.020).abs() < 1e-4);
    }

    #[test]
    fn polls_under_budget_fire_nothing_and_do_not_advance_time() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, TICKS_PER_SECOND);

        assert!(clock.tick(start + Duration::from_millis(8)).is_none());
        assert!(clock.tick(start + Duration::from_millis(12)).is_none());

        // The accumulated spacing crosses the budget, delta time covers the
        // full spacing since the previous fired tick
        let tick = clock.tick(start + Duration::from_millis(16)).unwrap();
        assert!((tick.delta_time - 0.016).abs() < 1e-4);
    }

    #[test]
    fn each_spaced_poll_fires_exactly_one_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, TICKS_PER_SECOND);

        for index in 1..=10_u32 {
            let now = start + SPACING * index;
            let tick = clock.tick(now).expect("spaced poll must fire");
            assert!((tick.delta_time - SPACING.as_secs_f32()).abs() < 1e-4);
            // A second poll at the same timestamp fires nothing
            assert!(clock.tick(now).is_none());
        }
    }

    #[test]
    fn sixty_spaced_ticks_report_sixty_and_reset() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, TICKS_PER_SECOND);

        let mut report = None;
        for index in 1..=60_u32 {
            let tick = clock.tick(start + SPACING * index).unwrap();
            if let Some(count) = tick.ticks_last_second {
                assert!(report.is_none(), "only one report per second expected");
                report = Some(count);
            }
        }

        let count = report.expect("a second worth of ticks must report");
        assert!((59..=61).contains(&count), "reported {count}");

        // The counter reset, the next tick doesn't report again
        let tick = clock.tick(start + SPACING * 61).unwrap();
        assert!(tick.ticks_last_second.is_none());
    }

    #[test]
    fn reset_clears_accumulated_time() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start, TICKS_PER_SECOND);

        clock.tick(start + Duration::from_millis(500)).unwrap();

        let restart = start + Duration::from_secs(2);
        clock.reset(restart);
        assert!(clock.tick(restart + Duration::from_millis(8)).is_none());

        let tick = clock.tick(restart + Duration::from_millis(20)).unwrap();
        assert!((tick.elapsed_time - 0.020).abs() < 1e-4);
    }
}
