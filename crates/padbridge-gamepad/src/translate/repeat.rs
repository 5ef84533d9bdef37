use std::time::{Duration, Instant};

use crate::settings::NavigationSettings;
use crate::types::Direction;

/// Turns the per-poll direction into navigation events with key-repeat
/// timing: immediate on change, then after `delay`, then every `interval`.
#[derive(Debug)]
pub(crate) struct DirectionRepeater {
    delay: Duration,
    interval: Duration,
    current: Direction,
    last_fire: Option<Instant>,
    delay_done: bool,
}

impl DirectionRepeater {
    pub(crate) fn new(settings: &NavigationSettings) -> Self {
        Self {
            delay: settings.repeat_delay,
            interval: settings.repeat_interval,
            current: Direction::None,
            last_fire: None,
            delay_done: false,
        }
    }

    /// Feed the direction of one poll; returns the direction to report.
    pub(crate) fn update(&mut self, direction: Direction, now: Instant) -> Option<Direction> {
        if direction != self.current {
            self.current = direction;
            self.last_fire = Some(now);
            self.delay_done = false;
            return Some(direction);
        }
        if direction.is_none() {
            return None;
        }

        let last_fire = *self.last_fire.get_or_insert(now);
        let due = if self.delay_done {
            self.interval
        } else {
            self.delay
        };
        if now.saturating_duration_since(last_fire) >= due {
            self.last_fire = Some(now);
            self.delay_done = true;
            return Some(direction);
        }
        None
    }

    /// Forget the held direction and its timers.
    pub(crate) fn reset(&mut self) {
        self.current = Direction::None;
        self.last_fire = None;
        self.delay_done = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeater() -> DirectionRepeater {
        DirectionRepeater::new(&NavigationSettings {
            repeat_delay: Duration::from_millis(400),
            repeat_interval: Duration::from_millis(150),
        })
    }

    fn run(
        repeater: &mut DirectionRepeater,
        t0: Instant,
        direction: Direction,
        from_ms: u64,
        to_ms: u64,
    ) -> Vec<u64> {
        let mut fired = Vec::new();
        let mut at = from_ms;
        while at <= to_ms {
            if repeater
                .update(direction, t0 + Duration::from_millis(at))
                .is_some()
            {
                fired.push(at);
            }
            at += 16;
        }
        fired
    }

    #[test]
    fn held_direction_fires_then_repeats_after_delay() {
        let t0 = Instant::now();
        let mut r = repeater();
        let fired = run(&mut r, t0, Direction::Down, 0, 1000);
        assert_eq!(fired[0], 0);
        assert!(fired[1] >= 400);
        for pair in fired[1..].windows(2) {
            assert!(pair[1] - pair[0] >= 150);
        }
        assert!(fired.len() >= 4);
    }

    #[test]
    fn interval_equal_to_delay_spaces_every_repeat() {
        let t0 = Instant::now();
        let mut r = DirectionRepeater::new(&NavigationSettings {
            repeat_delay: Duration::from_millis(400),
            repeat_interval: Duration::from_millis(400),
        });
        let fired = run(&mut r, t0, Direction::Left, 0, 1700);
        assert_eq!(fired[0], 0);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= 400);
        }
        assert_eq!(fired, vec![0, 400, 800, 1200, 1600]);
    }

    #[test]
    fn change_of_direction_fires_immediately() {
        let t0 = Instant::now();
        let mut r = repeater();
        assert_eq!(r.update(Direction::Up, t0), Some(Direction::Up));
        assert_eq!(r.update(Direction::Up, t0 + Duration::from_millis(16)), None);
        assert_eq!(
            r.update(Direction::Left, t0 + Duration::from_millis(32)),
            Some(Direction::Left)
        );
    }

    #[test]
    fn release_reports_none_once() {
        let t0 = Instant::now();
        let mut r = repeater();
        r.update(Direction::Right, t0);
        assert_eq!(
            r.update(Direction::None, t0 + Duration::from_millis(16)),
            Some(Direction::None)
        );
        assert_eq!(r.update(Direction::None, t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn reset_restarts_timing() {
        let t0 = Instant::now();
        let mut r = repeater();
        r.update(Direction::Up, t0);
        r.update(Direction::Up, t0 + Duration::from_millis(400));
        r.reset();
        let after = t0 + Duration::from_millis(416);
        assert_eq!(r.update(Direction::Up, after), Some(Direction::Up));
        // Timing starts over: the next repeat needs the full delay again.
        assert_eq!(r.update(Direction::Up, after + Duration::from_millis(150)), None);
        assert_eq!(
            r.update(Direction::Up, after + Duration::from_millis(400)),
            Some(Direction::Up)
        );
    }
}
