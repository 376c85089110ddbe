use chess::Color;

/// Remaining time below which a side's clock is shown as running low.
pub const LOW_TIME_SECONDS: i32 = 30;

/// Seconds left on each side of a two-player clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChessClock {
    white: i32,
    black: i32,
}

impl ChessClock {
    pub fn new(seconds: i32) -> Self { ChessClock { white: seconds, black: seconds } }

    pub fn remaining(&self, color: Color) -> i32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Takes one second from `color`. Returns `color` if that side has now
    /// run out of time.
    pub fn tick(&mut self, color: Color) -> Option<Color> {
        let left = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        *left = left.saturating_sub(1);
        if *left <= 0 { Some(color) } else { None }
    }

    pub fn is_low(&self, color: Color) -> bool { self.remaining(color) < LOW_TIME_SECONDS }
}

/// `mm:ss`, with anything negative shown as `00:00`.
pub fn format_time(seconds: i32) -> String {
    if seconds < 0 {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_the_given_side() {
        let mut clock = ChessClock::new(600);
        assert_eq!(clock.tick(Color::White), None);
        assert_eq!(clock.remaining(Color::White), 599);
        assert_eq!(clock.remaining(Color::Black), 600);
    }

    #[test]
    fn flags_at_zero() {
        let mut clock = ChessClock::new(2);
        assert_eq!(clock.tick(Color::Black), None);
        assert_eq!(clock.tick(Color::Black), Some(Color::Black));
        assert_eq!(clock.remaining(Color::Black), 0);
    }

    #[test]
    fn exhausted_clock_stays_at_the_minimum() {
        let mut clock = ChessClock::new(i32::MIN);
        assert_eq!(clock.tick(Color::White), Some(Color::White));
        assert_eq!(clock.tick(Color::White), Some(Color::White));
        assert_eq!(clock.remaining(Color::White), i32::MIN);
    }

    #[test]
    fn low_time_warning() {
        let mut clock = ChessClock::new(31);
        assert!(!clock.is_low(Color::White));
        clock.tick(Color::White);
        clock.tick(Color::White);
        assert!(clock.is_low(Color::White));
        assert!(!clock.is_low(Color::Black));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(-3), "00:00");
    }
}
