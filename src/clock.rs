//! Wall-clock access behind a trait so capture cycles are testable
//! without waiting on real time.

use chrono::{DateTime, Utc};

use crate::models::STAMP_FORMAT;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Minute-precision capture stamp in the stores' shared format.
    fn capture_stamp(&self) -> String {
        self.now().format(STAMP_FORMAT).to_string()
    }
}

/// System UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed(DateTime<Utc>);

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn capture_stamp_is_minute_precision() {
        let clock = Fixed(Utc.with_ymd_and_hms(2024, 1, 25, 9, 30, 59).unwrap());
        assert_eq!(clock.capture_stamp(), "2024-01-25 09:30");
    }
}
