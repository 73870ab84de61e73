//! Wall-clock source and calendar decomposition
//!
//! Counters are bucketed by calendar fields, so the clock is injected to make
//! bucket boundaries testable.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Which wall clock calendar buckets follow
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CalendarZone {
    #[default]
    Local,
    Utc,
}

impl CalendarZone {
    pub fn from_config(value: &str) -> Self {
        if value.eq_ignore_ascii_case("utc") {
            CalendarZone::Utc
        } else {
            CalendarZone::Local
        }
    }

    pub fn wall_time(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            CalendarZone::Local => instant.with_timezone(&Local).naive_local(),
            CalendarZone::Utc => instant.naive_utc(),
        }
    }
}

/// Clock plus the zone used to read calendar fields off it
#[derive(Clone)]
pub struct Calendar {
    clock: Arc<dyn Clock>,
    zone: CalendarZone,
}

impl Calendar {
    pub fn new(clock: Arc<dyn Clock>, zone: CalendarZone) -> Self {
        Self { clock, zone }
    }

    pub fn system(zone: CalendarZone) -> Self {
        Self::new(Arc::new(SystemClock), zone)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.zone.wall_time(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_fixed_clock_utc_calendar() {
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 23, 30, 0).unwrap();
        let calendar = Calendar::new(Arc::new(FixedClock(instant)), CalendarZone::Utc);
        assert_eq!(calendar.now().hour(), 23);
        assert_eq!(calendar.instant(), instant);
    }

    #[test]
    fn test_zone_from_config() {
        assert_eq!(CalendarZone::from_config("UTC"), CalendarZone::Utc);
        assert_eq!(CalendarZone::from_config("local"), CalendarZone::Local);
    }
}
