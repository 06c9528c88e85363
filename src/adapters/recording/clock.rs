//! Recording adapter for the `Clock` port.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::Clock;

/// Records clock reads while delegating to an inner clock.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingClock {
    /// Creates a new recording clock wrapping the given implementation.
    pub fn new(inner: Box<dyn Clock>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let result = self.inner.now();
        record_interaction(&self.recorder, "clock", "now", &(), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn records_each_reading() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("clock.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "abc")));
        let fixed = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();

        {
            let clock = RecordingClock::new(Box::new(FixedClock(fixed)), Arc::clone(&recorder));
            assert_eq!(clock.now(), fixed);
            assert_eq!(clock.now(), fixed);
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        assert_eq!(recorder.len(), 2);
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("now"));
        assert!(content.contains("2024-06-15T10:30:00Z"));
    }
}
