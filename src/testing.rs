use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Clock pinned to one instant so stamped timestamps can be asserted exactly.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub(crate) fn from_millis(millis: i64) -> Self {
        Self(DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}
