use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Decides whether a supplier/agency cancellation needs admin approval.
/// Pure and deterministic; the approval window is the only tunable and is
/// owned here, not by callers.
#[derive(Clone, Copy)]
pub struct CancellationPolicy {
    approval_window: Duration,
}

impl CancellationPolicy {
    pub fn new(window_hours: i64) -> Self {
        Self {
            approval_window: Duration::hours(window_hours),
        }
    }

    /// True when the travel date is close enough to `now` that a non-admin
    /// cancellation must go through the request/approval path. Admin callers
    /// skip this check entirely.
    pub fn requires_approval(&self, travel_date: NaiveDate, now: DateTime<Utc>) -> bool {
        let travel_start = Utc.from_utc_datetime(&travel_date.and_time(NaiveTime::MIN));
        travel_start - now <= self.approval_window
    }
}
