use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_BOOKING_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Must match the server's clinic offset so both agree on "today".
    pub clinic_utc_offset_minutes: i32,
    pub booking_window_days: i64,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            clinic_utc_offset_minutes: 0,
            booking_window_days: DEFAULT_BOOKING_WINDOW_DAYS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_offset_minutes(mut self, minutes: i32) -> Self {
        self.clinic_utc_offset_minutes = minutes;
        self
    }

    pub fn clinic_offset(&self) -> FixedOffset {
        self.clinic_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}
