// libs/booking-cell/src/services/upcoming.rs
use chrono::{DateTime, Duration, Utc};

use shared_models::clinic::BookingWithSlot;

/// Order by slot start, earliest first; bookings without a slot sink to the end.
pub fn sort_by_start(bookings: &mut [BookingWithSlot]) {
    bookings.sort_by_key(|entry| (entry.starts_at().is_none(), entry.starts_at()));
}

/// Active bookings starting in `(now, now + window]`, earliest first, at most `limit`.
pub fn select_upcoming(
    bookings: Vec<BookingWithSlot>,
    now: DateTime<Utc>,
    window: Duration,
    limit: usize,
) -> Vec<BookingWithSlot> {
    let horizon = now + window;

    let mut upcoming: Vec<BookingWithSlot> = bookings
        .into_iter()
        .filter(|entry| entry.booking.is_active())
        .filter(|entry| {
            entry
                .starts_at()
                .is_some_and(|start| start > now && start <= horizon)
        })
        .collect();

    sort_by_start(&mut upcoming);
    upcoming.truncate(limit);
    upcoming
}
