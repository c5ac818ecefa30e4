use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc, Weekday};
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::clinic::{BookingWithSlot, Slot};
use slot_cell::availability::{filter_for_date, local_date};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ClientError;

pub const BOOKED_MESSAGE: &str = "Appointment booked successfully";

/// Whether `date` can be picked: not in the past, within `window_days` of
/// `today`, and not a Saturday or Sunday.
pub fn check_bookable_date(date: NaiveDate, today: NaiveDate, window_days: i64) -> Result<(), ClientError> {
    if date < today {
        return Err(ClientError::Validation("Please choose a date from today onwards".to_string()));
    }
    if date > today + Duration::days(window_days) {
        return Err(ClientError::Validation(format!(
            "Appointments can only be booked up to {} days ahead",
            window_days
        )));
    }
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(ClientError::Validation("The clinic is closed on weekends".to_string()));
    }
    Ok(())
}

/// State of the booking page: the picked date, its open slots, the chosen
/// slot and the alert currently shown.
pub struct BookingFlow {
    api: ApiClient,
    offset: FixedOffset,
    window_days: i64,
    selected_date: Option<NaiveDate>,
    slots: Vec<Slot>,
    chosen: Option<Uuid>,
    alert: Option<String>,
}

impl BookingFlow {
    pub fn new(api: ApiClient, config: &ClientConfig) -> Self {
        Self {
            api,
            offset: config.clinic_offset(),
            window_days: config.booking_window_days,
            selected_date: None,
            slots: Vec::new(),
            chosen: None,
            alert: None,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn chosen_slot(&self) -> Option<&Slot> {
        let chosen = self.chosen?;
        self.slots.iter().find(|slot| slot.id == chosen)
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            self.alert = Some(err.alert_message());
        }
        result
    }

    /// Pick a date and load its bookable slots.
    pub async fn select_date(&mut self, date: NaiveDate, now: DateTime<Utc>) -> Result<&[Slot], ClientError> {
        let today = local_date(now, self.offset);
        let checked = check_bookable_date(date, today, self.window_days);
        self.record(checked)?;

        self.selected_date = Some(date);
        self.chosen = None;
        self.alert = None;

        let next_day = date + Duration::days(1);
        let fetched = self.api.available_slots(date, next_day).await;
        let slots = self.record(fetched)?;

        self.slots = filter_for_date(slots, date, now, self.offset);
        Ok(self.slots.as_slice())
    }

    pub fn choose_slot(&mut self, slot_id: Uuid) -> Result<&Slot, ClientError> {
        if !self.slots.iter().any(|slot| slot.id == slot_id) {
            let err = ClientError::Validation("That time is not available on the selected date".to_string());
            return self.record(Err(err));
        }

        self.chosen = Some(slot_id);
        self.alert = None;
        self.chosen_slot()
            .ok_or_else(|| ClientError::Validation("Please select a time slot".to_string()))
    }

    /// Book the chosen slot, then reload the selected date whatever the outcome.
    pub async fn confirm(&mut self, now: DateTime<Utc>) -> Result<BookingWithSlot, ClientError> {
        let (Some(date), Some(slot_id)) = (self.selected_date, self.chosen) else {
            let err = ClientError::Validation("Please select a date and a time slot".to_string());
            return self.record(Err(err));
        };

        let outcome = match self.api.create_booking(slot_id).await {
            Ok(created) => {
                info!("Booked slot {} as booking {}", slot_id, created.booking.booking.id);
                Ok(created.booking)
            }
            Err(ClientError::Conflict(_)) => Err(ClientError::SlotTaken(slot_id)),
            Err(err) => Err(err),
        };
        self.chosen = None;

        if let Err(refresh_err) = self.reload(date, now).await {
            warn!("Failed to refresh slots for {}: {}", date, refresh_err);
        }

        match outcome {
            Ok(booking) => {
                self.alert = Some(BOOKED_MESSAGE.to_string());
                Ok(booking)
            }
            Err(err) => self.record(Err(err)),
        }
    }

    async fn reload(&mut self, date: NaiveDate, now: DateTime<Utc>) -> Result<(), ClientError> {
        let slots = self.api.available_slots(date, date + Duration::days(1)).await?;
        self.slots = filter_for_date(slots, date, now, self.offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bookable_date_rules() {
        // Tuesday
        let today = date(2026, 3, 10);

        assert!(check_bookable_date(today, today, 30).is_ok());
        assert!(check_bookable_date(date(2026, 3, 13), today, 30).is_ok());
        assert_matches!(check_bookable_date(date(2026, 3, 9), today, 30), Err(ClientError::Validation(_)));
        assert_matches!(check_bookable_date(date(2026, 3, 14), today, 30), Err(ClientError::Validation(_)));
        assert_matches!(check_bookable_date(date(2026, 3, 15), today, 30), Err(ClientError::Validation(_)));
        // today + 30 is a Thursday; +31 is out of range
        assert!(check_bookable_date(date(2026, 4, 9), today, 30).is_ok());
        assert_matches!(check_bookable_date(date(2026, 4, 10), today, 30), Err(ClientError::Validation(_)));
    }
}
