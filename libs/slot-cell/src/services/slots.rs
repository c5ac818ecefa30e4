// libs/slot-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::debug;

use shared_database::{AppState, ClinicStore};
use shared_models::clinic::Slot;

use crate::models::{SlotQueryError, SlotRange};
use crate::services::availability::{drop_elapsed_today, local_midnight_utc};

pub struct SlotService {
    store: Arc<dyn ClinicStore>,
    offset: FixedOffset,
}

impl SlotService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            offset: state.config.clinic_offset(),
        }
    }

    /// Open slots in the range with today's elapsed ones removed.
    pub async fn available_slots(
        &self,
        range: SlotRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<Slot>, SlotQueryError> {
        let from = local_midnight_utc(range.from, self.offset);
        let to = local_midnight_utc(range.to, self.offset);
        debug!("Listing open slots between {} and {}", from, to);

        let slots = self.store.list_open_slots(from, to).await?;
        let total = slots.len();
        let available = drop_elapsed_today(slots, now, self.offset);

        debug!("{} of {} open slots still bookable", available.len(), total);
        Ok(available)
    }
}
