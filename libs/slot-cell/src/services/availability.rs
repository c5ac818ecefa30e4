// libs/slot-cell/src/services/availability.rs
//
// Pure availability rules. Every function takes "now" and the clinic offset
// explicitly so callers (server and client alike) decide what today means.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use shared_models::clinic::Slot;

/// Calendar date of `instant` on the clinic's wall clock.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// UTC instant of local midnight at the start of `date`.
pub fn local_midnight_utc(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::default());
    Utc.from_utc_datetime(&(local_midnight - Duration::seconds(offset.local_minus_utc() as i64)))
}

/// Slots still bookable for `target`.
///
/// When `target` is today only slots starting strictly after `now` survive;
/// any other date is returned untouched (past dates are never trimmed).
pub fn filter_for_date(
    slots: Vec<Slot>,
    target: NaiveDate,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<Slot> {
    if target != local_date(now, offset) {
        return slots;
    }

    slots.into_iter().filter(|slot| slot.start_time > now).collect()
}

/// Per-slot form of [`filter_for_date`] for listings spanning several days:
/// a slot that falls on today must start after `now`, others are kept.
pub fn drop_elapsed_today(slots: Vec<Slot>, now: DateTime<Utc>, offset: FixedOffset) -> Vec<Slot> {
    let today = local_date(now, offset);

    slots
        .into_iter()
        .filter(|slot| local_date(slot.start_time, offset) != today || slot.start_time > now)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_models::clinic::SlotStatus;
    use uuid::Uuid;

    fn slot_at(start_time: DateTime<Utc>) -> Slot {
        Slot {
            id: Uuid::new_v4(),
            doctor_id: None,
            start_time,
            end_time: start_time + Duration::minutes(30),
            status: SlotStatus::Open,
            created_at: start_time - Duration::days(7),
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_today_keeps_only_future_slots() {
        let now = noon();
        let past = slot_at(now - Duration::hours(1));
        let future = slot_at(now + Duration::hours(1));

        let kept = filter_for_date(
            vec![past, future.clone()],
            now.date_naive(),
            now,
            utc(),
        );

        assert_eq!(kept, vec![future]);
    }

    #[test]
    fn test_slot_starting_exactly_now_is_dropped() {
        let now = noon();
        let kept = filter_for_date(vec![slot_at(now)], now.date_naive(), now, utc());
        assert!(kept.is_empty());
    }

    #[test]
    fn test_future_day_is_untouched() {
        let now = noon();
        let tomorrow = now.date_naive().succ_opt().unwrap();
        let early = slot_at(now + Duration::hours(13)); // 01:00 tomorrow
        let late = slot_at(now + Duration::hours(30));

        let kept = filter_for_date(vec![early.clone(), late.clone()], tomorrow, now, utc());
        assert_eq!(kept, vec![early, late]);
    }

    #[test]
    fn test_past_day_is_not_trimmed_retroactively() {
        let now = noon();
        let yesterday = now.date_naive().pred_opt().unwrap();
        let old = slot_at(now - Duration::hours(26));

        let kept = filter_for_date(vec![old.clone()], yesterday, now, utc());
        assert_eq!(kept, vec![old]);
    }

    #[test]
    fn test_today_is_judged_on_clinic_clock() {
        // 23:30 UTC on the 10th is already the 11th at UTC+2.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let elapsed = slot_at(now - Duration::minutes(20)); // 01:10 local on the 11th

        let local_today = local_date(now, plus_two);
        assert_eq!(local_today, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert!(filter_for_date(vec![elapsed.clone()], local_today, now, plus_two).is_empty());
        assert_eq!(
            filter_for_date(vec![elapsed.clone()], now.date_naive(), now, plus_two),
            vec![elapsed]
        );
    }

    #[test]
    fn test_drop_elapsed_today_spans_days() {
        let now = noon();
        let past_today = slot_at(now - Duration::hours(2));
        let later_today = slot_at(now + Duration::hours(2));
        let yesterday = slot_at(now - Duration::days(1));
        let tomorrow = slot_at(now + Duration::days(1));

        let kept = drop_elapsed_today(
            vec![yesterday.clone(), past_today, later_today.clone(), tomorrow.clone()],
            now,
            utc(),
        );
        assert_eq!(kept, vec![yesterday, later_today, tomorrow]);
    }

    #[test]
    fn test_local_midnight_respects_offset() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();

        let start = local_midnight_utc(date, minus_five);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 11, 5, 0, 0).unwrap());
        assert_eq!(local_midnight_utc(date.succ_opt().unwrap(), minus_five) - start, Duration::days(1));
    }
}
