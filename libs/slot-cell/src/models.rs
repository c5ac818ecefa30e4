// libs/slot-cell/src/models.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;

/// Longest range a single listing request may cover.
pub const MAX_RANGE_DAYS: i64 = 31;

/// Calendar years a query date may fall in.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1970..=9999;

/// Raw `?from=&to=` parameters; kept as strings so a bad date is a 400 with
/// our own message rather than an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A validated half-open range of clinic calendar days, `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl SlotRange {
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date.succ_opt().unwrap_or(date),
        }
    }

    pub fn parse(params: &SlotQueryParams) -> Result<Self, SlotQueryError> {
        let from = params
            .from
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or(SlotQueryError::MissingDate)
            .and_then(parse_date)?;

        let range = match params.to.as_deref().filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Self { from, to: parse_date(raw)? },
            None => Self::single_day(from),
        };

        let days = (range.to - range.from).num_days();
        if days <= 0 {
            return Err(SlotQueryError::EmptyRange);
        }
        if days > MAX_RANGE_DAYS {
            return Err(SlotQueryError::RangeTooLong(days));
        }

        Ok(range)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, SlotQueryError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .filter(|date| YEAR_RANGE.contains(&date.year()))
        .ok_or_else(|| SlotQueryError::InvalidDate(raw.to_string()))
}

#[derive(Error, Debug)]
pub enum SlotQueryError {
    #[error("Missing 'from' date")]
    MissingDate,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("'to' must be after 'from'")]
    EmptyRange,

    #[error("Date range of {0} days exceeds the {max} day limit", max = MAX_RANGE_DAYS)]
    RangeTooLong(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SlotQueryError> for AppError {
    fn from(err: SlotQueryError) -> Self {
        match err {
            SlotQueryError::Store(store) => store.into(),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
