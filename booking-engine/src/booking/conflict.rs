//! Conflict window arithmetic
//!
//! A booking at (date, time) owns an inclusive exclusion window of
//! `[t - buffer, t + buffer]` — the buffer models typical seating
//! duration plus turnover. Everything here is pure and deterministic;
//! both allocation and re-validation are built on these functions.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::utils::time;

const MINUTE_MS: i64 = 60_000;

/// Inclusive exclusion window around a booking, in Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferWindow {
    pub start: i64,
    pub end: i64,
}

impl BufferWindow {
    /// Window of `buffer_minutes` on each side of the scheduled time,
    /// resolved in the business timezone
    pub fn around(date: NaiveDate, time_of_day: NaiveTime, buffer_minutes: i64, tz: Tz) -> Self {
        let center = time::date_time_to_millis(date, time_of_day, tz);
        let half = buffer_minutes * MINUTE_MS;
        Self {
            start: center - half,
            end: center + half,
        }
    }

    pub fn contains(&self, instant: i64) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Inclusive interval intersection: touching endpoints conflict
    pub fn overlaps(&self, other: &BufferWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// True if the candidate window intersects any existing one
pub fn conflicts_with_any<I>(candidate: &BufferWindow, existing: I) -> bool
where
    I: IntoIterator<Item = BufferWindow>,
{
    existing.into_iter().any(|w| candidate.overlaps(&w))
}
