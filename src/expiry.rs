//! Expiry evaluation
//!
//! Payload years are two digits and always read as `20YY`. There is no
//! rollover policy past 2099.

use crate::error::{Error, Result};
use crate::payload::{ExpiryFields, FIELD_WIDTH};
use chrono::{DateTime, NaiveDate, Utc};

/// Century prefixed to the two-digit payload year
const CENTURY: i32 = 2000;

/// Build the UTC instant described by the payload's expiry fields
pub fn expiry_instant(expiry: &ExpiryFields) -> Result<DateTime<Utc>> {
    let unparseable = || Error::ExpiryUnparseable(expiry.to_string());

    let year = number(&expiry.year).ok_or_else(unparseable)?;
    let month = number(&expiry.month).ok_or_else(unparseable)?;
    let day = number(&expiry.day).ok_or_else(unparseable)?;
    let hour = number(&expiry.hour).ok_or_else(unparseable)?;
    let minute = number(&expiry.minute).ok_or_else(unparseable)?;

    NaiveDate::from_ymd_opt(CENTURY + year as i32, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(unparseable)
}

/// Whether a pass with this expiry is still valid at `now`
///
/// The comparison is inclusive: a pass expiring exactly at `now` is valid.
pub fn is_valid(expiry: &ExpiryFields, now: DateTime<Utc>) -> Result<bool> {
    Ok(expiry_instant(expiry)? >= now)
}

/// Check expiry, returning the expiry instant or an `Expired` error
pub(crate) fn check(expiry: &ExpiryFields, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let instant = expiry_instant(expiry)?;
    if instant >= now {
        Ok(instant)
    } else {
        Err(Error::Expired {
            expired_at: instant.to_rfc3339(),
            now: now.to_rfc3339(),
        })
    }
}

/// Parse a field of exactly two ASCII digits
fn number(field: &str) -> Option<u32> {
    if field.len() != FIELD_WIDTH || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
