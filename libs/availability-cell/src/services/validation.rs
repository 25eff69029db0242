use chrono::Duration;

use crate::error::AvailabilityError;
use crate::models::{format_hhmm, Slot, SlotKey};

pub const MIN_SLOT_MINUTES: i64 = 30;

/// Decide whether `candidate` may coexist with the rest of the doctor's
/// slots. Pure function; rules short-circuit in order: missing times, inverted
/// range, too short, exact duplicate, interval overlap.
///
/// `all` is the full slot set including the candidate itself, which is
/// excluded from comparison by `candidate_key`. Conflicts are scoped per day
/// only, not per (day, availability type): a clinic slot and an online slot
/// on the same day still collide.
pub fn validate_slot<'a, I>(
    all: I,
    candidate_key: SlotKey,
    candidate: &Slot,
) -> Result<(), AvailabilityError>
where
    I: IntoIterator<Item = (SlotKey, &'a Slot)>,
{
    let (start, end) = match (candidate.start_time, candidate.end_time) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(AvailabilityError::MissingTime),
    };

    if start >= end {
        return Err(AvailabilityError::InvalidRange {
            start: format_hhmm(start),
            end: format_hhmm(end),
        });
    }

    if end - start < Duration::minutes(MIN_SLOT_MINUTES) {
        return Err(AvailabilityError::TooShort {
            start: format_hhmm(start),
            end: format_hhmm(end),
        });
    }

    for (key, other) in all {
        if key == candidate_key || other.day_of_week != candidate.day_of_week {
            continue;
        }
        // Slots with unset or malformed times cannot conflict yet.
        let (Some(other_start), Some(other_end)) = (other.start_time, other.end_time) else {
            continue;
        };

        if other_start == start && other_end == end {
            return Err(AvailabilityError::DuplicateSlot {
                day: candidate.day_of_week,
                start: format_hhmm(start),
                end: format_hhmm(end),
            });
        }

        if start < other_end && other_start < end {
            return Err(AvailabilityError::OverlapConflict {
                day: candidate.day_of_week,
                start: format_hhmm(start),
                end: format_hhmm(end),
                other_start: format_hhmm(other_start),
                other_end: format_hhmm(other_end),
            });
        }
    }

    Ok(())
}
