use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use bp_tracker_data::models::{NewReading, RawReading};

use crate::entities::blood_pressure::{Arm, CanonicalReading, CreateReadingRequest};

// Conversion functions between data models and domain entities

/// Extract the arm-tagged values of a stored row
///
/// A complete left pair wins; otherwise a complete right pair; otherwise the
/// row yields nothing. A row with both pairs complete only yields its left
/// values.
pub fn convert_to_canonical_reading(raw: &RawReading) -> Option<CanonicalReading> {
    let (arm, systolic, diastolic) = match (raw.l_systolic, raw.l_diastolic, raw.r_systolic, raw.r_diastolic) {
        (Some(systolic), Some(diastolic), _, _) => (Arm::Left, systolic, diastolic),
        (_, _, Some(systolic), Some(diastolic)) => (Arm::Right, systolic, diastolic),
        _ => return None,
    };

    Some(CanonicalReading {
        arm,
        systolic,
        diastolic,
        timestamp: raw.created_at,
    })
}

/// Convert a validated domain request to the data layer insert payload
pub fn convert_to_new_reading(request: &CreateReadingRequest) -> NewReading {
    NewReading {
        user_id: request.user_id,
        created_at: request.created_at,
        arm: request.arm,
        systolic: request.systolic,
        diastolic: request.diastolic,
    }
}

/// Express a UTC instant in the given zone, keeping the concrete offset
pub fn convert_to_zoned(instant: DateTime<Utc>, timezone: Tz) -> DateTime<FixedOffset> {
    instant.with_timezone(&timezone).fixed_offset()
}
