use crate::entities::blood_pressure::{AverageStats, BloodPressureCategory};

/// Categorize blood pressure based on (possibly fractional) mean values
///
/// Thresholds are evaluated in order; the first match wins.
pub fn categorize_blood_pressure(systolic: f64, diastolic: f64) -> BloodPressureCategory {
    if systolic < 120.0 && diastolic < 80.0 {
        BloodPressureCategory::Normal
    } else if systolic < 130.0 && diastolic < 80.0 {
        BloodPressureCategory::Elevated
    } else if (130.0..140.0).contains(&systolic) || (80.0..90.0).contains(&diastolic) {
        BloodPressureCategory::Stage1High
    } else if systolic >= 140.0 || diastolic >= 90.0 {
        BloodPressureCategory::Stage2High
    } else {
        BloodPressureCategory::Unknown
    }
}

/// Category of the combined means, if there are any
pub fn categorize_stats(stats: &AverageStats) -> Option<BloodPressureCategory> {
    match (stats.combined.avg_systolic, stats.combined.avg_diastolic) {
        (Some(systolic), Some(diastolic)) => Some(categorize_blood_pressure(systolic, diastolic)),
        _ => None,
    }
}
