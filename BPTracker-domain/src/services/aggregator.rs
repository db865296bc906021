use crate::entities::blood_pressure::{Arm, ArmAverages, AverageStats, CanonicalReading};

/// Round to two decimal places, half away from zero
pub fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Calculate combined and per-arm averages
pub fn calculate_averages(readings: &[CanonicalReading]) -> AverageStats {
    AverageStats {
        combined: average_of(readings.iter()),
        left: average_of(readings.iter().filter(|r| r.arm == Arm::Left)),
        right: average_of(readings.iter().filter(|r| r.arm == Arm::Right)),
    }
}

fn average_of<'a, I>(readings: I) -> ArmAverages
where
    I: Iterator<Item = &'a CanonicalReading>,
{
    let mut systolic_sum: f64 = 0.0;
    let mut diastolic_sum: f64 = 0.0;
    let mut count: usize = 0;

    for reading in readings {
        systolic_sum += reading.systolic as f64;
        diastolic_sum += reading.diastolic as f64;
        count += 1;
    }

    if count == 0 {
        return ArmAverages::default();
    }

    ArmAverages {
        avg_systolic: Some(round_to_two(systolic_sum / count as f64)),
        avg_diastolic: Some(round_to_two(diastolic_sum / count as f64)),
        reading_count: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(arm: Arm, systolic: i32, diastolic: i32) -> CanonicalReading {
        CanonicalReading {
            arm,
            systolic,
            diastolic,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_input_has_no_means() {
        let stats = calculate_averages(&[]);
        for subset in [stats.combined, stats.left, stats.right] {
            assert_eq!(subset.reading_count, 0);
            assert!(subset.avg_systolic.is_none());
            assert!(subset.avg_diastolic.is_none());
        }
    }

    #[test]
    fn test_left_only_input() {
        let readings = vec![
            reading(Arm::Left, 118, 76),
            reading(Arm::Left, 121, 79),
            reading(Arm::Left, 125, 83),
        ];

        let stats = calculate_averages(&readings);
        assert_eq!(stats.right.reading_count, 0);
        assert!(stats.right.avg_systolic.is_none());
        assert!(stats.right.avg_diastolic.is_none());
        assert_eq!(stats.left.reading_count, 3);
        assert_eq!(stats.combined.avg_systolic, stats.left.avg_systolic);
        assert_eq!(stats.combined.avg_diastolic, stats.left.avg_diastolic);
        assert_eq!(stats.left.avg_systolic, Some(121.33));
        assert_eq!(stats.left.avg_diastolic, Some(79.33));
    }

    #[test]
    fn test_mixed_arms() {
        let readings = vec![
            reading(Arm::Left, 118, 76),
            reading(Arm::Left, 122, 80),
            reading(Arm::Right, 130, 85),
        ];

        let stats = calculate_averages(&readings);
        assert_eq!(stats.combined.reading_count, 3);
        assert_eq!(stats.combined.avg_systolic, Some(123.33));
        assert_eq!(stats.combined.avg_diastolic, Some(80.33));
        assert_eq!(stats.left.reading_count, 2);
        assert_eq!(stats.left.avg_systolic, Some(120.0));
        assert_eq!(stats.left.avg_diastolic, Some(78.0));
        assert_eq!(stats.right.reading_count, 1);
        assert_eq!(stats.right.avg_systolic, Some(130.0));
        assert_eq!(stats.right.avg_diastolic, Some(85.0));
    }

    #[test]
    fn test_mean_of_half_cent_rounds_away_from_zero() {
        // 200 readings summing to 24001, mean 120.005
        let mut readings: Vec<CanonicalReading> = (0..199).map(|_| reading(Arm::Right, 120, 80)).collect();
        readings.push(reading(Arm::Right, 121, 80));

        let stats = calculate_averages(&readings);
        assert_eq!(stats.combined.avg_systolic, Some(120.01));
        assert_eq!(stats.right.avg_systolic, Some(120.01));
    }

    #[test]
    fn test_round_to_two() {
        assert_eq!(round_to_two(120.125), 120.13);
        assert_eq!(round_to_two(80.0), 80.0);
        assert_eq!(round_to_two(123.333_333), 123.33);
    }
}
