use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which arm a measurement was taken on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arm {
    /// Left arm (`l_*` columns)
    Left,
    /// Right arm (`r_*` columns)
    Right,
}

impl Arm {
    /// Column prefix used by the readings table
    pub fn column_prefix(&self) -> &'static str {
        match self {
            Arm::Left => "l",
            Arm::Right => "r",
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::Left => write!(f, "left"),
            Arm::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Arm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Arm::Left),
            "right" | "r" => Ok(Arm::Right),
            _ => Err(format!("invalid arm: {}", s)),
        }
    }
}

/// Storage model for a blood pressure reading, one row of `blood_pressure_readings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RawReading {
    /// Row identifier
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// When the reading was submitted
    pub created_at: DateTime<Utc>,

    /// Left arm systolic
    pub l_systolic: Option<i32>,

    /// Left arm diastolic
    pub l_diastolic: Option<i32>,

    /// Right arm systolic
    pub r_systolic: Option<i32>,

    /// Right arm diastolic
    pub r_diastolic: Option<i32>,
}

impl RawReading {
    /// Both left arm values are present
    pub fn has_left_pair(&self) -> bool {
        self.l_systolic.is_some() && self.l_diastolic.is_some()
    }

    /// Both right arm values are present
    pub fn has_right_pair(&self) -> bool {
        self.r_systolic.is_some() && self.r_diastolic.is_some()
    }

    /// At least one arm pair is complete
    pub fn is_complete(&self) -> bool {
        self.has_left_pair() || self.has_right_pair()
    }
}

/// Input data for storing a new single-arm reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    /// Owning user
    pub user_id: i64,

    /// When the reading was submitted
    pub created_at: DateTime<Utc>,

    /// Arm the values belong to
    pub arm: Arm,

    /// Systolic blood pressure (the higher number)
    pub systolic: i32,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: i32,
}
