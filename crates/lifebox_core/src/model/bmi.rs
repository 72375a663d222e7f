//! BMI calculator history.

use super::{symbolic_enum, EntityId};

symbolic_enum! {
    /// WHO adult BMI bands.
    BmiClassification {
        Underweight => "UNDERWEIGHT",
        Normal => "NORMAL",
        Overweight => "OVERWEIGHT",
        Obese => "OBESE",
    }
}

impl BmiClassification {
    /// Classifies a BMI value using the WHO cut-offs.
    pub fn for_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BmiRecord {
    pub id: EntityId,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub classification: BmiClassification,
    pub recorded_at: i64,
}
