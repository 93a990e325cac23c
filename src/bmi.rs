//! Body mass index calculation and classification

use serde::Serialize;

/// BMI bands, ordered from lightest to heaviest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Unavailable,
    Underweight,
    Healthy,
    Overweight,
    ObesityI,
    ObesityII,
    ObesityIII,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Unavailable => "Unavailable",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObesityI => "Obesity I",
            BmiCategory::ObesityII => "Obesity II",
            BmiCategory::ObesityIII => "Obesity III",
        }
    }
}

/// Computed BMI value with its band
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Bmi {
    pub value: Option<f64>,
    pub category: BmiCategory,
}

/// Compute BMI (kg / m²) rounded to two decimals and classify it.
///
/// Missing or non-positive inputs yield `Unavailable` with no value.
pub fn bmi(weight_kg: Option<f64>, height_m: Option<f64>) -> Bmi {
    let (weight, height) = match (weight_kg, height_m) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => (w, h),
        _ => {
            return Bmi {
                value: None,
                category: BmiCategory::Unavailable,
            };
        }
    };

    let value = (weight / (height * height) * 100.0).round() / 100.0;
    let category = if value <= 18.5 {
        BmiCategory::Underweight
    } else if value <= 24.9 {
        BmiCategory::Healthy
    } else if value <= 29.9 {
        BmiCategory::Overweight
    } else if value <= 34.9 {
        BmiCategory::ObesityI
    } else if value <= 39.9 {
        BmiCategory::ObesityII
    } else {
        BmiCategory::ObesityIII
    };

    Bmi {
        value: Some(value),
        category,
    }
}
