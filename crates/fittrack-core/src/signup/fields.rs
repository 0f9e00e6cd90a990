//! Form fields collected by the signup wizard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Fitness goal picked on the third step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    LoseWeight,
    GainMuscle,
    Maintain,
    ImproveEndurance,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 4] = [
        FitnessGoal::LoseWeight,
        FitnessGoal::GainMuscle,
        FitnessGoal::Maintain,
        FitnessGoal::ImproveEndurance,
    ];

    /// Wire value sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "lose_weight",
            FitnessGoal::GainMuscle => "gain_muscle",
            FitnessGoal::Maintain => "maintain",
            FitnessGoal::ImproveEndurance => "improve_endurance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "Lose Weight",
            FitnessGoal::GainMuscle => "Gain Muscle",
            FitnessGoal::Maintain => "Maintain Health",
            FitnessGoal::ImproveEndurance => "Improve Endurance",
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessGoal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FitnessGoal::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownChoice {
                kind: "fitness goal",
                value: s.to_string(),
            })
    }
}

/// Gender choice on the physical profile step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownChoice {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

/// Everything the user typed so far. Values are kept verbatim; checks live
/// in [`super::validation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupFields {
    // Step 1: personal info
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    // Step 2: physical profile
    pub height: String,
    pub weight: String,
    pub gender: Option<Gender>,
    // Step 3
    pub fitness_goal: Option<FitnessGoal>,
    // Step 4
    pub password: String,
    pub password_confirm: String,
}

/// True when `value` looks like `YYYY-MM-DD`: four ASCII digits, dash, two
/// digits, dash, two digits. Calendar validity is not checked.
pub fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
