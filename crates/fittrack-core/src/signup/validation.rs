//! Per-step field checks.
//!
//! Each step only looks at its own fields, so going back never trips over
//! something the user has not reached yet.

use thiserror::Error;

use super::fields::{is_iso_date_shape, SignupFields};
use super::wizard::Step;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Why a step refused to advance. The display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepViolation {
    #[error("Please fill in all personal information (missing: {})", .missing.join(", "))]
    MissingPersonalInfo { missing: Vec<&'static str> },

    #[error("Date of birth must be in format YYYY-MM-DD (e.g., 1995-06-15)")]
    MalformedDateOfBirth,

    #[error("Please fill in all physical profile information (missing: {})", .missing.join(", "))]
    MissingPhysicalProfile { missing: Vec<&'static str> },

    #[error("Please select your fitness goal")]
    MissingFitnessGoal,

    #[error("Please enter and confirm your password")]
    MissingPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
}

/// Check the fields owned by `step`.
pub fn validate_step(step: Step, fields: &SignupFields) -> Result<(), StepViolation> {
    match step {
        Step::PersonalInfo => personal_info(fields),
        Step::PhysicalProfile => physical_profile(fields),
        Step::FitnessGoal => fitness_goal(fields),
        Step::Password => password(fields),
    }
}

fn missing(pairs: &[(&'static str, bool)]) -> Vec<&'static str> {
    pairs
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

fn personal_info(fields: &SignupFields) -> Result<(), StepViolation> {
    let missing = missing(&[
        ("first name", !fields.first_name.is_empty()),
        ("last name", !fields.last_name.is_empty()),
        ("email", !fields.email.is_empty()),
        ("date of birth", !fields.date_of_birth.is_empty()),
    ]);
    if !missing.is_empty() {
        return Err(StepViolation::MissingPersonalInfo { missing });
    }
    if !is_iso_date_shape(&fields.date_of_birth) {
        return Err(StepViolation::MalformedDateOfBirth);
    }
    Ok(())
}

fn physical_profile(fields: &SignupFields) -> Result<(), StepViolation> {
    let missing = missing(&[
        ("height", !fields.height.is_empty()),
        ("weight", !fields.weight.is_empty()),
        ("gender", fields.gender.is_some()),
    ]);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StepViolation::MissingPhysicalProfile { missing })
    }
}

fn fitness_goal(fields: &SignupFields) -> Result<(), StepViolation> {
    match fields.fitness_goal {
        Some(_) => Ok(()),
        None => Err(StepViolation::MissingFitnessGoal),
    }
}

fn password(fields: &SignupFields) -> Result<(), StepViolation> {
    if fields.password.is_empty() || fields.password_confirm.is_empty() {
        return Err(StepViolation::MissingPassword);
    }
    if fields.password != fields.password_confirm {
        return Err(StepViolation::PasswordMismatch);
    }
    if fields.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StepViolation::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signup::fields::{FitnessGoal, Gender};

    fn with_password(pw: &str, confirm: &str) -> SignupFields {
        SignupFields {
            password: pw.into(),
            password_confirm: confirm.into(),
            ..Default::default()
        }
    }

    #[test]
    fn personal_info_names_missing_fields() {
        let fields = SignupFields {
            first_name: "Jane".into(),
            date_of_birth: "1995-06-15".into(),
            ..Default::default()
        };
        let err = validate_step(Step::PersonalInfo, &fields).unwrap_err();
        assert_eq!(
            err,
            StepViolation::MissingPersonalInfo {
                missing: vec!["last name", "email"]
            }
        );
        assert!(err.to_string().contains("last name, email"));
    }

    #[test]
    fn personal_info_checks_date_after_presence() {
        let fields = SignupFields {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            date_of_birth: "06-15-1995".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_step(Step::PersonalInfo, &fields),
            Err(StepViolation::MalformedDateOfBirth)
        );
    }

    #[test]
    fn physical_profile_is_presence_only() {
        let fields = SignupFields {
            height: "tall".into(),
            weight: "-3".into(),
            gender: Some(Gender::Other),
            ..Default::default()
        };
        assert!(validate_step(Step::PhysicalProfile, &fields).is_ok());
    }

    #[test]
    fn fitness_goal_required() {
        let mut fields = SignupFields::default();
        assert_eq!(
            validate_step(Step::FitnessGoal, &fields),
            Err(StepViolation::MissingFitnessGoal)
        );
        fields.fitness_goal = Some(FitnessGoal::Maintain);
        assert!(validate_step(Step::FitnessGoal, &fields).is_ok());
    }

    #[test]
    fn password_rules_in_order() {
        assert_eq!(
            validate_step(Step::Password, &with_password("", "")),
            Err(StepViolation::MissingPassword)
        );
        assert_eq!(
            validate_step(Step::Password, &with_password("abcdefgh", "abcdefgi")),
            Err(StepViolation::PasswordMismatch)
        );
        assert_eq!(
            validate_step(Step::Password, &with_password("abc1234", "abc1234")),
            Err(StepViolation::PasswordTooShort)
        );
        assert!(validate_step(Step::Password, &with_password("abc12345", "abc12345")).is_ok());
    }

    #[test]
    fn seven_chars_fail_even_when_mismatched() {
        assert!(validate_step(Step::Password, &with_password("abc1234", "zzz")).is_err());
    }

    #[test]
    fn too_short_message() {
        assert_eq!(
            StepViolation::PasswordTooShort.to_string(),
            "Password must be at least 8 characters"
        );
    }
}
