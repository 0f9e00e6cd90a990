//! Registration request built from a completed wizard.

use serde::Serialize;

use super::fields::{FitnessGoal, Gender, SignupFields};

/// Body of the account-creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationPayload {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    /// `None` serializes as `null` when the typed value has no numeric prefix.
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Gender,
    pub fitness_goal: FitnessGoal,
}

/// Credentials for the authenticate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl RegistrationPayload {
    /// Compose the payload. Returns `None` if the enumerated choices were
    /// never made, which a validated wizard rules out.
    pub fn from_fields(fields: &SignupFields) -> Option<Self> {
        Some(Self {
            email: fields.email.clone(),
            username: derive_username(&fields.email).to_string(),
            password: fields.password.clone(),
            password2: fields.password_confirm.clone(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            date_of_birth: fields.date_of_birth.clone(),
            height: parse_leading_float(&fields.height),
            weight: parse_leading_float(&fields.weight),
            gender: fields.gender?,
            fitness_goal: fields.fitness_goal?,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Everything before the first `@`; the whole string if there is none.
pub fn derive_username(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Parse the longest leading decimal number, so `"72.5kg"` gives `72.5`.
/// Leading whitespace is skipped. Returns `None` when no digits lead.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Optional exponent, only taken if it has digits.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> SignupFields {
        SignupFields {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane.doe@example.com".into(),
            date_of_birth: "1995-06-15".into(),
            height: "168".into(),
            weight: "61.5".into(),
            gender: Some(Gender::Female),
            fitness_goal: Some(FitnessGoal::ImproveEndurance),
            password: "correct horse".into(),
            password_confirm: "correct horse".into(),
        }
    }

    #[test]
    fn username_is_local_part() {
        assert_eq!(derive_username("jane.doe@example.com"), "jane.doe");
        assert_eq!(derive_username("a@b@c"), "a");
        assert_eq!(derive_username("no-at-sign"), "no-at-sign");
        assert_eq!(derive_username("@example.com"), "");
    }

    #[test]
    fn payload_serializes_backend_field_names() {
        let payload = RegistrationPayload::from_fields(&complete_fields()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["username"], "jane.doe");
        assert_eq!(json["password2"], "correct horse");
        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["date_of_birth"], "1995-06-15");
        assert_eq!(json["height"], 168.0);
        assert_eq!(json["weight"], 61.5);
        assert_eq!(json["gender"], "female");
        assert_eq!(json["fitness_goal"], "improve_endurance");
    }

    #[test]
    fn payload_requires_choices() {
        let mut fields = complete_fields();
        fields.fitness_goal = None;
        assert!(RegistrationPayload::from_fields(&fields).is_none());
    }

    #[test]
    fn non_numeric_measurements_become_null() {
        let mut fields = complete_fields();
        fields.height = "tall".into();
        let json = serde_json::to_value(RegistrationPayload::from_fields(&fields).unwrap()).unwrap();
        assert!(json["height"].is_null());
    }

    #[test]
    fn leading_float_parsing() {
        assert_eq!(parse_leading_float("72.5kg"), Some(72.5));
        assert_eq!(parse_leading_float("  180"), Some(180.0));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("kg"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }
}
