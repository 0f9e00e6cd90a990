//! Multi-step account signup.
//!
//! - [`fields`]: the values typed on each step and the enumerated choices
//! - [`validation`]: per-step checks
//! - [`payload`]: the registration request and username derivation
//! - [`wizard`]: the state machine that ties them to the backend

pub mod fields;
pub mod payload;
pub mod validation;
pub mod wizard;

pub use fields::{is_iso_date_shape, FitnessGoal, Gender, SignupFields};
pub use payload::{derive_username, Credentials, RegistrationPayload};
pub use validation::{validate_step, StepViolation, MIN_PASSWORD_LEN};
pub use wizard::{
    creation_failure_message, Progress, Retreat, SignupError, SignupWizard, Step, SubmitOutcome,
    Transition,
};
