//! Four-step signup state machine.
//!
//! ```text
//! PersonalInfo -> PhysicalProfile -> FitnessGoal -> Password -> Submitting
//!                                                                  |
//!                                   SignedIn / CreatedNeedsLogin / Failed
//! ```
//!
//! The caller owns one [`SignupWizard`] per signup run. All transitions take
//! `&mut self`, so a second submission cannot start while one is in flight.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{AuthApi, RemoteErrorBody};
use crate::error::ApiError;
use crate::storage::session::{clear_session, persist_session, SessionStore};

use super::fields::SignupFields;
use super::payload::RegistrationPayload;
use super::validation::{validate_step, StepViolation};

const GENERIC_CREATE_FAILURE: &str = "Failed to create account";
const CREATED_PLEASE_LOGIN: &str = "Account created successfully! Please login.";

/// A page of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    PersonalInfo = 1,
    PhysicalProfile = 2,
    FitnessGoal = 3,
    Password = 4,
}

impl Step {
    pub const COUNT: u8 = 4;

    /// 1-based position.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal Information",
            Step::PhysicalProfile => "Physical Profile",
            Step::FitnessGoal => "Fitness Goal",
            Step::Password => "Create Password",
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::PersonalInfo => Some(Step::PhysicalProfile),
            Step::PhysicalProfile => Some(Step::FitnessGoal),
            Step::FitnessGoal => Some(Step::Password),
            Step::Password => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::PersonalInfo => None,
            Step::PhysicalProfile => Some(Step::PersonalInfo),
            Step::FitnessGoal => Some(Step::PhysicalProfile),
            Step::Password => Some(Step::FitnessGoal),
        }
    }
}

/// Result of a successful [`SignupWizard::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward to this step.
    Moved(Step),
    /// Password step passed; [`SignupWizard::submit`] must run next.
    Submitting,
}

/// Result of [`SignupWizard::retreat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(Step),
    /// Back was pressed on the first step: leave the wizard.
    Exit,
}

/// What the caller should do once submission settles.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Account created and signed in; tokens are stored. Go to the main app.
    SignedIn { user: serde_json::Value },
    /// Account created but sign-in failed. Show `message`, go to sign-in.
    CreatedNeedsLogin { message: String },
    /// Account creation failed. Show `message`, stay on the password step.
    Failed { message: String },
}

/// Combined result of [`SignupWizard::next`].
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Moved(Step),
    Submitted(SubmitOutcome),
}

/// Errors from driving the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    /// The current step's fields did not pass; the step is unchanged.
    #[error("{0}")]
    Invalid(#[from] StepViolation),

    /// A submission is already in flight.
    #[error("Account creation already in progress")]
    Busy,

    /// `submit` was called without a successful password step.
    #[error("Nothing to submit yet")]
    NotReady,
}

#[derive(Debug, Clone)]
enum Phase {
    Editing,
    Submitting(RegistrationPayload),
}

/// Controller for the signup flow.
#[derive(Debug, Clone)]
pub struct SignupWizard {
    step: Step,
    fields: SignupFields,
    phase: Phase,
}

impl Default for SignupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupWizard {
    pub fn new() -> Self {
        Self {
            step: Step::PersonalInfo,
            fields: SignupFields::default(),
            phase: Phase::Editing,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn fields(&self) -> &SignupFields {
        &self.fields
    }

    /// Mutable access for input handlers. Edits never move the step.
    pub fn fields_mut(&mut self) -> &mut SignupFields {
        &mut self.fields
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    /// Validate the current step and move forward.
    ///
    /// On the password step a successful check enters the submitting phase;
    /// the caller then runs [`Self::submit`]. While submitting, every call
    /// returns [`SignupError::Busy`].
    pub fn advance(&mut self) -> Result<Transition, SignupError> {
        if self.is_submitting() {
            return Err(SignupError::Busy);
        }

        if let Err(violation) = validate_step(self.step, &self.fields) {
            tracing::debug!(step = self.step.number(), %violation, "step rejected");
            return Err(violation.into());
        }

        match self.step.next() {
            Some(next) => {
                tracing::debug!(from = self.step.number(), to = next.number(), "step advanced");
                self.step = next;
                Ok(Transition::Moved(next))
            }
            None => {
                // Password passed, so the earlier steps did too; choices are set.
                let payload =
                    RegistrationPayload::from_fields(&self.fields).ok_or(SignupError::NotReady)?;
                self.phase = Phase::Submitting(payload);
                Ok(Transition::Submitting)
            }
        }
    }

    /// Step back without clearing anything.
    pub fn retreat(&mut self) -> Retreat {
        match self.step.previous() {
            Some(prev) => {
                self.step = prev;
                Retreat::Moved(prev)
            }
            None => Retreat::Exit,
        }
    }

    /// Create the account, then sign in with the same credentials.
    ///
    /// Tokens and the user record are written to `store` only after sign-in
    /// succeeds. A created account is never rolled back.
    pub async fn submit(
        &mut self,
        api: &dyn AuthApi,
        store: &dyn SessionStore,
    ) -> Result<SubmitOutcome, SignupError> {
        let payload = match &self.phase {
            Phase::Submitting(payload) => payload.clone(),
            Phase::Editing => return Err(SignupError::NotReady),
        };

        let outcome = run_submission(&payload, api, store).await;
        self.phase = Phase::Editing;
        Ok(outcome)
    }

    /// One press of the "next" button: advance, and submit when the password
    /// step passes.
    pub async fn next(
        &mut self,
        api: &dyn AuthApi,
        store: &dyn SessionStore,
    ) -> Result<Progress, SignupError> {
        match self.advance()? {
            Transition::Moved(step) => Ok(Progress::Moved(step)),
            Transition::Submitting => Ok(Progress::Submitted(self.submit(api, store).await?)),
        }
    }
}

async fn run_submission(
    payload: &RegistrationPayload,
    api: &dyn AuthApi,
    store: &dyn SessionStore,
) -> SubmitOutcome {
    if let Err(err) = api.signup(payload).await {
        tracing::warn!(error = %err, "account creation failed");
        return SubmitOutcome::Failed {
            message: creation_failure_message(&err),
        };
    }
    tracing::info!(username = %payload.username, "account created");

    let login = match api.login(&payload.credentials()).await {
        Ok(login) => login,
        Err(err) => {
            tracing::warn!(error = %err, "sign-in after signup failed");
            return created_needs_login();
        }
    };

    if let Err(err) = persist_session(store, &login) {
        tracing::warn!(error = %err, "could not store session");
        if let Err(err) = clear_session(store) {
            tracing::warn!(error = %err, "could not clear partial session");
        }
        return created_needs_login();
    }

    tracing::info!("signed in after signup");
    SubmitOutcome::SignedIn { user: login.user }
}

fn created_needs_login() -> SubmitOutcome {
    SubmitOutcome::CreatedNeedsLogin {
        message: CREATED_PLEASE_LOGIN.to_string(),
    }
}

/// User-facing text for a failed account creation.
///
/// Field-keyed bodies become one `field: msg, msg` line per field. A
/// response without a body is described by its status code.
pub fn creation_failure_message(err: &ApiError) -> String {
    let message = match err {
        ApiError::Status { status, body } => match body {
            RemoteErrorBody::Fields(_) | RemoteErrorBody::Message(_) => body.to_string(),
            RemoteErrorBody::Empty => format!("Request failed with status code {status}"),
        },
        ApiError::Network(msg) | ApiError::Decode(msg) => msg.clone(),
        other => other.to_string(),
    };
    if message.is_empty() {
        GENERIC_CREATE_FAILURE.to_string()
    } else {
        message
    }
}
