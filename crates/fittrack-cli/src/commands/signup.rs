use std::io::{self, BufRead, Write};

use fittrack_core::api::AuthApi;
use fittrack_core::presentation::{render_error, render_step_header, render_success};
use fittrack_core::signup::{validate_step, FitnessGoal, Gender, Progress, Retreat, SignupFields};
use fittrack_core::storage::{open_store, MemorySessionStore};
use fittrack_core::{ApiClient, Config, RenderContext, SessionStore, SignupWizard, Step, SubmitOutcome};

use super::prompt::{Answer, Console};

/// How the interactive session ended.
#[derive(Debug, PartialEq)]
pub enum Finish {
    Done(SubmitOutcome),
    Cancelled,
}

enum Filled {
    Done,
    Back,
}

pub fn run(dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let ctx = RenderContext::from_ui(&config.ui);
    let api = ApiClient::new(&config.api)?;
    let store: Box<dyn SessionStore> = if dry_run {
        Box::new(MemorySessionStore::new())
    } else {
        open_store(config.storage.backend)?
    };

    println!("Type {} to go back, or press Enter to keep a value.", super::prompt::BACK);

    let mut wizard = SignupWizard::new();
    let mut console = Console::stdio();

    let finish = super::runtime()?.block_on(drive(
        &mut wizard,
        &mut console,
        &api,
        store.as_ref(),
        &ctx,
    ))?;

    match finish {
        Finish::Done(SubmitOutcome::SignedIn { user }) => {
            let who = user["email"].as_str().unwrap_or(&wizard.fields().email).to_string();
            println!("{}", render_success(&ctx, &format!("Welcome, {who}! You are signed in.")));
            if dry_run {
                println!("(dry run: session not stored)");
            }
        }
        Finish::Done(SubmitOutcome::CreatedNeedsLogin { message }) => {
            println!("{}", render_success(&ctx, &message));
            println!("Sign in with: fittrack-cli auth login --email {}", wizard.fields().email);
        }
        // drive() keeps prompting on Failed
        Finish::Done(SubmitOutcome::Failed { message }) => {
            return Err(message.into());
        }
        Finish::Cancelled => println!("Signup cancelled"),
    }
    Ok(())
}

/// Walk the wizard until the account is created or the user backs out of
/// step 1. Failed submissions are shown and the password step is asked again.
pub async fn drive<R: BufRead, W: Write>(
    wizard: &mut SignupWizard,
    console: &mut Console<R, W>,
    api: &dyn AuthApi,
    store: &dyn SessionStore,
    ctx: &RenderContext,
) -> Result<Finish, Box<dyn std::error::Error>> {
    loop {
        writeln!(console.out(), "\n{}", render_step_header(ctx, wizard.step()))?;

        if let Filled::Back = fill_step(wizard.step(), wizard.fields_mut(), console)? {
            match wizard.retreat() {
                Retreat::Exit => return Ok(Finish::Cancelled),
                Retreat::Moved(_) => continue,
            }
        }

        if wizard.step() == Step::Password
            && validate_step(Step::Password, wizard.fields()).is_ok()
        {
            writeln!(console.out(), "Creating account...")?;
        }
        match wizard.next(api, store).await {
            Ok(Progress::Moved(_)) => {}
            Ok(Progress::Submitted(SubmitOutcome::Failed { message })) => {
                writeln!(console.out(), "{}", render_error(ctx, &message))?;
            }
            Ok(Progress::Submitted(outcome)) => return Ok(Finish::Done(outcome)),
            Err(e) => writeln!(console.out(), "{}", render_error(ctx, &e.to_string()))?,
        }
    }
}

fn fill_step<R: BufRead, W: Write>(
    step: Step,
    fields: &mut SignupFields,
    console: &mut Console<R, W>,
) -> io::Result<Filled> {
    match step {
        Step::PersonalInfo => {
            for (label, value) in [
                ("First Name", &mut fields.first_name),
                ("Last Name", &mut fields.last_name),
                ("Email", &mut fields.email),
                ("Date of Birth (YYYY-MM-DD)", &mut fields.date_of_birth),
            ] {
                if let Filled::Back = text(console, label, value, false)? {
                    return Ok(Filled::Back);
                }
            }
        }
        Step::PhysicalProfile => {
            for (label, value) in [("Height (cm)", &mut fields.height), ("Weight (kg)", &mut fields.weight)] {
                if let Filled::Back = text(console, label, value, false)? {
                    return Ok(Filled::Back);
                }
            }
            let options: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
            let label = format!("Gender ({})", options.join("/"));
            match console.ask_choice(&label, fields.gender.as_ref(), |raw| {
                raw.to_lowercase().parse::<Gender>()
            })? {
                Answer::Value(g) => fields.gender = Some(g),
                Answer::Keep => {}
                Answer::Back => return Ok(Filled::Back),
            }
        }
        Step::FitnessGoal => {
            writeln!(console.out(), "What's your fitness goal?")?;
            for (i, goal) in FitnessGoal::ALL.iter().enumerate() {
                writeln!(console.out(), "  {}) {}", i + 1, goal.label())?;
            }
            match console.ask_choice("Goal", fields.fitness_goal.as_ref(), parse_goal)? {
                Answer::Value(g) => fields.fitness_goal = Some(g),
                Answer::Keep => {}
                Answer::Back => return Ok(Filled::Back),
            }
        }
        Step::Password => {
            for (label, value) in [
                ("Password", &mut fields.password),
                ("Confirm Password", &mut fields.password_confirm),
            ] {
                if let Filled::Back = text(console, label, value, true)? {
                    return Ok(Filled::Back);
                }
            }
        }
    }
    Ok(Filled::Done)
}

fn text<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
    value: &mut String,
    secret: bool,
) -> io::Result<Filled> {
    match console.ask(label, value, secret)? {
        Answer::Value(v) => *value = v,
        Answer::Keep => {}
        Answer::Back => return Ok(Filled::Back),
    }
    Ok(Filled::Done)
}

/// Menu number, wire value, or label.
fn parse_goal(raw: &str) -> Result<FitnessGoal, fittrack_core::ValidationError> {
    if let Ok(n) = raw.parse::<usize>() {
        if let Some(goal) = n.checked_sub(1).and_then(|i| FitnessGoal::ALL.get(i)) {
            return Ok(*goal);
        }
    }
    FitnessGoal::ALL
        .into_iter()
        .find(|g| g.label().eq_ignore_ascii_case(raw))
        .map_or_else(|| raw.to_lowercase().parse(), Ok)
}
