use clap::Subcommand;
use fittrack_core::api::AuthApi;
use fittrack_core::signup::Credentials;
use fittrack_core::storage::{clear_session, load_session, open_store, persist_session};
use fittrack_core::{ApiClient, Config};

use super::prompt::Console;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Show whether a session is stored
    Status,
    /// Sign in to an existing account (password is read without echo)
    Login {
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session
    Logout,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = open_store(config.storage.backend)?;

    match action {
        AuthAction::Status => match load_session(store.as_ref())? {
            Some(session) => {
                let who = session
                    .user
                    .as_ref()
                    .and_then(|u| u["email"].as_str().map(str::to_string))
                    .unwrap_or_else(|| "unknown user".to_string());
                println!("signed in as {who}");
            }
            None => println!("not signed in"),
        },
        AuthAction::Login { email } => {
            let password = Console::stdio().password("Password")?;

            let api = ApiClient::new(&config.api)?;
            let login = super::runtime()?.block_on(api.login(&Credentials { email, password }))?;
            persist_session(store.as_ref(), &login)?;
            println!("signed in");
        }
        AuthAction::Logout => {
            clear_session(store.as_ref())?;
            println!("signed out");
        }
    }
    Ok(())
}
