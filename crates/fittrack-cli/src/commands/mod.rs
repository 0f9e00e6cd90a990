pub mod activity;
pub mod auth;
pub mod config;
pub mod prompt;
pub mod signup;

/// Runtime for commands that talk to the backend.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
