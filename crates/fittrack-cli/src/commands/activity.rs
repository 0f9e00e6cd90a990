use fittrack_core::presentation::render_activity;
use fittrack_core::storage::open_store;
use fittrack_core::{load_activity, ActivityDb, ApiClient, Config, RenderContext, TimeFilter};

pub fn run(days: u32, filter: TimeFilter, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let api = ApiClient::new(&config.api)?;
    let store = open_store(config.storage.backend)?;
    let db = ActivityDb::open()?;
    tracing::debug!(days, ?filter, "loading activity");

    let summary = super::runtime()?.block_on(load_activity(
        &api,
        store.as_ref(),
        &db,
        &config.goals,
        days,
    ))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let ctx = RenderContext::from_ui(&config.ui);
        println!("{}", render_activity(&ctx, &summary, filter));
    }
    Ok(())
}

pub fn record_steps(count: u64) -> Result<(), Box<dyn std::error::Error>> {
    ActivityDb::open()?.set_today_steps(count)?;
    tracing::debug!(count, "today's steps recorded");
    println!("ok");
    Ok(())
}
