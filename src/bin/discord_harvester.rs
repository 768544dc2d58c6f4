//! Discord signal harvester with its REST surface.

use std::sync::Arc;
use std::time::Duration;
use venue_gateway::config::{load_dotenv, DiscordConfig};
use venue_gateway::discord::{
    DiscordHttp, Harvester, HarvesterDefaults, MessageStore, MongoStore, Scheduler,
};
use venue_gateway::error::GatewayError;
use venue_gateway::logging;
use venue_gateway::server::{self, DiscordState};

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    load_dotenv();
    logging::init();

    let config = DiscordConfig::from_env()?;
    tracing::info!(addr = %config.bind_addr(), ?config, "Starting Discord harvester");

    let store = MongoStore::connect(&config.mongodb_url, &config.mongodb_db).await?;
    store.ping().await?;
    store.ensure_indexes().await?;
    tracing::info!(database = %config.mongodb_db, "Connected to MongoDB");

    let discord = DiscordHttp::new(Some(&config.api_url))?;
    let defaults = HarvesterDefaults {
        token: config.user_token.clone(),
        channel_id: config.channel_id.clone(),
        target_user_id: config.target_user_id.clone(),
        limit: config.fetch_limit,
    };
    let harvester = Arc::new(Harvester::new(discord, Arc::new(store), defaults));
    let scheduler = Arc::new(Scheduler::new(
        Arc::clone(&harvester),
        Duration::from_secs(config.fetch_interval_secs),
    ));
    scheduler.start().await;

    let app = server::discord_router(DiscordState {
        harvester,
        scheduler: Arc::clone(&scheduler),
    });
    let served = server::serve(&config.bind_addr(), app).await;

    scheduler.stop().await;
    tracing::info!("Discord harvester shut down");
    served
}
