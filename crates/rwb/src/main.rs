use std::sync::Arc;

use rwb_core::{
    checker::RouteChecker,
    config::Config,
    ports::{Messenger, RouteStore, TicketGateway},
    scheduler::TickScheduler,
    store::MemoryStore,
};
use rwb_eticket::EticketClient;
use rwb_telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rwb_core::logging::init("rwb")?;

    let cfg = Config::load()?;

    let store: Arc<dyn RouteStore> = Arc::new(MemoryStore::new());
    let gateway: Arc<dyn TicketGateway> = Arc::new(EticketClient::new(&cfg)?);
    let messenger: Arc<dyn Messenger> =
        Arc::new(TelegramNotifier::from_token(&cfg.telegram_bot_token));

    let checker = Arc::new(RouteChecker::new(store, gateway, messenger));
    let scheduler = TickScheduler::new(checker, cfg.check_interval);

    scheduler.start().await;
    tracing::info!("availability watcher running, Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    scheduler.stop().await;

    Ok(())
}
