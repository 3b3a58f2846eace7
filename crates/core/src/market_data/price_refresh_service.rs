//! Periodic refresh of the price table.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::price_provider::PriceProviderTrait;
use crate::assets::{normalize_symbol, AssetServiceTrait};
use crate::config::LedgerConfig;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};

struct RefreshTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Pulls prices from a provider on a fixed interval and upserts them.
///
/// The first cycle runs as soon as the task starts. A failed cycle is logged and
/// the loop waits for the next tick.
pub struct PriceRefreshService {
    provider: Arc<dyn PriceProviderTrait>,
    asset_service: Arc<dyn AssetServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    interval: Duration,
    task: Mutex<Option<RefreshTask>>,
}

impl PriceRefreshService {
    pub fn new(
        provider: Arc<dyn PriceProviderTrait>,
        asset_service: Arc<dyn AssetServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        interval: Duration,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::Config(
                "price refresh interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            provider,
            asset_service,
            event_sink,
            interval,
            task: Mutex::new(None),
        })
    }

    pub fn from_config(
        config: &LedgerConfig,
        provider: Arc<dyn PriceProviderTrait>,
        asset_service: Arc<dyn AssetServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Result<Self> {
        Self::new(
            provider,
            asset_service,
            event_sink,
            config.price_refresh_interval,
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one fetch-and-upsert cycle. Returns the number of assets written.
    pub async fn refresh_now(&self) -> Result<usize> {
        let fetched = self.provider.fetch_prices().await?;
        if fetched.is_empty() {
            warn!("{} returned no prices", self.provider.name());
            return Ok(0);
        }

        let mut symbols: Vec<String> = fetched.iter().map(|a| normalize_symbol(&a.symbol)).collect();
        symbols.sort();
        symbols.dedup();

        let written = self.asset_service.upsert_assets(fetched).await?;
        debug!(
            "Refreshed {} price(s) from {}",
            written,
            self.provider.name()
        );
        self.event_sink.emit(DomainEvent::prices_updated(symbols));
        Ok(written)
    }

    /// Spawns the refresh loop. Calling it while the loop is running does nothing.
    /// Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) {
        let mut task = self.lock_task();
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            debug!("Price refresh already running");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let service = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(service.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = service.refresh_now().await {
                            error!("Price refresh from {} failed: {}", service.provider.name(), e);
                        }
                    }
                }
            }
            debug!("Price refresh loop exited");
        });

        info!(
            "Started price refresh from {} every {:?}",
            self.provider.name(),
            self.interval
        );
        *task = Some(RefreshTask {
            shutdown_tx,
            handle,
        });
    }

    /// Signals the loop to stop and waits for it to exit. A cycle already in
    /// progress is allowed to finish.
    pub async fn stop(&self) {
        let task = self.lock_task().take();
        let Some(task) = task else {
            return;
        };
        // A send error means the loop already exited.
        let _ = task.shutdown_tx.send(true);
        if let Err(e) = task.handle.await {
            warn!("Price refresh task ended abnormally: {}", e);
        }
        info!("Stopped price refresh");
    }

    pub fn is_running(&self) -> bool {
        self.lock_task()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<RefreshTask>> {
        self.task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
