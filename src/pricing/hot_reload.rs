use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{info, warn};

use super::loader::{ConfigError, RulesLoader};
use super::PricingRules;

/// Watch the rules file and publish a fresh rule set when it changes.
pub struct RulesWatcher {
    loader: RulesLoader,
    check_interval: Duration,
    last_fingerprint: Option<String>,
}

impl RulesWatcher {
    /// Create a new rules watcher.
    pub fn new(loader: RulesLoader, check_interval: Duration) -> Self {
        RulesWatcher {
            loader,
            check_interval,
            last_fingerprint: None,
        }
    }

    /// Load the initial rule set and start watching for changes.
    ///
    /// The initial load must succeed: there is no empty fallback, so a
    /// malformed rules file stops startup instead of producing prices.
    /// Later reload failures keep the previous rule set active.
    pub fn start(
        mut self,
    ) -> Result<(watch::Receiver<Arc<PricingRules>>, tokio::task::JoinHandle<()>), ConfigError>
    {
        let initial = self.loader.load()?;
        info!(
            path = %self.loader.path().display(),
            fingerprint = initial.fingerprint(),
            "Loaded initial pricing rules"
        );
        self.last_fingerprint = Some(initial.fingerprint().to_string());

        let (tx, rx) = watch::channel(Arc::new(initial));

        let handle = tokio::spawn(async move {
            let mut interval = interval(self.check_interval);
            // First tick completes immediately; the initial load already happened.
            interval.tick().await;

            loop {
                interval.tick().await;

                match self.check_for_updates(&tx) {
                    Ok(true) => info!("Pricing rules reloaded successfully"),
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "Pricing rules reload failed, keeping previous rules"),
                }
            }
        });

        Ok((rx, handle))
    }

    /// Reload the rules file and broadcast if its content changed.
    fn check_for_updates(
        &mut self,
        tx: &watch::Sender<Arc<PricingRules>>,
    ) -> Result<bool, ConfigError> {
        let rules = self.loader.load()?;

        if self.last_fingerprint.as_deref() == Some(rules.fingerprint()) {
            return Ok(false);
        }

        info!(
            previous = ?self.last_fingerprint,
            current = rules.fingerprint(),
            "Pricing rules changed"
        );

        self.last_fingerprint = Some(rules.fingerprint().to_string());
        let _ = tx.send(Arc::new(rules));

        Ok(true)
    }
}
