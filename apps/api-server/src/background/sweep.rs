//! Periodic eviction of expired limiter windows and cache entries.
//!
//! Expired state is already ignored on read; the sweep only bounds memory
//! for long-running processes that see many distinct clients or keys.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::state::AppState;

/// Sweep configuration.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    pub schedule: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: "0 */5 * * * *".to_string(),
        }
    }
}

impl SweepConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SWEEP_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            schedule: std::env::var("SWEEP_SCHEDULE").unwrap_or(defaults.schedule),
        }
    }
}

/// Remove expired entries from the gate's limiter and cache.
pub fn sweep_once(state: &AppState) -> (usize, usize) {
    let clients = state.gate.limiter().purge_expired();
    let entries = state.gate.cache().purge_expired();
    (clients, entries)
}

/// Owns the scheduler running the sweep job.
pub struct Sweeper {
    inner: JobScheduler,
}

impl Sweeper {
    /// Register and start the sweep job. Returns `None` when disabled.
    pub async fn start(config: &SweepConfig, state: AppState) -> Result<Option<Self>, JobSchedulerError> {
        if !config.enabled {
            tracing::info!("Expiry sweep disabled");
            return Ok(None);
        }

        let inner = JobScheduler::new().await?;

        let job = Job::new_async(config.schedule.as_str(), move |_uuid, _lock| {
            let state = state.clone();
            Box::pin(async move {
                let (clients, entries) = sweep_once(&state);
                tracing::debug!(
                    purged_clients = clients,
                    purged_entries = entries,
                    "Expiry sweep finished"
                );
            })
        })?;

        let id = inner.add(job).await?;
        inner.start().await?;
        tracing::info!(schedule = %config.schedule, job_id = %id, "Expiry sweep scheduled");

        Ok(Some(Self { inner }))
    }

    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Expiry sweep stopped");
        Ok(())
    }
}
