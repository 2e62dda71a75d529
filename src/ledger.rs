//! Daily calorie ledger.
//!
//! One `DailyLedger` exists per session. It owns the user's profile and the
//! current day's log, keeps them in memory, and writes them through to the
//! injected [`KeyValueStore`] after every mutation. A mutation is committed to
//! memory only after its write succeeded, so a failed call can be retried
//! without double counting.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::clock::Clock;
use crate::error::LedgerError;
use crate::models::daily_log::{self, DailyLog, LogEntry, Projection};
use crate::models::profile::{Goal, Profile, Sex};
use crate::storage::{KeyValueStore, StorageError, DAILY_LOG_KEY, PROFILE_KEY};

pub struct DailyLedger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    profile: Option<Profile>,
    log: DailyLog,
}

impl DailyLedger {
    /// Loads the persisted profile and day, resetting the day if it is stale.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let today = clock.today();
        let mut ledger = Self {
            store,
            clock,
            profile: None,
            log: DailyLog::empty(today),
        };
        ledger.load_state().await?;
        Ok(ledger)
    }

    /// Re-reads both keys from the store. A missing or stale day is replaced
    /// by an empty one for today and persisted before returning.
    #[tracing::instrument(skip(self))]
    pub async fn load_state(&mut self) -> Result<(Option<Profile>, DailyLog), LedgerError> {
        let today = self.clock.today();
        let profile: Option<Profile> = self.read(PROFILE_KEY).await?;
        let stored: Option<DailyLog> = self.read(DAILY_LOG_KEY).await?;

        let log = match stored {
            Some(mut log) if log.date == today => {
                if log.reconcile() {
                    tracing::warn!(date = %log.date, eaten = log.eaten, "Stored total disagreed with items; re-derived");
                    self.write(DAILY_LOG_KEY, &log).await?;
                }
                log
            }
            Some(stale) => {
                tracing::info!(stale_date = %stale.date, %today, "Day rollover, resetting ledger");
                let fresh = DailyLog::empty(today);
                self.write(DAILY_LOG_KEY, &fresh).await?;
                fresh
            }
            None => {
                let fresh = DailyLog::empty(today);
                self.write(DAILY_LOG_KEY, &fresh).await?;
                fresh
            }
        };

        self.profile = profile;
        self.log = log;
        Ok((self.profile.clone(), self.log.clone()))
    }

    /// Replaces the stored profile. Nothing is written if validation fails.
    #[tracing::instrument(skip(self))]
    pub async fn save_profile(
        &mut self,
        height: f64,
        weight: f64,
        age: u32,
        sex: Sex,
        goal: Goal,
    ) -> Result<Profile, LedgerError> {
        let profile = Profile::new(height, weight, age, sex, goal)?;
        self.write(PROFILE_KEY, &profile).await?;

        tracing::info!(target_calories = profile.target_calories, "Profile saved");
        self.profile = Some(profile.clone());
        Ok(profile)
    }

    /// Appends an entry stamped with the current time and persists the day.
    #[tracing::instrument(skip(self))]
    pub async fn record_entry(&mut self, name: &str, calories: i64) -> Result<DailyLog, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Food name must not be empty".into()));
        }
        if calories < 0 {
            return Err(LedgerError::Validation(
                "Calories must not be negative".into(),
            ));
        }
        let calories = calories.unsigned_abs();

        let now = self.clock.now();
        let mut next = if self.log.date == now.date_naive() {
            self.log.clone()
        } else {
            tracing::info!(stale_date = %self.log.date, today = %now.date_naive(), "Day rollover, resetting ledger");
            DailyLog::empty(now.date_naive())
        };
        next.push(LogEntry::new(name, calories, now));

        self.write(DAILY_LOG_KEY, &next).await?;
        tracing::info!(name, calories, eaten = next.eaten, "Entry recorded");

        self.log = next;
        Ok(self.log.clone())
    }

    /// Rolls the in-memory day over if the calendar day has changed since it
    /// was loaded. Call before reading `log()` in long-lived sessions.
    pub async fn refresh_day(&mut self) -> Result<(), LedgerError> {
        let today = self.clock.today();
        if self.log.date == today {
            return Ok(());
        }

        tracing::info!(stale_date = %self.log.date, %today, "Day rollover, resetting ledger");
        let fresh = DailyLog::empty(today);
        self.write(DAILY_LOG_KEY, &fresh).await?;
        self.log = fresh;
        Ok(())
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn log(&self) -> &DailyLog {
        &self.log
    }

    pub fn onboarding_required(&self) -> bool {
        self.profile.is_none()
    }

    pub fn projection(&self) -> Option<Projection> {
        self.profile
            .as_ref()
            .and_then(|p| daily_log::projection(p, &self.log))
    }

    pub async fn ping(&self) -> Result<(), StorageError> {
        self.store.ping().await
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is unreadable; treating as absent");
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(value)?;
        self.store.set(key, &raw).await.map_err(|e| {
            tracing::error!(key, error = %e, "Failed to persist ledger state");
            e
        })
    }
}
