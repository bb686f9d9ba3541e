use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::error::DispatchError;
use crate::reminder::{CycleReport, ReminderDispatcher};

/// Parse a cron expression, accepting the common 5-field form.
///
/// The `cron` crate wants 6 fields (leading seconds); a 5-field expression is
/// padded with a zero seconds field.
pub fn parse_cron(expr: &str) -> Result<Schedule, cron::error::Error> {
    let expr = expr.trim();
    let padded;
    let expr = if expr.split_whitespace().count() == 5 {
        padded = format!("0 {expr}");
        padded.as_str()
    } else {
        expr
    };
    Schedule::from_str(expr)
}

/// Outcome of a trigger attempt.
#[derive(Debug)]
pub enum Trigger {
    Completed(CycleReport),
    Failed(DispatchError),
    /// A cycle was already in flight; the trigger was dropped, not queued.
    Skipped,
}

struct SchedulerInner {
    dispatcher: ReminderDispatcher,
    schedule: Schedule,
    timezone: Tz,
    clock: Arc<dyn Clock>,
    in_flight: AtomicBool,
}

impl SchedulerInner {
    /// Single-slot gate: at most one cycle in flight process-wide. An
    /// overlapping trigger is dropped so two cycles can never deliver to the
    /// same owner concurrently.
    async fn trigger(&self) -> Trigger {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("reminder cycle still in flight, skipping trigger");
            return Trigger::Skipped;
        }

        let result = self.dispatcher.run_cycle().await;
        self.in_flight.store(false, Ordering::Release);

        match result {
            Ok(report) => Trigger::Completed(report),
            Err(e) => {
                tracing::error!(error = %e, "reminder cycle failed, ledger left unchanged");
                Trigger::Failed(e)
            }
        }
    }
}

/// Drives the reminder dispatcher: once at startup if a pass is owed, then on
/// the configured cron cadence in the configured time zone.
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(
        dispatcher: ReminderDispatcher,
        schedule: Schedule,
        timezone: Tz,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(SchedulerInner {
                dispatcher,
                schedule,
                timezone,
                clock,
                in_flight: AtomicBool::new(false),
            }),
            shutdown,
            handle: None,
        }
    }

    /// Run one cycle now. Used for the startup catch-up pass and as the
    /// administrative trigger hook.
    pub async fn run_once(&self) -> Trigger {
        self.inner.trigger().await
    }

    /// If the reminder job never ran, or last ran before today in the
    /// configured zone, run one cycle synchronously — reminders that came due
    /// while the process was down must not wait for the next natural fire.
    pub async fn run_startup_catch_up(&self) -> Option<Trigger> {
        let today = self
            .inner
            .clock
            .now()
            .with_timezone(&self.inner.timezone)
            .date_naive();

        let owed = match self.inner.dispatcher.last_completed_at().await {
            Ok(None) => true,
            Ok(Some(last_run_ts)) => match DateTime::from_timestamp(last_run_ts, 0) {
                Some(last_run) => last_run.with_timezone(&self.inner.timezone).date_naive() < today,
                None => true,
            },
            Err(e) => {
                tracing::warn!(error = %e, "run ledger read failed, forcing catch-up cycle");
                true
            }
        };

        if !owed {
            tracing::debug!("reminder job already ran today, no catch-up owed");
            return None;
        }

        tracing::info!("startup catch-up: running reminder cycle");
        Some(self.run_once().await)
    }

    /// Begin periodic triggering. Non-blocking; `stop` cancels pending
    /// triggers without interrupting an in-flight cycle.
    pub fn start(&mut self) {
        let inner = Arc::clone(&self.inner);
        let mut shutdown = self.shutdown.subscribe();

        self.handle = Some(tokio::spawn(async move {
            loop {
                let now = inner.clock.now().with_timezone(&inner.timezone);
                let Some(next) = inner.schedule.after(&now).next() else {
                    tracing::warn!("cron schedule yields no future fire time, scheduler idle");
                    return;
                };

                let wait = (next - now).to_std().unwrap_or_default();
                tracing::debug!(next = %next, "next reminder cycle scheduled");

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        inner.trigger().await;
                    }
                    _ = shutdown.changed() => break,
                }
            }
        }));
    }

    /// Cancel pending triggers and wait for the background task. An in-flight
    /// cycle is allowed to finish; there is no mid-cycle abort.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}
