use std::collections::BTreeMap;
use std::sync::Arc;

use chrono_tz::Tz;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use entity::{job_run, tracking_item, user};

use crate::clock::Clock;
use crate::error::DispatchError;
use crate::notify::Notifier;

/// Ledger name for the reminder job.
pub const REMINDER_JOB: &str = "reminder_dispatch";

/// Outcome of one dispatch cycle, for logs and the admin trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub due_items: usize,
    pub owners: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// One full sweep over the due set: query, group by owner, deliver, record.
///
/// The dispatcher holds no state of its own between cycles; everything it
/// needs is re-derived from the store at invocation time. Completion is
/// recorded in the run ledger only after the whole sweep finishes, so a crash
/// mid-sweep means the next trigger retries the same window (duplicate
/// delivery is acceptable, a missed notification is not).
pub struct ReminderDispatcher {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl ReminderDispatcher {
    pub fn new(
        db: DatabaseConnection,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
    ) -> Self {
        Self {
            db,
            notifier,
            clock,
            timezone,
        }
    }

    /// When the reminder job last completed, if ever.
    pub async fn last_completed_at(&self) -> Result<Option<i64>, sea_orm::DbErr> {
        Ok(job_run::Entity::find_by_id(REMINDER_JOB)
            .one(&self.db)
            .await?
            .map(|run| run.last_run_at))
    }

    pub async fn run_cycle(&self) -> Result<CycleReport, DispatchError> {
        let started_at = self.clock.now();
        // Date granularity in the configured zone: an item due "today" fires
        // starting with that day's first cycle.
        let today = started_at.with_timezone(&self.timezone).date_naive();

        let due = tracking_item::Entity::find()
            .filter(tracking_item::Column::IsDone.eq(false))
            .filter(tracking_item::Column::ReminderDate.lte(today))
            .all(&self.db)
            .await
            .map_err(DispatchError::Query)?;

        // Group by owner; BTreeMap keeps the sweep order deterministic.
        let mut by_owner: BTreeMap<String, Vec<tracking_item::Model>> = BTreeMap::new();
        for item in due {
            by_owner.entry(item.user_id.clone()).or_default().push(item);
        }

        let mut report = CycleReport {
            due_items: by_owner.values().map(Vec::len).sum(),
            owners: by_owner.len(),
            ..CycleReport::default()
        };

        for (owner_id, items) in &by_owner {
            if self.notify_owner(owner_id, items).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }

        self.record_completion(started_at.timestamp()).await?;

        tracing::info!(
            due_items = report.due_items,
            owners = report.owners,
            delivered = report.delivered,
            failed = report.failed,
            "reminder cycle complete"
        );

        Ok(report)
    }

    /// Per-owner step. Any failure here is isolated: logged and counted,
    /// never propagated, so one bad mailbox cannot starve the other owners.
    /// The item stays not-done, so the next cycle retries naturally.
    async fn notify_owner(&self, owner_id: &str, items: &[tracking_item::Model]) -> bool {
        let owner = match user::Entity::find_by_id(owner_id).one(&self.db).await {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                tracing::warn!(owner_id, "due items reference a missing user");
                return false;
            }
            Err(e) => {
                tracing::warn!(owner_id, error = %e, "owner lookup failed");
                return false;
            }
        };

        // One consolidated message for an owner with several due items.
        let sent = if items.len() == 1 {
            self.notifier.send_reminder(&owner.email, &items[0]).await
        } else {
            self.notifier
                .send_batch_reminders(&owner.email, items)
                .await
        };

        if !sent {
            tracing::warn!(owner_id, email = %owner.email, "reminder delivery failed");
        }
        sent
    }

    /// Advance the run ledger to the cycle's start instant, forward-only.
    async fn record_completion(&self, started_ts: i64) -> Result<(), DispatchError> {
        let now = self.clock.now_ts();

        let existing = job_run::Entity::find_by_id(REMINDER_JOB)
            .one(&self.db)
            .await
            .map_err(DispatchError::Ledger)?;

        match existing {
            // last_run_at never moves backwards.
            Some(run) if run.last_run_at >= started_ts => {}
            Some(run) => {
                let mut active: job_run::ActiveModel = run.into();
                active.last_run_at = Set(started_ts);
                active.updated_at = Set(now);
                active.update(&self.db).await.map_err(DispatchError::Ledger)?;
            }
            None => {
                job_run::ActiveModel {
                    job_name: Set(REMINDER_JOB.to_string()),
                    last_run_at: Set(started_ts),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map_err(DispatchError::Ledger)?;
            }
        }

        Ok(())
    }
}
