//! Notification scheduler: decides which notifications to emit and when.
//!
//! One scheduling run is cancel-and-rebuild: cancel everything previously
//! scheduled, then re-derive the full notification set from the current item
//! snapshot and user settings. That makes a fresh run the recovery mechanism
//! for any previously failed call.
//!
//! Nothing here propagates notification-boundary failures to the caller:
//! permission denial, OS scheduling errors and malformed settings all
//! degrade to skipped notifications, logged via `tracing`.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use larder_core::content::{
    build_evening_planning, build_expiry_notification, build_morning_digest, NotificationCategory,
    NotificationContent, NotificationData,
};
use larder_core::item::InventoryItem;
use larder_core::pattern::UserNotificationPattern;
use larder_core::settings::NotificationSettings;
use larder_core::time::{local_time_of_day, local_today, next_local_occurrence};
use larder_core::urgency::{classify_item, UrgencyInfo, UrgencyTier};

use crate::actions::{actions_for, InventoryStore, NotificationAction};
use crate::meals::{build_meal_notification, MealPlanner, MealSlot};
use crate::notifier::{NotificationRequest, Notifier, NotifyError, Trigger};

/// Critical items get this many follow-up reminders after the immediate one.
const CRITICAL_FOLLOW_UPS: i64 = 3;
/// Spacing between critical follow-ups.
const FOLLOW_UP_SPACING_SECS: i64 = 4 * 3600;
/// Days added by the extend-expiry action.
const EXPIRY_EXTENSION_DAYS: i64 = 3;

/// Summary of one scheduling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleOutcome {
    pub scheduled: usize,
    pub skipped: usize,
    pub summary: String,
}

impl ScheduleOutcome {
    fn noop(reason: &str) -> Self {
        Self {
            scheduled: 0,
            skipped: 0,
            summary: reason.to_string(),
        }
    }
}

/// The notification orchestrator. Constructed once at app start and handed
/// to call sites by reference; it owns its settings and adaptive pattern.
pub struct NotificationScheduler<N: Notifier, M: MealPlanner> {
    notifier: N,
    planner: M,
    settings: NotificationSettings,
    pattern: UserNotificationPattern,
    tz: Tz,
    permission_granted: bool,
    initialized: bool,
}

impl<N: Notifier, M: MealPlanner> NotificationScheduler<N, M> {
    pub fn new(notifier: N, planner: M, settings: NotificationSettings, tz: Tz) -> Self {
        Self {
            notifier,
            planner,
            settings: sanitize_settings(settings),
            pattern: UserNotificationPattern::default(),
            tz,
            permission_granted: false,
            initialized: false,
        }
    }

    /// Request permission and register categories. Denial leaves the
    /// scheduler in a degraded ready state where every scheduling call is a
    /// no-op; it never errors.
    pub async fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        self.permission_granted = match self.notifier.request_permission().await {
            Ok(true) => true,
            Ok(false) => {
                warn!("notification permission denied; scheduling disabled");
                false
            }
            Err(e) => {
                warn!(error = %e, "permission request failed; scheduling disabled");
                false
            }
        };

        if self.permission_granted {
            for category in NotificationCategory::ALL {
                if let Err(e) = self
                    .notifier
                    .register_category(category, actions_for(category))
                    .await
                {
                    warn!(category = category.id(), error = %e, "category registration failed");
                }
            }
        }

        self.initialized = true;
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Replace settings; malformed values degrade to defaults.
    pub fn update_settings(&mut self, settings: NotificationSettings) {
        self.settings = sanitize_settings(settings);
    }

    pub fn pattern(&self) -> &UserNotificationPattern {
        &self.pattern
    }

    /// Restore a persisted adaptive pattern (e.g. across process restarts).
    pub fn restore_pattern(&mut self, pattern: UserNotificationPattern) {
        self.pattern = pattern;
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// One full scheduling run over the current item snapshot.
    ///
    /// Cancels everything previously scheduled, partitions active items by
    /// tier and schedules per-tier notifications plus the recurring meal /
    /// digest / planning reminders the settings enable.
    pub async fn schedule_expiry_notifications(
        &mut self,
        items: &[InventoryItem],
        now_utc: DateTime<Utc>,
    ) -> ScheduleOutcome {
        if !self.initialized {
            debug!("scheduler not initialized; skipping run");
            return ScheduleOutcome::noop("not initialized");
        }
        if !self.permission_granted {
            debug!("no notification permission; skipping run");
            return ScheduleOutcome::noop("permission denied");
        }
        if !self.settings.enabled {
            debug!("notifications disabled in settings; skipping run");
            return ScheduleOutcome::noop("notifications disabled");
        }

        // Stale reminders from the previous run are dropped wholesale; no
        // diffing. A failed cancel is logged and the run proceeds.
        if let Err(e) = self.notifier.cancel_all().await {
            warn!(error = %e, "cancel-all failed; stale notifications may linger");
        }

        let today = local_today(self.tz, now_utc);
        let tomorrow = today.succ_opt();

        let mut critical: Vec<(&InventoryItem, UrgencyInfo)> = Vec::new();
        let mut warning: Vec<(&InventoryItem, UrgencyInfo)> = Vec::new();
        let mut soon: Vec<(&InventoryItem, UrgencyInfo)> = Vec::new();

        for item in items.iter().filter(|i| i.is_active()) {
            let info = classify_item(item, today);
            match info.tier {
                UrgencyTier::Critical => critical.push((item, info)),
                UrgencyTier::Warning => warning.push((item, info)),
                UrgencyTier::Soon => soon.push((item, info)),
                UrgencyTier::Safe => {}
            }
        }

        let mut scheduled = 0usize;
        let mut skipped = 0usize;

        // Critical: immediate, then escalating follow-ups. The only tier
        // that repeats.
        if self.settings.critical_alerts {
            for (item, info) in &critical {
                let content = build_expiry_notification(item, info);
                self.try_schedule(content.clone(), Trigger::Immediate, &mut scheduled, &mut skipped)
                    .await;
                for k in 1..=CRITICAL_FOLLOW_UPS {
                    self.try_schedule(
                        content.clone(),
                        Trigger::AfterSeconds(k * FOLLOW_UP_SPACING_SECS),
                        &mut scheduled,
                        &mut skipped,
                    )
                    .await;
                }
            }
        }

        // Warning: one per item at the adaptive hour (fixed default until an
        // engagement has been observed).
        if self.settings.warning_alerts && !warning.is_empty() {
            let hour = self.pattern.preferred_hour(self.settings.warning_hour);
            match next_local_occurrence(hour, 0, self.tz, now_utc) {
                Ok(fire) => {
                    for (item, info) in &warning {
                        let content = build_expiry_notification(item, info);
                        self.try_schedule(content, Trigger::At(fire), &mut scheduled, &mut skipped)
                            .await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "no valid warning delivery time; skipping tier");
                    skipped += warning.len();
                }
            }
        }

        // Soon: one per item at the preferred early hour.
        if self.settings.soon_alerts && !soon.is_empty() {
            match next_local_occurrence(self.settings.soon_hour, 0, self.tz, now_utc) {
                Ok(fire) => {
                    for (item, info) in &soon {
                        let content = build_expiry_notification(item, info);
                        self.try_schedule(content, Trigger::At(fire), &mut scheduled, &mut skipped)
                            .await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "no valid soon delivery time; skipping tier");
                    skipped += soon.len();
                }
            }
        }

        // Meal suggestions: one recurring notification per slot that has a
        // qualifying suggestion; slots without one are skipped silently.
        if self.settings.meal_suggestions {
            let snapshot: Vec<InventoryItem> = items
                .iter()
                .filter(|i| i.is_active())
                .cloned()
                .collect();
            for slot in MealSlot::ALL {
                let Some(suggestion) = self.planner.best_for_slot(&snapshot, slot, today) else {
                    continue;
                };
                let content = build_meal_notification(slot, &suggestion);
                self.try_schedule(
                    content,
                    Trigger::Daily { hour: slot.hour(), minute: 0 },
                    &mut scheduled,
                    &mut skipped,
                )
                .await;
            }
        }

        // Morning digest: only when something actually needs attention.
        if self.settings.morning_digest && (!critical.is_empty() || !warning.is_empty()) {
            let content = build_morning_digest(critical.len(), warning.len());
            self.try_schedule(
                content,
                Trigger::Daily { hour: self.settings.morning_hour, minute: 0 },
                &mut scheduled,
                &mut skipped,
            )
            .await;
        }

        // Evening planning: only when something expires exactly tomorrow.
        if self.settings.evening_planning {
            let due_tomorrow = items
                .iter()
                .filter(|i| i.is_active() && i.expiry.is_some() && i.expiry == tomorrow)
                .count();
            if due_tomorrow > 0 {
                let content = build_evening_planning(due_tomorrow);
                self.try_schedule(
                    content,
                    Trigger::Daily { hour: self.settings.evening_hour, minute: 0 },
                    &mut scheduled,
                    &mut skipped,
                )
                .await;
            }
        }

        let summary = format!(
            "scheduled {} notifications ({} critical, {} warning, {} soon), skipped {}",
            scheduled,
            critical.len(),
            warning.len(),
            soon.len(),
            skipped
        );
        debug!(summary = %summary, "scheduling run complete");

        ScheduleOutcome { scheduled, skipped, summary }
    }

    /// Immediate urgent send, suppressed entirely inside quiet hours (not
    /// queued for later). Returns whether a schedule call was issued.
    pub async fn send_critical_alert(
        &mut self,
        item: &InventoryItem,
        now_utc: DateTime<Utc>,
    ) -> bool {
        if !self.permission_granted || !self.settings.enabled || !self.settings.critical_alerts {
            return false;
        }

        if let Some(quiet) = self.settings.quiet_hours {
            let local = local_time_of_day(self.tz, now_utc);
            if quiet.contains(local) {
                debug!(item = %item.name, "inside quiet hours; critical alert suppressed");
                return false;
            }
        }

        let info = classify_item(item, local_today(self.tz, now_utc));
        let content = build_expiry_notification(item, &info);
        match self
            .notifier
            .schedule(NotificationRequest { content, trigger: Trigger::Immediate })
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(item = %item.name, error = %e, "critical alert failed");
                false
            }
        }
    }

    /// Dispatch a notification action response.
    ///
    /// Unknown ids are logged and ignored. Every handled response except an
    /// explicit dismissal nudges the adaptive pattern's action rate upward.
    pub async fn handle_response<S: InventoryStore>(
        &mut self,
        action_id: &str,
        data: &NotificationData,
        store: &mut S,
        now_utc: DateTime<Utc>,
    ) {
        let Some(action) = NotificationAction::from_id(action_id) else {
            let err = NotifyError::UnknownAction(action_id.to_string());
            warn!(error = %err, "ignoring notification action");
            return;
        };

        match action {
            NotificationAction::Dismiss => {
                self.pattern.record_dismissal(now_utc);
                return;
            }
            NotificationAction::MarkUsed => {
                if let Some(id) = &data.item_id {
                    if let Err(e) = store.mark_used(id).await {
                        warn!(item_id = %id, error = %e, "mark-used failed");
                    }
                } else {
                    debug!("mark-used response without an item id");
                }
            }
            NotificationAction::ExtendExpiry => {
                if let Some(id) = &data.item_id {
                    if let Err(e) = store.extend_expiry(id, EXPIRY_EXTENSION_DAYS).await {
                        warn!(item_id = %id, error = %e, "extend-expiry failed");
                    }
                } else {
                    debug!("extend-expiry response without an item id");
                }
            }
            NotificationAction::ViewRecipes
            | NotificationAction::ViewRecipe
            | NotificationAction::OpenCalendar
            | NotificationAction::ViewExpiring => {
                // Navigation targets are the UI layer's concern.
                debug!(action = action.id(), "navigation action acknowledged");
            }
        }

        let local_hour = now_utc.with_timezone(&self.tz).hour();
        let response_secs = data
            .sent_at_utc
            .map(|sent| (now_utc - sent).num_seconds().max(0) as f64);
        self.pattern.record_action(local_hour, response_secs, now_utc);
    }

    async fn try_schedule(
        &mut self,
        content: NotificationContent,
        trigger: Trigger,
        scheduled: &mut usize,
        skipped: &mut usize,
    ) {
        let request = NotificationRequest { content, trigger };
        match self.notifier.schedule(request).await {
            Ok(()) => *scheduled += 1,
            Err(e) => {
                warn!(error = %e, "schedule call failed; skipping notification");
                *skipped += 1;
            }
        }
    }
}

/// Sanitize incoming settings, logging when malformed values were replaced
/// with defaults.
fn sanitize_settings(settings: NotificationSettings) -> NotificationSettings {
    let sanitized = settings.clone().sanitized();
    if sanitized != settings {
        let err = NotifyError::InvalidSettings("out-of-range delivery hour".to_string());
        warn!(error = %err, "falling back to default settings values");
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::BasicMealPlanner;
    use crate::testing::{MemoryStore, RecordingNotifier};
    use chrono::{NaiveDate, TimeZone};
    use larder_core::settings::QuietHours;

    fn tz() -> Tz {
        "America/Chicago".parse().unwrap()
    }

    fn item(id: &str, name: &str, expiry: NaiveDate) -> InventoryItem {
        InventoryItem::new(id, name, Utc::now()).with_expiry(expiry)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2026-08-04 12:00 Chicago (CDT, UTC-5).
    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 4, 17, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn critical_items_get_immediate_plus_follow_ups() {
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            NotificationSettings { morning_digest: false, ..Default::default() },
            tz(),
        );
        scheduler.initialize().await;

        let items = vec![item("i1", "Milk", day(2026, 8, 4))];
        let outcome = scheduler.schedule_expiry_notifications(&items, noon_utc()).await;

        assert_eq!(outcome.scheduled, 4);
        let requests = &scheduler.notifier().requests;
        assert_eq!(requests[0].trigger, Trigger::Immediate);
        assert_eq!(requests[1].trigger, Trigger::AfterSeconds(4 * 3600));
        assert_eq!(requests[2].trigger, Trigger::AfterSeconds(8 * 3600));
        assert_eq!(requests[3].trigger, Trigger::AfterSeconds(12 * 3600));
    }

    #[tokio::test]
    async fn runs_start_with_cancel_all() {
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            NotificationSettings::default(),
            tz(),
        );
        scheduler.initialize().await;

        scheduler.schedule_expiry_notifications(&[], noon_utc()).await;
        scheduler.schedule_expiry_notifications(&[], noon_utc()).await;
        assert_eq!(scheduler.notifier().cancel_count, 2);
    }

    #[tokio::test]
    async fn disabled_tiers_are_skipped() {
        let settings = NotificationSettings {
            warning_alerts: false,
            morning_digest: false,
            ..Default::default()
        };
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            settings,
            tz(),
        );
        scheduler.initialize().await;

        let items = vec![item("i1", "Yogurt", day(2026, 8, 5))]; // warning tier
        let outcome = scheduler.schedule_expiry_notifications(&items, noon_utc()).await;

        assert_eq!(outcome.scheduled, 0);
        assert!(scheduler.notifier().requests.is_empty());
    }

    #[tokio::test]
    async fn schedule_failures_skip_but_do_not_abort() {
        let notifier = RecordingNotifier { fail_schedule: true, ..Default::default() };
        let mut scheduler = NotificationScheduler::new(
            notifier,
            BasicMealPlanner,
            NotificationSettings { morning_digest: false, ..Default::default() },
            tz(),
        );
        scheduler.initialize().await;

        let items = vec![item("i1", "Milk", day(2026, 8, 4))];
        let outcome = scheduler.schedule_expiry_notifications(&items, noon_utc()).await;

        assert_eq!(outcome.scheduled, 0);
        assert_eq!(outcome.skipped, 4);
    }

    #[tokio::test]
    async fn quiet_hours_suppress_critical_alert() {
        let settings = NotificationSettings {
            quiet_hours: Some(QuietHours::parse("22:00-07:00").unwrap()),
            ..Default::default()
        };
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            settings,
            tz(),
        );
        scheduler.initialize().await;

        // 23:30 Chicago on 2026-08-04 = 04:30 UTC next day.
        let late = Utc.with_ymd_and_hms(2026, 8, 5, 4, 30, 0).unwrap();
        let sent = scheduler.send_critical_alert(&item("i1", "Milk", day(2026, 8, 4)), late).await;

        assert!(!sent);
        assert!(scheduler.notifier().requests.is_empty());

        // Outside the window it goes out.
        let sent = scheduler.send_critical_alert(&item("i1", "Milk", day(2026, 8, 4)), noon_utc()).await;
        assert!(sent);
        assert_eq!(scheduler.notifier().requests.len(), 1);
    }

    #[test]
    fn malformed_settings_fall_back_to_defaults() {
        let settings = NotificationSettings { soon_hour: 99, ..Default::default() };
        let scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            settings,
            tz(),
        );
        assert_eq!(
            scheduler.settings().soon_hour,
            larder_core::settings::DEFAULT_SOON_HOUR
        );
    }

    #[tokio::test]
    async fn unknown_action_is_ignored() {
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            NotificationSettings::default(),
            tz(),
        );
        scheduler.initialize().await;

        let mut store = MemoryStore::default();
        scheduler
            .handle_response("snooze-forever", &NotificationData::default(), &mut store, noon_utc())
            .await;

        assert!(store.used.is_empty());
        assert_eq!(scheduler.pattern().action_rate, 0.0);
    }

    #[tokio::test]
    async fn mark_used_mutates_store_and_pattern() {
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            NotificationSettings::default(),
            tz(),
        );
        scheduler.initialize().await;

        let mut store = MemoryStore::default();
        let data = NotificationData {
            item_id: Some("i1".to_string()),
            ..Default::default()
        };
        scheduler.handle_response("mark-used", &data, &mut store, noon_utc()).await;

        assert_eq!(store.used, vec!["i1".to_string()]);
        assert!(scheduler.pattern().action_rate > 0.0);
    }

    #[tokio::test]
    async fn dismissal_does_not_count_as_action() {
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            NotificationSettings::default(),
            tz(),
        );
        scheduler.initialize().await;

        let mut store = MemoryStore::default();
        scheduler
            .handle_response("dismiss", &NotificationData::default(), &mut store, noon_utc())
            .await;

        assert_eq!(scheduler.pattern().action_rate, 0.0);
        assert!(scheduler.pattern().dismissal_rate > 0.0);
    }

    #[tokio::test]
    async fn adaptive_hour_moves_warning_delivery() {
        let mut scheduler = NotificationScheduler::new(
            RecordingNotifier::default(),
            BasicMealPlanner,
            NotificationSettings { morning_digest: false, ..Default::default() },
            tz(),
        );
        scheduler.initialize().await;

        // An engagement at 19:00 local teaches the pattern.
        let evening = Utc.with_ymd_and_hms(2026, 8, 4, 0, 0, 0).unwrap(); // 19:00 Aug 3 Chicago
        let mut store = MemoryStore::default();
        let data = NotificationData { item_id: Some("i0".to_string()), ..Default::default() };
        scheduler.handle_response("mark-used", &data, &mut store, evening).await;
        assert_eq!(scheduler.pattern().preferred_hour(10), 19);

        let items = vec![item("i1", "Yogurt", day(2026, 8, 5))];
        scheduler.schedule_expiry_notifications(&items, noon_utc()).await;

        let requests = &scheduler.notifier().requests;
        assert_eq!(requests.len(), 1);
        match requests[0].trigger {
            Trigger::At(fire) => {
                // 19:00 Chicago (CDT) = 00:00 UTC next day.
                assert_eq!(fire, Utc.with_ymd_and_hms(2026, 8, 5, 0, 0, 0).unwrap());
            }
            ref other => panic!("expected absolute trigger, got {other:?}"),
        }
    }
}
