//! Adaptive notification pattern.
//!
//! A soft heuristic, never required for correctness: tracks when the user
//! actually engages with notifications and how often actions get taken, so
//! the scheduler can pick a better delivery hour. Smoothing is a simple
//! exponential blend, not a statistical model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blend factor for rate/response updates: new = old * 0.8 + sample * 0.2.
const SMOOTHING: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserNotificationPattern {
    /// Local hour at which the user most recently engaged. `None` until the
    /// first observed action.
    pub best_hour: Option<u32>,
    /// Smoothed seconds between delivery and response.
    pub avg_response_secs: f64,
    /// Smoothed share of notifications that led to an action, capped at 1.0.
    pub action_rate: f64,
    /// Smoothed share of notifications explicitly dismissed.
    pub dismissal_rate: f64,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl UserNotificationPattern {
    /// Record a handled (non-dismissal) action response.
    ///
    /// `local_hour` is the wall-clock hour the response happened at;
    /// `response_secs` is delivery-to-response latency when known.
    pub fn record_action(
        &mut self,
        local_hour: u32,
        response_secs: Option<f64>,
        now_utc: DateTime<Utc>,
    ) {
        self.action_rate = (self.action_rate * (1.0 - SMOOTHING) + SMOOTHING).min(1.0);
        self.dismissal_rate *= 1.0 - SMOOTHING;

        if let Some(secs) = response_secs {
            self.avg_response_secs = if self.avg_response_secs == 0.0 {
                secs
            } else {
                self.avg_response_secs * (1.0 - SMOOTHING) + secs * SMOOTHING
            };
        }

        self.best_hour = Some(local_hour.min(23));
        self.updated_at_utc = Some(now_utc);
    }

    /// Record an explicit dismissal. Dismissals never count as actions.
    pub fn record_dismissal(&mut self, now_utc: DateTime<Utc>) {
        self.dismissal_rate = (self.dismissal_rate * (1.0 - SMOOTHING) + SMOOTHING).min(1.0);
        self.action_rate *= 1.0 - SMOOTHING;
        self.updated_at_utc = Some(now_utc);
    }

    /// Preferred delivery hour, falling back to the caller's default until
    /// an engagement has been observed.
    pub fn preferred_hour(&self, fallback: u32) -> u32 {
        self.best_hour.unwrap_or(fallback)
    }
}
