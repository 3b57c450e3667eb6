use chrono::{DateTime, Duration, Utc};

use crate::domain::{ServiceType, VehicleType};

pub const BASE_PRICE: f64 = 180.0;
pub const ROUND_TRIP_MULTIPLIER: f64 = 1.8;

/// Price estimate for a ride, in BRL.
pub fn estimate_price(vehicle: VehicleType, service: ServiceType, return_trip: bool) -> f64 {
    let round_trip = if return_trip { ROUND_TRIP_MULTIPLIER } else { 1.0 };
    BASE_PRICE * vehicle.multiplier() * service.multiplier() * round_trip
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingEstimate {
    value: f64,
    due: DateTime<Utc>,
}

/// Holds at most one computed estimate until its reveal instant.
///
/// The value is known at `start`; the timer only decides when it becomes
/// visible. A cancelled timer yields nothing on later polls.
#[derive(Debug, Default, Clone)]
pub struct PricingTimer {
    pending: Option<PendingEstimate>,
}

impl PricingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `value` to be revealed at `now + delay`, replacing any pending estimate.
    pub fn start(&mut self, value: f64, now: DateTime<Utc>, delay: Duration) {
        let due = now + delay;
        tracing::debug!(value, %due, "pricing estimate scheduled");
        self.pending = Some(PendingEstimate { value, due });
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("pending pricing estimate cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the estimate once it is due and clears the timer.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<f64> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.value)
            }
            _ => None,
        }
    }
}
