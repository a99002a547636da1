//! Pure geofence classification. No clock, no IO — staleness comes in as a
//! precomputed age so the evaluator is testable with fixed inputs.

use chrono::Duration;

use presenza_domain::geo::{GeoPoint, Geofence};

use crate::domain::types::{Classification, PermissionState, TenantSettings};

/// Thresholds the evaluator judges a sample against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceThresholds {
    /// Samples with worse reported accuracy are too unreliable to prove the
    /// employee left the fence.
    pub max_accuracy_m: f64,
    /// Samples older than this count as location-disabled.
    pub staleness: Duration,
}

impl From<&TenantSettings> for GeofenceThresholds {
    fn from(settings: &TenantSettings) -> Self {
        Self {
            max_accuracy_m: settings.max_accuracy_m,
            staleness: settings.staleness,
        }
    }
}

/// Classify one location sample. Rules in priority order, first match wins:
///
/// 1. Permission not granted, sample stale, or point absent → LocationDisabled.
/// 2. Accuracy missing or above the usable maximum → the sample cannot prove
///    an exit, so it never downgrades to OutOfBranch (returns Ok here).
/// 3. Great-circle distance beyond the fence radius → OutOfBranch.
/// 4. Otherwise Ok.
pub fn classify(
    point: Option<GeoPoint>,
    accuracy_m: Option<f64>,
    permission: PermissionState,
    last_sample_age: Duration,
    fence: &Geofence,
    thresholds: &GeofenceThresholds,
) -> Classification {
    if permission != PermissionState::Granted || last_sample_age > thresholds.staleness {
        return Classification::LocationDisabled;
    }
    let Some(point) = point else {
        return Classification::LocationDisabled;
    };

    let usable = matches!(accuracy_m, Some(acc) if acc.is_finite() && acc <= thresholds.max_accuracy_m);
    if !usable {
        return Classification::Ok;
    }

    if !fence.contains(&point) {
        return Classification::OutOfBranch;
    }
    Classification::Ok
}
