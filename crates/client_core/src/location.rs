//! Receiver location save and the availability verdict that comes back.

use std::sync::Arc;

use shared::protocol::{LocationCheckResult, LocationUpdate, ProviderInRange};
use tracing::{info, warn};

use crate::{
    view::{Dialog, DialogKind, DialogView, LocationStatus},
    RequestStore,
};

const SAVE_FAILED: &str = "Could not save location.";

#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Available(LocationCheckResult),
    Unavailable(LocationCheckResult),
    Failed(String),
}

/// Saves the receiver's pin and shows the store's verdict.
///
/// The verdict is informational only. Unlocking submission is a separate,
/// explicit confirmation and is not done here.
pub struct LocationAvailabilityChecker {
    store: Arc<dyn RequestStore>,
    dialogs: Arc<dyn DialogView>,
}

impl LocationAvailabilityChecker {
    pub fn new(store: Arc<dyn RequestStore>, dialogs: Arc<dyn DialogView>) -> Self {
        Self { store, dialogs }
    }

    pub async fn save_location(&self, text: &str, lat: Option<f64>, lng: Option<f64>) -> LocationOutcome {
        self.dialogs.show_location_status(LocationStatus::Saving);

        let update = LocationUpdate {
            location_text: text.trim().to_string(),
            lat,
            lng,
        };
        let result = match self.store.save_receiver_location(&update).await {
            Ok(result) if result.ok => result,
            Ok(result) => {
                let message = result
                    .error
                    .as_deref()
                    .map(str::trim)
                    .filter(|message| !message.is_empty())
                    .unwrap_or(SAVE_FAILED)
                    .to_string();
                return self.fail(message);
            }
            Err(err) => {
                warn!(error = %err, "failed to save receiver location");
                return self.fail(err.user_message(|_| SAVE_FAILED.to_string(), SAVE_FAILED));
            }
        };

        info!(
            can_serve = result.can_serve,
            providers_in_range = ?result.providers_in_range,
            "receiver location saved"
        );
        let status = if result.can_serve {
            LocationStatus::Available
        } else {
            LocationStatus::Unavailable
        };
        self.dialogs.show_location_status(status);
        self.dialogs.show_dialog(&verdict_dialog(&result));

        if result.can_serve {
            LocationOutcome::Available(result)
        } else {
            LocationOutcome::Unavailable(result)
        }
    }

    fn fail(&self, message: String) -> LocationOutcome {
        self.dialogs.show_location_status(LocationStatus::Failed);
        self.dialogs.show_dialog(&Dialog {
            kind: DialogKind::Error,
            title: "Location not saved".to_string(),
            message: message.clone(),
            extra: None,
            lines: Vec::new(),
        });
        LocationOutcome::Failed(message)
    }
}

/// Most providers listed by name in the verdict.
const LISTED_PROVIDERS: usize = 5;

/// Dialog for a successful save. An unserviceable location gets no provider
/// count since nobody is in range.
pub fn verdict_dialog(result: &LocationCheckResult) -> Dialog {
    let nearest = result
        .nearest_provider_km
        .map(|km| format!("Nearest provider: {km} km"));

    let mut lines = Vec::new();
    if let (Some(configured), Some(total)) = (result.providers_configured, result.providers_total) {
        lines.push(format!("Providers with a service area: {configured} of {total}"));
    }

    if result.can_serve {
        let mut extra = format!(
            "Providers in range: {}",
            result.providers_in_range.unwrap_or_default()
        );
        if let Some(nearest) = nearest {
            extra.push_str(" • ");
            extra.push_str(&nearest);
        }
        lines.extend(
            result
                .providers_list
                .iter()
                .take(LISTED_PROVIDERS)
                .map(provider_line),
        );
        Dialog {
            kind: DialogKind::Success,
            title: "Service available".to_string(),
            message: result.reason.clone(),
            extra: Some(extra),
            lines,
        }
    } else {
        Dialog {
            kind: DialogKind::Warning,
            title: "Service not available".to_string(),
            message: result.reason.clone(),
            extra: nearest,
            lines,
        }
    }
}

fn provider_line(provider: &ProviderInRange) -> String {
    format!(
        "{} • {} km away (serves within {} km)",
        provider.name, provider.distance_km, provider.radius_km
    )
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
