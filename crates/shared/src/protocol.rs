use serde::{Deserialize, Serialize};

use crate::domain::{RequestId, RequestStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_wage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serviced_at: Option<String>,
    /// Provider feed only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_serve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serve_reason: Option<String>,
}

/// Body of `POST /api/requests`. Absent numeric inputs are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestPayload {
    pub title: String,
    pub category: String,
    pub details: String,
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub duration_min: Option<i64>,
    pub hourly_wage: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRequestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

/// Reply to a resolve call. `already` marks an idempotent no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReceipt {
    #[serde(default)]
    pub already: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub location_text: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInRange {
    pub id: i64,
    pub name: String,
    pub distance_km: f64,
    pub radius_km: f64,
}

/// Availability verdict for a receiver location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCheckResult {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub can_serve: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers_in_range: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_provider_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers_configured: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers_list: Vec<ProviderInRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
