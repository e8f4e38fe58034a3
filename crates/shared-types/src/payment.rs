use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a payment order as tracked locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PaymentOrderStatus {
    Created,
    Paid,
}

impl PaymentOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOrderStatus::Created => "created",
            PaymentOrderStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(PaymentOrderStatus::Created),
            "paid" => Some(PaymentOrderStatus::Paid),
            _ => None,
        }
    }
}

/// Request body for creating a payment order against a submitted draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateOrderRequest {
    pub draft_id: String,
}

/// A payment order handed to the client for the gateway checkout.
///
/// `amount` is in minor units (paise); `currency` is always INR.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentOrderResponse {
    pub order_id: String,
    pub draft_id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Gateway callback confirming a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentCallbackRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Result of successful payment reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentSuccessResponse {
    pub filing_number: String,
    pub draft_id: String,
    pub payment_id: String,
    pub status: String,
    pub amount: i64,
}
