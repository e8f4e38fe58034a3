use axum::extract::State;
use axum::Json;
use shared_types::{
    AppError, CreateOrderRequest, DraftStatus, PaymentCallbackRequest, PaymentOrderResponse,
    PaymentSuccessResponse,
};

use crate::db::AppState;
use crate::identity::OwnerTag;
use crate::ids;
use crate::payment::{minor_units, CURRENCY};
use crate::repo::{draft, payment};

/// Create a payment order for a submitted draft.
///
/// The amount comes from the frozen total on the draft, never from the
/// client. A draft can hold several orders (abandoned checkouts leave
/// `created` rows behind); settlement of any one of them pays the
/// filing.
#[utoipa::path(
    post,
    path = "/api/payments/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = PaymentOrderResponse),
        (status = 404, description = "Draft not found", body = AppError),
        (status = 409, description = "Draft not awaiting payment", body = AppError)
    ),
    tag = "payments"
)]
pub async fn create_order(
    State(state): State<AppState>,
    owner: OwnerTag,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<PaymentOrderResponse>, AppError> {
    let row = draft::get(&state.pool, &req.draft_id, owner.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Draft not found"))?;

    if row.status != DraftStatus::Submitted.as_str() {
        return Err(AppError::conflict(
            "Draft must be submitted before payment",
        ));
    }

    let order_id = ids::order_id();
    let amount = minor_units(row.total_amount);
    let receipt = format!("receipt_{order_id}");
    let order = payment::insert_order(
        &state.pool,
        &order_id,
        &row.draft_id,
        amount,
        CURRENCY,
        &receipt,
    )
    .await?;

    tracing::info!(order_id = %order.order_id, draft_id = %order.draft_id, amount, "payment order created");

    Ok(Json(PaymentOrderResponse {
        order_id: order.order_id,
        draft_id: order.draft_id,
        amount: order.amount,
        currency: order.currency,
        receipt: order.receipt,
        status: order.status,
        created_at: order.created_at,
    }))
}

/// Settle a gateway payment callback.
///
/// The signature is verified before anything is read from the
/// database, so unauthenticated callers learn nothing about order
/// existence. Replays of a settled order return the recorded outcome.
#[utoipa::path(
    post,
    path = "/api/payments/callback",
    request_body = PaymentCallbackRequest,
    responses(
        (status = 200, description = "Payment settled", body = PaymentSuccessResponse),
        (status = 402, description = "Signature verification failed", body = AppError),
        (status = 404, description = "Order not found", body = AppError),
        (status = 409, description = "Draft not awaiting payment", body = AppError)
    ),
    tag = "payments"
)]
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(req): Json<PaymentCallbackRequest>,
) -> Result<Json<PaymentSuccessResponse>, AppError> {
    if req.order_id.trim().is_empty()
        || req.payment_id.trim().is_empty()
        || req.signature.trim().is_empty()
    {
        return Err(AppError::bad_request(
            "order_id, payment_id and signature are required",
        ));
    }

    if !state
        .verifier
        .verify(&req.order_id, &req.payment_id, &req.signature)
    {
        tracing::warn!(order_id = %req.order_id, "payment signature verification failed");
        return Err(AppError::payment_verification_failed(
            "Payment signature verification failed",
        ));
    }

    let filing_number = ids::filing_number();
    let outcome =
        payment::reconcile(&state.pool, &req.order_id, &req.payment_id, &filing_number).await?;

    if outcome.replayed {
        tracing::info!(order_id = %req.order_id, "replayed callback for settled order");
    } else {
        tracing::info!(
            order_id = %req.order_id,
            draft_id = %outcome.draft_id,
            filing_number = %outcome.filing_number,
            "payment settled"
        );
    }

    Ok(Json(PaymentSuccessResponse {
        filing_number: outcome.filing_number,
        draft_id: outcome.draft_id,
        payment_id: outcome.payment_id,
        status: "paid".to_string(),
        amount: outcome.amount,
    }))
}
