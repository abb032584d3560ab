use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::order::commands::{OrderCommand, PlaceOrder};
use crate::domain::order::model::{DeliveryAddress, Order, OrderItem};
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Order Endpoints
// ============================================================================
//
// The order API is the only writer of the orders table. Each lifecycle call
// validates the transition, persists the row, and publishes exactly one
// event for the consumers.
//
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub items: Vec<OrderItem>,
    pub address: DeliveryAddress,
    #[serde(default)]
    pub delivery_fee_cents: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct AcceptRequest {
    pub eta_minutes: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PickUpRequest {
    pub agent_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
}

pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if state.customers.fetch(request.customer_id).await?.is_none() {
        return Err(ApiError::NotFound("Customer"));
    }
    let partner = state
        .partners
        .fetch(request.partner_id)
        .await?
        .ok_or(ApiError::NotFound("Partner"))?;
    if !partner.is_open {
        return Err(ApiError::Conflict("Partner is not accepting orders".to_string()));
    }

    let (order, event) = Order::place(PlaceOrder {
        customer_id: request.customer_id,
        partner_id: request.partner_id,
        items: request.items,
        address: request.address,
        delivery_fee_cents: request.delivery_fee_cents,
    })?;

    state.orders.insert(&order).await?;
    state.publish(event, Uuid::new_v4()).await;

    tracing::info!(
        order_id = %order.id,
        customer_id = %order.customer_id,
        partner_id = %order.partner_id,
        total_cents = order.total_cents,
        "Order placed"
    );

    Ok(HttpResponse::Created().json(order))
}

pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let order = state
        .orders
        .fetch(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    Ok(HttpResponse::Ok().json(order))
}

pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list(query.customer_id, query.partner_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

pub async fn accept_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<AcceptRequest>>,
) -> Result<HttpResponse, ApiError> {
    let eta_minutes = body.map(|b| b.into_inner().eta_minutes).unwrap_or_default();
    transition(&state, path.into_inner(), OrderCommand::Accept { eta_minutes }).await
}

pub async fn reject_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<RejectRequest>>,
) -> Result<HttpResponse, ApiError> {
    let reason = body.map(|b| b.into_inner().reason).unwrap_or_default();
    transition(&state, path.into_inner(), OrderCommand::Reject { reason }).await
}

pub async fn mark_ready(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    transition(&state, path.into_inner(), OrderCommand::MarkReady).await
}

pub async fn pick_up_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PickUpRequest>,
) -> Result<HttpResponse, ApiError> {
    let agent_id = body.agent_id;

    let agent = state
        .agents
        .fetch(agent_id)
        .await?
        .ok_or(ApiError::NotFound("Agent"))?;
    if !agent.available {
        return Err(ApiError::Conflict("Agent is not available".to_string()));
    }

    let response = transition(&state, path.into_inner(), OrderCommand::PickUp { agent_id }).await?;

    // The courier is busy until the drop-off.
    state.agents.set_available(agent_id, false).await?;

    Ok(response)
}

pub async fn deliver_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();
    let response = transition(&state, order_id, OrderCommand::Deliver).await?;

    // Free the courier for the next pickup.
    if let Some(order) = state.orders.fetch(order_id).await? {
        if let Some(agent_id) = order.agent_id {
            state.agents.set_available(agent_id, true).await?;
        }
    }

    Ok(response)
}

/// Shared transition flow: load, validate against the state machine, persist,
/// publish the single resulting event.
async fn transition(
    state: &AppState,
    order_id: Uuid,
    command: OrderCommand,
) -> Result<HttpResponse, ApiError> {
    let mut order = state
        .orders
        .fetch(order_id)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    let event = order.handle(&command)?;
    order.apply(&event);

    state.orders.update_transition(&order).await?;
    state.publish(event, Uuid::new_v4()).await;

    tracing::info!(
        order_id = %order.id,
        status = order.status.as_str(),
        "Order transitioned"
    );

    Ok(HttpResponse::Ok().json(order))
}
