use std::sync::Arc;

use serde_json::json;
use shawarma_core::{
    ActivityEvent, ActivityJournal, ActivityKind, Delivery, DeliveryStatus, Order, OrderStatus,
    Role, User,
};
use shawarma_journal::InMemoryJournal;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::EngineError,
    seed,
    state::{MarketState, RiderRegistration},
};

/// Process-wide marketplace. Each operation runs under a single write guard,
/// so concurrent claims on the same delivery are decided by whoever takes the
/// lock first.
pub struct Marketplace {
    state: RwLock<MarketState>,
    journal: Arc<dyn ActivityJournal>,
}

impl Marketplace {
    pub fn new(state: MarketState, journal: Arc<dyn ActivityJournal>) -> Self {
        Self {
            state: RwLock::new(state),
            journal,
        }
    }

    pub fn seeded() -> anyhow::Result<Self> {
        Ok(Self::new(
            seed::market_state()?,
            Arc::new(InMemoryJournal::new()),
        ))
    }

    pub fn journal(&self) -> Arc<dyn ActivityJournal> {
        Arc::clone(&self.journal)
    }

    pub async fn snapshot(&self) -> MarketState {
        self.state.read().await.clone()
    }

    /// The demo account a role-picker login lands on.
    pub async fn first_user_with_role(&self, role: Role) -> Option<User> {
        let state = self.state.read().await;
        state.users_with_role(role).first().map(|user| (*user).clone())
    }

    pub async fn user(&self, user_id: &str) -> Option<User> {
        self.state.read().await.user(user_id).cloned()
    }

    pub async fn assign_rider(
        &self,
        order_id: &str,
        rider_id: &str,
    ) -> Result<Delivery, EngineError> {
        let mut state = self.state.write().await;
        let delivery = state
            .assign_rider(order_id, rider_id)
            .inspect_err(|err| warn!("assign rider rejected: {err}"))?;

        info!(order_id, rider_id, delivery_id = %delivery.id, "rider assigned");
        self.record(
            ActivityKind::RiderAssigned,
            &delivery.id,
            json!({ "order_id": order_id, "rider_id": rider_id }),
        )
        .await;

        Ok(delivery)
    }

    pub async fn accept_delivery(
        &self,
        delivery_id: &str,
        rider_id: &str,
    ) -> Result<Delivery, EngineError> {
        let mut state = self.state.write().await;
        let delivery = state
            .accept_delivery(delivery_id, rider_id)
            .inspect_err(|err| warn!("accept delivery rejected: {err}"))?;

        info!(delivery_id, rider_id, "delivery accepted");
        self.record(
            ActivityKind::DeliveryAccepted,
            delivery_id,
            json!({ "rider_id": rider_id, "status": delivery.status }),
        )
        .await;

        Ok(delivery)
    }

    /// Moves a delivery forward and forces its order to Delivered alongside it.
    pub async fn advance_delivery_status(
        &self,
        delivery_id: &str,
        new_status: DeliveryStatus,
    ) -> Result<(Delivery, Order), EngineError> {
        let mut state = self.state.write().await;
        let (delivery, order) = state
            .advance_delivery_status(delivery_id, new_status)
            .inspect_err(|err| warn!("delivery status change rejected: {err}"))?;

        info!(delivery_id, order_id = %order.id, status = %delivery.status, "delivery advanced");
        self.record(
            ActivityKind::DeliveryStatusAdvanced,
            delivery_id,
            json!({
                "order_id": order.id,
                "status": delivery.status,
                "order_status": order.status,
            }),
        )
        .await;

        Ok((delivery, order))
    }

    pub async fn set_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, EngineError> {
        let mut state = self.state.write().await;
        let previous = state.order(order_id).map(|order| order.status);
        let order = state
            .set_order_status(order_id, status)
            .inspect_err(|err| warn!("order status change rejected: {err}"))?;

        info!(order_id, %status, "order status set");
        self.record(
            ActivityKind::OrderStatusSet,
            order_id,
            json!({ "from": previous, "to": status }),
        )
        .await;

        Ok(order)
    }

    pub async fn open_delivery(
        &self,
        order_id: &str,
        pickup_address: &str,
        delivery_address: &str,
    ) -> Result<Delivery, EngineError> {
        let mut state = self.state.write().await;
        let delivery = state
            .open_delivery(order_id, pickup_address, delivery_address)
            .inspect_err(|err| warn!("open delivery rejected: {err}"))?;

        info!(order_id, delivery_id = %delivery.id, "delivery opened");
        self.record(
            ActivityKind::DeliveryOpened,
            &delivery.id,
            json!({
                "order_id": order_id,
                "pickup_address": delivery.pickup_address,
                "delivery_address": delivery.delivery_address,
            }),
        )
        .await;

        Ok(delivery)
    }

    pub async fn register_rider(
        &self,
        registration: RiderRegistration,
    ) -> Result<User, EngineError> {
        let mut state = self.state.write().await;
        let rider = state
            .register_rider(registration)
            .inspect_err(|err| warn!("rider registration rejected: {err}"))?;

        info!(rider_id = %rider.id, "rider registered");
        self.record(
            ActivityKind::RiderRegistered,
            &rider.id,
            json!({ "name": rider.name, "email": rider.email }),
        )
        .await;

        Ok(rider)
    }

    async fn record(&self, kind: ActivityKind, aggregate_id: &str, payload: serde_json::Value) {
        let event = ActivityEvent::new(kind, aggregate_id, payload);
        if let Err(err) = self.journal.append(event).await {
            warn!("failed to journal {kind:?} for {aggregate_id}: {err}");
        }
    }
}
