use chrono::Utc;
use serde::Deserialize;
use shawarma_catalog::Catalog;
use shawarma_core::{Delivery, DeliveryStatus, Order, OrderStatus, Profile, Role, User, VehicleType};
use shawarma_wallet::WalletLedger;

use crate::error::EngineError;

#[derive(Debug, Clone, Deserialize)]
pub struct RiderRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_type: VehicleType,
}

/// Every collection the marketplace owns. Clones handed out by
/// `Marketplace::snapshot` are read-only views; the transition methods are
/// crate-private so only the engine can change orders and deliveries.
#[derive(Debug, Clone, Default)]
pub struct MarketState {
    users: Vec<User>,
    catalog: Catalog,
    orders: Vec<Order>,
    deliveries: Vec<Delivery>,
    ledger: WalletLedger,
}

impl MarketState {
    pub fn new(
        users: Vec<User>,
        catalog: Catalog,
        orders: Vec<Order>,
        deliveries: Vec<Delivery>,
        ledger: WalletLedger,
    ) -> Self {
        Self {
            users,
            catalog,
            orders,
            deliveries,
            ledger,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn ledger(&self) -> &WalletLedger {
        &self.ledger
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn users_with_role(&self, role: Role) -> Vec<&User> {
        self.users.iter().filter(|user| user.role() == role).collect()
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    pub fn delivery(&self, delivery_id: &str) -> Option<&Delivery> {
        self.deliveries
            .iter()
            .find(|delivery| delivery.id == delivery_id)
    }

    pub fn delivery_for_order(&self, order_id: &str) -> Option<&Delivery> {
        self.deliveries
            .iter()
            .find(|delivery| delivery.order_id == order_id)
    }

    pub fn orders_for_vendor(&self, vendor_id: &str) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.vendor_id == vendor_id)
            .collect()
    }

    pub fn orders_with_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status == status)
            .collect()
    }

    /// Deliveries the rider holds that are not finished yet.
    pub fn assigned_deliveries(&self, rider_id: &str) -> Vec<&Delivery> {
        self.deliveries
            .iter()
            .filter(|delivery| {
                delivery.rider_id.as_deref() == Some(rider_id)
                    && delivery.status != DeliveryStatus::Delivered
            })
            .collect()
    }

    /// Unassigned deliveries still waiting for pickup.
    pub fn available_deliveries(&self) -> Vec<&Delivery> {
        self.deliveries
            .iter()
            .filter(|delivery| {
                delivery.rider_id.is_none() && delivery.status == DeliveryStatus::Pending
            })
            .collect()
    }

    pub fn vendor_company_for_order(&self, order_id: &str) -> Option<&str> {
        let order = self.order(order_id)?;
        self.user(&order.vendor_id)?.company_name()
    }

    fn ensure_rider(&self, rider_id: &str) -> Result<(), EngineError> {
        match self.user(rider_id) {
            Some(user) if user.role() == Role::Rider => Ok(()),
            _ => Err(EngineError::UnknownRider(rider_id.to_string())),
        }
    }

    fn delivery_index(&self, delivery_id: &str) -> Result<usize, EngineError> {
        self.deliveries
            .iter()
            .position(|delivery| delivery.id == delivery_id)
            .ok_or_else(|| EngineError::DeliveryNotFound(delivery_id.to_string()))
    }

    fn order_index(&self, order_id: &str) -> Result<usize, EngineError> {
        self.orders
            .iter()
            .position(|order| order.id == order_id)
            .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))
    }

    pub(crate) fn assign_rider(
        &mut self,
        order_id: &str,
        rider_id: &str,
    ) -> Result<Delivery, EngineError> {
        self.order_index(order_id)?;
        let index = self
            .deliveries
            .iter()
            .position(|delivery| delivery.order_id == order_id)
            .ok_or_else(|| EngineError::NoDeliveryForOrder(order_id.to_string()))?;
        self.ensure_rider(rider_id)?;

        let delivery = &mut self.deliveries[index];
        if let Some(current) = &delivery.rider_id {
            return Err(EngineError::RiderAlreadyAssigned {
                delivery_id: delivery.id.clone(),
                rider_id: current.clone(),
            });
        }

        delivery.rider_id = Some(rider_id.to_string());
        Ok(delivery.clone())
    }

    pub(crate) fn accept_delivery(
        &mut self,
        delivery_id: &str,
        rider_id: &str,
    ) -> Result<Delivery, EngineError> {
        let index = self.delivery_index(delivery_id)?;
        self.ensure_rider(rider_id)?;

        let delivery = &mut self.deliveries[index];
        if let Some(current) = &delivery.rider_id {
            return Err(EngineError::RiderAlreadyAssigned {
                delivery_id: delivery.id.clone(),
                rider_id: current.clone(),
            });
        }
        if delivery.status != DeliveryStatus::Pending {
            return Err(EngineError::DeliveryNotPending {
                delivery_id: delivery.id.clone(),
                status: delivery.status,
            });
        }

        delivery.rider_id = Some(rider_id.to_string());
        delivery.status = DeliveryStatus::PickedUp;
        Ok(delivery.clone())
    }

    pub(crate) fn advance_delivery_status(
        &mut self,
        delivery_id: &str,
        new_status: DeliveryStatus,
    ) -> Result<(Delivery, Order), EngineError> {
        let delivery_index = self.delivery_index(delivery_id)?;
        let current = self.deliveries[delivery_index].status;
        if !(current == DeliveryStatus::PickedUp && new_status == DeliveryStatus::Delivered) {
            return Err(EngineError::InvalidDeliveryTransition {
                from: current,
                to: new_status,
            });
        }

        let order_id = self.deliveries[delivery_index].order_id.clone();
        let order_index = self.order_index(&order_id)?;
        if self.orders[order_index].status == OrderStatus::Cancelled {
            return Err(EngineError::OrderCancelled(order_id));
        }

        let delivery = &mut self.deliveries[delivery_index];
        delivery.status = new_status;
        let delivery = delivery.clone();

        let order = &mut self.orders[order_index];
        order.status = OrderStatus::Delivered;
        order.delivery_date.get_or_insert_with(Utc::now);

        Ok((delivery, order.clone()))
    }

    pub(crate) fn set_order_status(
        &mut self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, EngineError> {
        let index = self.order_index(order_id)?;
        let order = &mut self.orders[index];
        order.status = status;
        Ok(order.clone())
    }

    pub(crate) fn open_delivery(
        &mut self,
        order_id: &str,
        pickup_address: &str,
        delivery_address: &str,
    ) -> Result<Delivery, EngineError> {
        let index = self.order_index(order_id)?;
        let order = &self.orders[index];
        if order.status != OrderStatus::Processing {
            return Err(EngineError::OrderNotProcessing {
                order_id: order.id.clone(),
                status: order.status,
            });
        }
        if let Some(existing) = self.delivery_for_order(order_id) {
            return Err(EngineError::DeliveryAlreadyExists {
                order_id: order_id.to_string(),
                delivery_id: existing.id.clone(),
            });
        }

        let delivery = Delivery {
            id: self.next_id("d", self.deliveries.len()),
            order_id: order_id.to_string(),
            rider_id: None,
            pickup_address: pickup_address.trim().to_string(),
            delivery_address: delivery_address.trim().to_string(),
            status: DeliveryStatus::Pending,
        };
        self.deliveries.push(delivery.clone());
        Ok(delivery)
    }

    pub(crate) fn register_rider(
        &mut self,
        registration: RiderRegistration,
    ) -> Result<User, EngineError> {
        let name = required(&registration.name, "name")?;
        let email = required(&registration.email, "email")?;
        let phone = required(&registration.phone, "phone")?;

        let rider = User {
            id: self.next_id("rider", self.users_with_role(Role::Rider).len()),
            name,
            email,
            profile: Profile::Rider {
                phone,
                vehicle_type: registration.vehicle_type,
            },
        };
        self.users.push(rider.clone());
        Ok(rider)
    }

    /// `<prefix><existing + 1>`, bumped until it does not collide.
    fn next_id(&self, prefix: &str, existing: usize) -> String {
        let mut n = existing + 1;
        loop {
            let candidate = format!("{prefix}{n}");
            let taken = self.users.iter().any(|user| user.id == candidate)
                || self
                    .deliveries
                    .iter()
                    .any(|delivery| delivery.id == candidate);
            if !taken {
                return candidate;
            }
            n += 1;
        }
    }
}

fn required(value: &str, field: &str) -> Result<String, EngineError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidRegistration(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
