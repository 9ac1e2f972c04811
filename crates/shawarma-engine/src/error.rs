use shawarma_core::{DeliveryStatus, OrderStatus};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("order '{0}' not found")]
    OrderNotFound(String),
    #[error("delivery '{0}' not found")]
    DeliveryNotFound(String),
    #[error("order '{0}' has no delivery")]
    NoDeliveryForOrder(String),
    #[error("rider '{0}' is not registered")]
    UnknownRider(String),
    #[error("delivery '{delivery_id}' is already assigned to '{rider_id}'")]
    RiderAlreadyAssigned {
        delivery_id: String,
        rider_id: String,
    },
    #[error("delivery '{delivery_id}' is {status}, not Pending")]
    DeliveryNotPending {
        delivery_id: String,
        status: DeliveryStatus,
    },
    #[error("delivery cannot move from {from} to {to}")]
    InvalidDeliveryTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },
    #[error("order '{0}' is cancelled")]
    OrderCancelled(String),
    #[error("order '{order_id}' is {status}; deliveries open only for Processing orders")]
    OrderNotProcessing {
        order_id: String,
        status: OrderStatus,
    },
    #[error("order '{order_id}' already has delivery '{delivery_id}'")]
    DeliveryAlreadyExists {
        order_id: String,
        delivery_id: String,
    },
    #[error("invalid rider registration: {0}")]
    InvalidRegistration(String),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::OrderNotFound(_)
                | EngineError::DeliveryNotFound(_)
                | EngineError::NoDeliveryForOrder(_)
                | EngineError::UnknownRider(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::RiderAlreadyAssigned { .. } | EngineError::DeliveryAlreadyExists { .. }
        )
    }
}
