use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shawarma_core::{
    ChatMessage, Delivery, DeliveryStatus, Order, OrderStatus, ProductCategory, Role, User,
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceResponse {
    pub workspace_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub workspace_id: Uuid,
    pub actor: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectPageRequest {
    pub page: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<ProductCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// `replied`, `degraded` or `discarded`.
    pub outcome: String,
    pub reply: Option<ChatMessage>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRiderRequest {
    pub rider_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenDeliveryRequest {
    pub pickup_address: String,
    pub delivery_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptDeliveryRequest {
    pub rider_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStatusRequest {
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryTransitionResponse {
    pub delivery: Delivery,
    pub order: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpRequest {
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_requests_use_display_labels() {
        let delivery: DeliveryStatusRequest =
            serde_json::from_value(json!({ "status": "Picked Up" })).unwrap();
        assert_eq!(delivery.status, DeliveryStatus::PickedUp);

        let order: OrderStatusRequest =
            serde_json::from_value(json!({ "status": "Cancelled" })).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        let login: LoginRequest = serde_json::from_value(json!({ "role": "rider" })).unwrap();
        assert_eq!(login.role, Role::Rider);
    }

    #[test]
    fn category_query_is_optional() {
        let query: CategoryQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.category.is_none());
    }
}
