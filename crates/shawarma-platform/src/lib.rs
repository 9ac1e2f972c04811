pub mod config;
pub mod contracts;

pub use config::ServiceConfig;
pub use contracts::{
    AcceptDeliveryRequest, AssignRiderRequest, CategoryQuery, DeliveryStatusRequest,
    DeliveryTransitionResponse, LoginRequest, OpenDeliveryRequest, OrderStatusRequest,
    SelectPageRequest, SendMessageRequest, SendMessageResponse, SessionResponse, TopUpRequest,
    WorkspaceResponse,
};
