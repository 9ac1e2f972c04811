pub mod events;
pub mod models;
pub mod storage;

pub use events::{ActivityEvent, ActivityKind};
pub use models::{
    BulkDiscount, ChatMessage, Delivery, DeliveryFrequency, DeliveryStatus, Order, OrderItem,
    OrderStatus, Product, ProductCategory, Profile, Role, Sender, Transaction, TransactionKind,
    User, VehicleType,
};
pub use storage::{ActivityJournal, JournalEntry};
