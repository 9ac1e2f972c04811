use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Admin,
    Rider,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Vendor, Role::Admin, Role::Rider];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Admin => "admin",
            Role::Rider => "rider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vendor" => Ok(Role::Vendor),
            "admin" => Ok(Role::Admin),
            "rider" => Ok(Role::Rider),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VehicleType {
    Motorcycle,
    Van,
    Bicycle,
}

/// Role-specific part of a user. The variant is the user's role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Vendor {
        company_name: String,
        wallet_balance: Decimal,
    },
    Admin {
        organization: String,
    },
    Rider {
        phone: String,
        vehicle_type: VehicleType,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: Profile,
}

impl User {
    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Vendor { .. } => Role::Vendor,
            Profile::Admin { .. } => Role::Admin,
            Profile::Rider { .. } => Role::Rider,
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn company_name(&self) -> Option<&str> {
        match &self.profile {
            Profile::Vendor { company_name, .. } => Some(company_name),
            _ => None,
        }
    }

    pub fn wallet_balance(&self) -> Option<Decimal> {
        match &self.profile {
            Profile::Vendor { wallet_balance, .. } => Some(*wallet_balance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Ingredients,
    Vegetables,
    Spices,
    Packaging,
    Equipment,
    Drinks,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkDiscount {
    pub quantity: u32,
    pub discount_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub unit_price: Decimal,
    pub bulk_discount: BulkDiscount,
    pub image_url: String,
    pub stock: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryFrequency {
    #[serde(rename = "One-time")]
    OneTime,
    Weekly,
    #[serde(rename = "Bi-weekly")]
    BiWeekly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub delivery_frequency: DeliveryFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub vendor_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    #[serde(rename = "Picked Up")]
    PickedUp,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pending",
            DeliveryStatus::PickedUp => "Picked Up",
            DeliveryStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delivery {
    pub id: String,
    pub order_id: String,
    pub rider_id: Option<String>,
    pub pickup_address: String,
    pub delivery_address: String,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub vendor_id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
}

impl Transaction {
    /// Amount with the sign of its direction: credits positive, debits negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Vendor,
    Support,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider() -> User {
        User {
            id: "rider1".to_string(),
            name: "Karim Ahmed".to_string(),
            email: "karim@delivery.com".to_string(),
            profile: Profile::Rider {
                phone: "+1234567890".to_string(),
                vehicle_type: VehicleType::Motorcycle,
            },
        }
    }

    #[test]
    fn role_follows_profile_variant() {
        let user = rider();
        assert_eq!(user.role(), Role::Rider);
        assert_eq!(user.first_name(), "Karim");
        assert!(user.company_name().is_none());
        assert!(user.wallet_balance().is_none());
    }

    #[test]
    fn user_serializes_role_tag_inline() {
        let value = serde_json::to_value(rider()).unwrap();
        assert_eq!(value["role"], "rider");
        assert_eq!(value["vehicle_type"], "Motorcycle");
        assert!(value.get("company_name").is_none());
    }

    #[test]
    fn statuses_use_display_labels_on_the_wire() {
        assert_eq!(
            serde_json::to_value(DeliveryStatus::PickedUp).unwrap(),
            "Picked Up"
        );
        assert_eq!(
            serde_json::to_value(DeliveryFrequency::BiWeekly).unwrap(),
            "Bi-weekly"
        );
        let parsed: DeliveryStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(parsed, DeliveryStatus::Delivered);
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("courier".parse::<Role>().is_err());
    }

    #[test]
    fn debit_is_negative_when_signed() {
        let tx = Transaction {
            id: "t2".to_string(),
            vendor_id: "vendor1".to_string(),
            date: Utc::now(),
            description: "Order #o1 Payment".to_string(),
            amount: Decimal::new(32000, 2),
            kind: TransactionKind::Debit,
        };
        assert_eq!(tx.signed_amount(), Decimal::new(-32000, 2));
    }
}
