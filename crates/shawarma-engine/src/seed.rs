use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shawarma_catalog::Catalog;
use shawarma_core::{
    BulkDiscount, Delivery, DeliveryFrequency, DeliveryStatus, Order, OrderItem, OrderStatus,
    Product, ProductCategory, Profile, Transaction, TransactionKind, User, VehicleType,
};
use shawarma_wallet::WalletLedger;

use crate::state::MarketState;

const HQ_ADDRESS: &str = "Hello Shawarma HQ";

pub fn rider_weekly_earnings() -> Decimal {
    Decimal::new(24550, 2)
}

/// Demo data every process starts from.
pub fn market_state() -> Result<MarketState> {
    let products = products();

    Ok(MarketState::new(
        users(),
        Catalog::new(products.clone()),
        orders(&products)?,
        deliveries(),
        WalletLedger::new(transactions()?),
    ))
}

fn users() -> Vec<User> {
    vec![
        vendor(
            "vendor1",
            "Ali's Shawarma",
            "Ali's Shawarma Spot",
            "ali@shawarma.com",
            Decimal::new(125075, 2),
        ),
        vendor(
            "vendor2",
            "Fatima's Grill",
            "Fatima's Grill House",
            "fatima@grill.com",
            Decimal::new(83020, 2),
        ),
        User {
            id: "admin1".to_string(),
            name: "Admin User".to_string(),
            email: "admin@helloshawarma.com".to_string(),
            profile: Profile::Admin {
                organization: HQ_ADDRESS.to_string(),
            },
        },
        rider(
            "rider1",
            "Karim Ahmed",
            "karim@delivery.com",
            "+1234567890",
            VehicleType::Motorcycle,
        ),
        rider(
            "rider2",
            "Samira Hassan",
            "samira@delivery.com",
            "+1234567891",
            VehicleType::Van,
        ),
    ]
}

fn vendor(id: &str, name: &str, company: &str, email: &str, balance: Decimal) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        profile: Profile::Vendor {
            company_name: company.to_string(),
            wallet_balance: balance,
        },
    }
}

fn rider(id: &str, name: &str, email: &str, phone: &str, vehicle_type: VehicleType) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        profile: Profile::Rider {
            phone: phone.to_string(),
            vehicle_type,
        },
    }
}

fn products() -> Vec<Product> {
    use ProductCategory::*;

    [
        ("p1", "Chicken Breast (kg)", Ingredients, 850, 50, 10, "chicken", 500),
        ("p2", "Beef Sirloin (kg)", Ingredients, 1200, 50, 12, "beef", 350),
        ("p3", "Pita Bread (100 pack)", Ingredients, 1500, 20, 5, "pita", 1000),
        ("p4", "Tomatoes (box)", Vegetables, 2000, 10, 8, "tomatoes", 80),
        ("p5", "Lettuce (box)", Vegetables, 1800, 10, 8, "lettuce", 120),
        ("p6", "Garlic Sauce (gallon)", Spices, 2500, 5, 10, "garlic", 200),
        ("p7", "Paprika (kg)", Spices, 1000, 10, 15, "paprika", 300),
        ("p8", "Wrapping Paper (1000 sheets)", Packaging, 3000, 10, 5, "paper", 400),
        ("p9", "Vertical Broiler", Equipment, 120000, 2, 10, "broiler", 15),
        ("p10", "Soft Drinks (24 pack)", Drinks, 1250, 20, 7, "soda", 600),
    ]
    .into_iter()
    .map(
        |(id, name, category, cents, bulk_qty, bulk_pct, image, stock)| Product {
            id: id.to_string(),
            name: name.to_string(),
            category,
            unit_price: Decimal::new(cents, 2),
            bulk_discount: BulkDiscount {
                quantity: bulk_qty,
                discount_percentage: Decimal::from(bulk_pct),
            },
            image_url: format!("https://picsum.photos/seed/{image}/400/300"),
            stock,
        },
    )
    .collect()
}

fn orders(products: &[Product]) -> Result<Vec<Order>> {
    let item = |product_id: &str,
                quantity: u32,
                delivery_frequency: DeliveryFrequency|
     -> Result<OrderItem> {
        let product = products
            .iter()
            .find(|product| product.id == product_id)
            .with_context(|| format!("seed product {product_id} missing"))?;
        Ok(OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            delivery_frequency,
        })
    };

    Ok(vec![
        Order {
            id: "o1".to_string(),
            vendor_id: "vendor1".to_string(),
            items: vec![
                item("p1", 20, DeliveryFrequency::Weekly)?,
                item("p3", 10, DeliveryFrequency::Weekly)?,
            ],
            total_amount: Decimal::new(32000, 2),
            status: OrderStatus::Delivered,
            order_date: day("2023-10-10")?,
            delivery_date: Some(day("2023-10-12")?),
        },
        Order {
            id: "o2".to_string(),
            vendor_id: "vendor1".to_string(),
            items: vec![item("p4", 5, DeliveryFrequency::OneTime)?],
            total_amount: Decimal::new(10000, 2),
            status: OrderStatus::Processing,
            order_date: day("2023-10-25")?,
            delivery_date: None,
        },
        Order {
            id: "o3".to_string(),
            vendor_id: "vendor2".to_string(),
            items: vec![
                item("p2", 30, DeliveryFrequency::BiWeekly)?,
                item("p6", 4, DeliveryFrequency::BiWeekly)?,
            ],
            total_amount: Decimal::new(46000, 2),
            status: OrderStatus::Pending,
            order_date: day("2023-10-28")?,
            delivery_date: None,
        },
        Order {
            id: "o4".to_string(),
            vendor_id: "vendor1".to_string(),
            items: vec![item("p8", 50, DeliveryFrequency::OneTime)?],
            total_amount: Decimal::new(15000, 2),
            status: OrderStatus::Pending,
            order_date: day("2023-10-29")?,
            delivery_date: None,
        },
    ])
}

fn transactions() -> Result<Vec<Transaction>> {
    [
        ("t1", "2023-10-20", "Wallet Top-up", 50000, TransactionKind::Credit),
        ("t2", "2023-10-10", "Order #o1 Payment", 32000, TransactionKind::Debit),
        ("t3", "2023-10-05", "Referral Bonus", 5000, TransactionKind::Credit),
        ("t4", "2023-09-28", "Order #o0 Payment", 45050, TransactionKind::Debit),
    ]
    .into_iter()
    .map(|(id, date, description, cents, kind)| -> Result<Transaction> {
        Ok(Transaction {
            id: id.to_string(),
            vendor_id: "vendor1".to_string(),
            date: day(date)?,
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            kind,
        })
    })
    .collect()
}

fn deliveries() -> Vec<Delivery> {
    [
        ("d1", "o2", Some("rider1"), "Ali's Shawarma Spot", DeliveryStatus::PickedUp),
        ("d2", "o3", None, "Fatima's Grill House", DeliveryStatus::Pending),
        ("d3", "o4", None, "Ali's Shawarma Spot", DeliveryStatus::Pending),
    ]
    .into_iter()
    .map(|(id, order_id, rider_id, destination, status)| Delivery {
        id: id.to_string(),
        order_id: order_id.to_string(),
        rider_id: rider_id.map(str::to_string),
        pickup_address: HQ_ADDRESS.to_string(),
        delivery_address: destination.to_string(),
        status,
    })
    .collect()
}

fn day(date: &str) -> Result<DateTime<Utc>> {
    format!("{date}T00:00:00Z")
        .parse()
        .with_context(|| format!("invalid seed date {date}"))
}
