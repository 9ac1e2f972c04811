use rust_decimal::Decimal;
use serde::Serialize;
use shawarma_catalog::{SalesEstimate, bulk_unit_price, line_total, unit_price_for};
use shawarma_core::{
    Delivery, Order, OrderItem, OrderStatus, Product, ProductCategory, Role, Transaction, User,
};
use shawarma_engine::{MarketState, rider_weekly_earnings};
use shawarma_support::ChatThread;

const RECENT_TRANSACTIONS: usize = 5;
const TOP_SELLING: usize = 5;
const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// Everything a renderer may read. Renderers never mutate the marketplace.
pub struct PageContext<'a> {
    pub actor: &'a User,
    pub market: &'a MarketState,
    pub support: Option<&'a ChatThread>,
    pub category: Option<ProductCategory>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    VendorDashboard(VendorDashboard),
    ProductCatalog(ProductCatalog),
    OrderHistory(OrderHistory),
    Wallet(WalletView),
    Support(ChatThread),
    AdminDashboard(AdminDashboard),
    Analytics(Analytics),
    ManageOrders(ManageOrders),
    ComingSoon(ComingSoon),
    RiderDashboard(RiderDashboard),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VendorDashboard {
    pub welcome: String,
    pub total_orders: usize,
    pub pending_deliveries: usize,
    pub wallet_balance: Decimal,
    pub recent_transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub product: Product,
    pub bulk_unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductCatalog {
    pub category: Option<ProductCategory>,
    pub products: Vec<CatalogEntry>,
}

/// An order line priced at today's catalog rate for its quantity.
/// Prices are absent when the product has left the catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricedLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub unit_price: Option<Decimal>,
    pub line_total: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VendorOrder {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<PricedLine>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderHistory {
    pub orders: Vec<VendorOrder>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WalletView {
    pub balance: Decimal,
    pub net_flow: Decimal,
    pub top_up_available: bool,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdminDashboard {
    pub revenue: Decimal,
    pub active_vendors: usize,
    pub pending_orders: usize,
    pub products_listed: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyRevenue {
    pub week: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Analytics {
    pub top_selling: Vec<SalesEstimate>,
    pub weekly_revenue: Vec<WeeklyRevenue>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderRow {
    pub order: Order,
    pub lines: Vec<PricedLine>,
    pub vendor_company: String,
    pub delivery: Option<Delivery>,
    pub rider_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiderOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ManageOrders {
    pub orders: Vec<OrderRow>,
    pub riders: Vec<RiderOption>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComingSoon {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeliveryCard {
    #[serde(flatten)]
    pub delivery: Delivery,
    pub vendor_company: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiderDashboard {
    pub assigned: Vec<DeliveryCard>,
    pub available: Vec<DeliveryCard>,
    pub earnings_this_week: Decimal,
}

pub fn vendor_dashboard(ctx: &PageContext<'_>) -> PageView {
    let vendor_id = ctx.actor.id.as_str();
    let orders = ctx.market.orders_for_vendor(vendor_id);

    PageView::VendorDashboard(VendorDashboard {
        welcome: format!("Welcome, {}!", ctx.actor.first_name()),
        total_orders: orders.len(),
        pending_deliveries: orders
            .iter()
            .filter(|order| order.status == OrderStatus::Processing)
            .count(),
        wallet_balance: ctx.actor.wallet_balance().unwrap_or_default(),
        recent_transactions: ctx.market.ledger().recent(vendor_id, RECENT_TRANSACTIONS),
    })
}

pub fn product_catalog(ctx: &PageContext<'_>) -> PageView {
    let products = ctx
        .market
        .catalog()
        .by_category(ctx.category)
        .into_iter()
        .map(|product| CatalogEntry {
            bulk_unit_price: bulk_unit_price(product),
            product: product.clone(),
        })
        .collect();

    PageView::ProductCatalog(ProductCatalog {
        category: ctx.category,
        products,
    })
}

pub fn order_history(ctx: &PageContext<'_>) -> PageView {
    let market = ctx.market;
    PageView::OrderHistory(OrderHistory {
        orders: market
            .orders_for_vendor(&ctx.actor.id)
            .into_iter()
            .map(|order| VendorOrder {
                lines: priced_lines(market, order),
                order: order.clone(),
            })
            .collect(),
    })
}

pub fn wallet(ctx: &PageContext<'_>) -> PageView {
    PageView::Wallet(WalletView {
        balance: ctx.actor.wallet_balance().unwrap_or_default(),
        net_flow: ctx.market.ledger().net_flow(&ctx.actor.id),
        top_up_available: false,
        transactions: ctx.market.ledger().statement(&ctx.actor.id),
    })
}

pub fn support(ctx: &PageContext<'_>) -> PageView {
    PageView::Support(ctx.support.cloned().unwrap_or_default())
}

pub fn admin_dashboard(ctx: &PageContext<'_>) -> PageView {
    let market = ctx.market;

    PageView::AdminDashboard(AdminDashboard {
        revenue: market
            .orders_with_status(OrderStatus::Delivered)
            .iter()
            .map(|order| order.total_amount)
            .sum(),
        active_vendors: market.users_with_role(Role::Vendor).len(),
        pending_orders: market.orders_with_status(OrderStatus::Pending).len(),
        products_listed: market.catalog().len(),
    })
}

pub fn analytics(ctx: &PageContext<'_>) -> PageView {
    let weekly_revenue = [4000, 3000, 2000, 2780]
        .into_iter()
        .enumerate()
        .map(|(index, revenue)| WeeklyRevenue {
            week: format!("Week {}", index + 1),
            revenue: Decimal::from(revenue),
        })
        .collect();

    PageView::Analytics(Analytics {
        top_selling: ctx.market.catalog().top_selling(TOP_SELLING),
        weekly_revenue,
    })
}

pub fn manage_orders(ctx: &PageContext<'_>) -> PageView {
    let market = ctx.market;
    let orders = market
        .orders()
        .iter()
        .map(|order| {
            let delivery = market.delivery_for_order(&order.id).cloned();
            let rider_name = delivery
                .as_ref()
                .and_then(|delivery| delivery.rider_id.as_deref())
                .and_then(|rider_id| market.user(rider_id))
                .map(|rider| rider.name.clone());

            OrderRow {
                order: order.clone(),
                lines: priced_lines(market, order),
                vendor_company: vendor_company(market, &order.id),
                delivery,
                rider_name,
            }
        })
        .collect();

    let riders = market
        .users_with_role(Role::Rider)
        .into_iter()
        .map(|rider| RiderOption {
            id: rider.id.clone(),
            name: rider.name.clone(),
        })
        .collect();

    PageView::ManageOrders(ManageOrders { orders, riders })
}

pub fn manage_products(_ctx: &PageContext<'_>) -> PageView {
    coming_soon("Product Management")
}

pub fn manage_vendors(_ctx: &PageContext<'_>) -> PageView {
    coming_soon("Vendor Management")
}

fn coming_soon(title: &str) -> PageView {
    PageView::ComingSoon(ComingSoon {
        title: title.to_string(),
    })
}

pub fn rider_dashboard(ctx: &PageContext<'_>) -> PageView {
    let market = ctx.market;
    let card = |delivery: &Delivery| DeliveryCard {
        delivery: delivery.clone(),
        vendor_company: vendor_company(market, &delivery.order_id),
    };

    PageView::RiderDashboard(RiderDashboard {
        assigned: market
            .assigned_deliveries(&ctx.actor.id)
            .into_iter()
            .map(card)
            .collect(),
        available: market
            .available_deliveries()
            .into_iter()
            .map(card)
            .collect(),
        earnings_this_week: rider_weekly_earnings(),
    })
}

fn vendor_company(market: &MarketState, order_id: &str) -> String {
    market
        .vendor_company_for_order(order_id)
        .unwrap_or(UNKNOWN_VENDOR)
        .to_string()
}

fn priced_lines(market: &MarketState, order: &Order) -> Vec<PricedLine> {
    order
        .items
        .iter()
        .map(|item| {
            let product = market.catalog().get(&item.product_id);
            PricedLine {
                unit_price: product.map(|product| unit_price_for(product, item.quantity)),
                line_total: product.map(|product| line_total(product, item.quantity)),
                item: item.clone(),
            }
        })
        .collect()
}
