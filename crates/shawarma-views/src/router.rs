use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use shawarma_core::Role;
use thiserror::Error;
use tracing::debug;

use crate::{
    capabilities::{CapabilityTable, DASHBOARD},
    pages::{PageContext, PageView},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("no navigation configured for role '{0}'")]
    RoleNotConfigured(Role),
    #[error("role '{0}' has no Dashboard page")]
    MissingDashboard(Role),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Navigation {
    pub role: Role,
    pub pages: Vec<String>,
    pub active: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedPage {
    pub role: Role,
    pub page: String,
    pub view: PageView,
}

/// Remembers an active page per role, so switching roles keeps each role's
/// place in its own menu.
#[derive(Clone)]
pub struct ViewRouter {
    table: Arc<CapabilityTable>,
    active: HashMap<Role, String>,
}

impl ViewRouter {
    pub fn new(table: Arc<CapabilityTable>) -> Self {
        let active = table
            .roles()
            .map(|role| (role, DASHBOARD.to_string()))
            .collect();
        Self { table, active }
    }

    pub fn select_page(&mut self, role: Role, page: &str) -> Result<(), RouterError> {
        if self.table.capabilities(role).is_none() {
            return Err(RouterError::RoleNotConfigured(role));
        }

        debug!(%role, page, "active page selected");
        self.active.insert(role, page.to_string());
        Ok(())
    }

    pub fn active_page(&self, role: Role) -> &str {
        self.active
            .get(&role)
            .map(String::as_str)
            .unwrap_or(DASHBOARD)
    }

    pub fn navigation(&self, role: Role) -> Result<Navigation, RouterError> {
        let capabilities = self
            .table
            .capabilities(role)
            .ok_or(RouterError::RoleNotConfigured(role))?;

        Ok(Navigation {
            role,
            pages: capabilities
                .navigation()
                .into_iter()
                .map(str::to_string)
                .collect(),
            active: self.active_page(role).to_string(),
        })
    }

    /// Renders the actor's active page; names without a renderer fall back to Dashboard.
    pub fn render(&self, ctx: &PageContext<'_>) -> Result<RenderedPage, RouterError> {
        let role = ctx.actor.role();
        let capabilities = self
            .table
            .capabilities(role)
            .ok_or(RouterError::RoleNotConfigured(role))?;

        let requested = self.active_page(role);
        let (page, renderer) = match capabilities.renderer(requested) {
            Some(renderer) => (requested, renderer),
            None => {
                debug!(%role, requested, "unknown page, falling back to dashboard");
                let renderer = capabilities
                    .renderer(DASHBOARD)
                    .ok_or(RouterError::MissingDashboard(role))?;
                (DASHBOARD, renderer)
            }
        };

        Ok(RenderedPage {
            role,
            page: page.to_string(),
            view: renderer(ctx),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shawarma_core::{ChatMessage, ProductCategory, Sender, User};
    use shawarma_engine::{MarketState, seed};
    use shawarma_support::ChatThread;

    use super::*;
    use crate::{
        capabilities::{RoleCapabilities, page},
        pages,
    };

    fn market() -> MarketState {
        seed::market_state().unwrap()
    }

    fn router() -> ViewRouter {
        ViewRouter::new(Arc::new(CapabilityTable::standard()))
    }

    fn actor(market: &MarketState, id: &str) -> User {
        market.user(id).unwrap().clone()
    }

    fn render(router: &ViewRouter, market: &MarketState, actor: &User) -> RenderedPage {
        router
            .render(&PageContext {
                actor,
                market,
                support: None,
                category: None,
            })
            .unwrap()
    }

    #[test]
    fn navigation_sets_are_role_keyed() {
        let router = router();

        assert_eq!(
            router.navigation(Role::Vendor).unwrap().pages,
            vec!["Dashboard", "Products", "Orders", "Wallet", "Support"]
        );
        assert_eq!(
            router.navigation(Role::Admin).unwrap().pages,
            vec![
                "Dashboard",
                "Analytics",
                "Manage Orders",
                "Manage Products",
                "Manage Vendors"
            ]
        );
        assert_eq!(
            router.navigation(Role::Rider).unwrap().pages,
            vec!["Dashboard", "Deliveries", "Earnings"]
        );
        for role in Role::ALL {
            assert_eq!(router.active_page(role), DASHBOARD);
        }
    }

    #[test]
    fn active_pages_survive_role_switches() {
        let mut router = router();

        router.select_page(Role::Vendor, "Wallet").unwrap();
        router.select_page(Role::Admin, "Analytics").unwrap();
        assert_eq!(router.navigation(Role::Admin).unwrap().active, "Analytics");
        assert_eq!(router.active_page(Role::Vendor), "Wallet");
        assert_eq!(router.active_page(Role::Rider), DASHBOARD);

        let market = market();
        let vendor = actor(&market, "vendor1");
        let page = render(&router, &market, &vendor);
        assert_eq!(page.page, "Wallet");
        assert!(matches!(page.view, PageView::Wallet(_)));
    }

    #[test]
    fn unknown_page_falls_back_to_dashboard() {
        let mut router = router();
        router.select_page(Role::Rider, "Payouts").unwrap();
        assert_eq!(router.active_page(Role::Rider), "Payouts");

        let market = market();
        let rider = actor(&market, "rider1");
        let page = render(&router, &market, &rider);
        assert_eq!(page.page, DASHBOARD);
        assert!(matches!(page.view, PageView::RiderDashboard(_)));
    }

    #[test]
    fn unconfigured_role_is_rejected() {
        let table = CapabilityTable::default().with_role(
            Role::Vendor,
            RoleCapabilities::new(vec![page(DASHBOARD, pages::vendor_dashboard)]),
        );
        let mut router = ViewRouter::new(Arc::new(table));

        assert_eq!(
            router.select_page(Role::Admin, "Analytics").unwrap_err(),
            RouterError::RoleNotConfigured(Role::Admin)
        );
        let market = market();
        let admin = actor(&market, "admin1");
        let err = router
            .render(&PageContext {
                actor: &admin,
                market: &market,
                support: None,
                category: None,
            })
            .unwrap_err();
        assert_eq!(err, RouterError::RoleNotConfigured(Role::Admin));
    }

    #[test]
    fn vendor_pages_only_show_own_records() {
        let market = market();
        let router = router();

        let PageView::VendorDashboard(dashboard) =
            render(&router, &market, &actor(&market, "vendor1")).view
        else {
            panic!("expected vendor dashboard");
        };
        assert_eq!(dashboard.welcome, "Welcome, Ali's!");
        assert_eq!(dashboard.total_orders, 3);
        assert_eq!(dashboard.pending_deliveries, 1);
        assert_eq!(dashboard.wallet_balance, Decimal::new(125075, 2));
        assert_eq!(dashboard.recent_transactions.len(), 4);

        let mut router = router;
        router.select_page(Role::Vendor, "Orders").unwrap();
        let PageView::OrderHistory(history) =
            render(&router, &market, &actor(&market, "vendor2")).view
        else {
            panic!("expected order history");
        };
        let ids: Vec<_> = history
            .orders
            .iter()
            .map(|entry| entry.order.id.as_str())
            .collect();
        assert_eq!(ids, vec!["o3"]);
        let totals: Vec<_> = history.orders[0]
            .lines
            .iter()
            .map(|line| line.line_total)
            .collect();
        assert_eq!(
            totals,
            vec![Some(Decimal::new(36000, 2)), Some(Decimal::new(10000, 2))]
        );

        router.select_page(Role::Vendor, "Wallet").unwrap();
        let PageView::Wallet(wallet) = render(&router, &market, &actor(&market, "vendor2")).view
        else {
            panic!("expected wallet");
        };
        assert!(wallet.transactions.is_empty());
        assert_eq!(wallet.net_flow, Decimal::ZERO);
        assert!(!wallet.top_up_available);

        let PageView::Wallet(wallet) = render(&router, &market, &actor(&market, "vendor1")).view
        else {
            panic!("expected wallet");
        };
        assert_eq!(wallet.net_flow, Decimal::new(-22050, 2));
    }

    #[test]
    fn catalog_honours_category_filter() {
        let market = market();
        let mut router = router();
        router.select_page(Role::Vendor, "Products").unwrap();
        let vendor = actor(&market, "vendor1");

        let page = router
            .render(&PageContext {
                actor: &vendor,
                market: &market,
                support: None,
                category: Some(ProductCategory::Spices),
            })
            .unwrap();
        let PageView::ProductCatalog(catalog) = page.view else {
            panic!("expected catalog");
        };
        let ids: Vec<_> = catalog
            .products
            .iter()
            .map(|entry| entry.product.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p6", "p7"]);
        assert_eq!(catalog.products[1].bulk_unit_price, Decimal::new(850, 2));
    }

    #[test]
    fn support_page_shows_workspace_thread() {
        let market = market();
        let mut router = router();
        router.select_page(Role::Vendor, "Support").unwrap();
        let vendor = actor(&market, "vendor1");
        let thread = ChatThread {
            messages: vec![ChatMessage {
                id: 1,
                text: "Hello! How can I help you today?".to_string(),
                sender: Sender::Support,
                timestamp: Utc::now(),
            }],
            awaiting_reply: true,
        };

        let page = router
            .render(&PageContext {
                actor: &vendor,
                market: &market,
                support: Some(&thread),
                category: None,
            })
            .unwrap();
        assert_eq!(page.view, PageView::Support(thread));
    }

    #[test]
    fn admin_sees_every_order() {
        let market = market();
        let mut router = router();
        let admin = actor(&market, "admin1");

        let PageView::AdminDashboard(dashboard) = render(&router, &market, &admin).view else {
            panic!("expected admin dashboard");
        };
        assert_eq!(dashboard.revenue, Decimal::new(32000, 2));
        assert_eq!(dashboard.active_vendors, 2);
        assert_eq!(dashboard.pending_orders, 2);
        assert_eq!(dashboard.products_listed, 10);

        router.select_page(Role::Admin, "Manage Orders").unwrap();
        let PageView::ManageOrders(manage) = render(&router, &market, &admin).view else {
            panic!("expected order management");
        };
        assert_eq!(manage.orders.len(), 4);
        assert_eq!(manage.orders[1].rider_name.as_deref(), Some("Karim Ahmed"));
        let bulk_line = &manage.orders[3].lines[0];
        assert_eq!(bulk_line.item.quantity, 50);
        assert_eq!(bulk_line.unit_price, Some(Decimal::new(2850, 2)));
        assert_eq!(bulk_line.line_total, Some(Decimal::new(142500, 2)));
        assert!(manage.orders[0].delivery.is_none());
        assert_eq!(manage.riders.len(), 2);

        router.select_page(Role::Admin, "Manage Vendors").unwrap();
        let page = render(&router, &market, &admin);
        assert!(matches!(page.view, PageView::ComingSoon(_)));
    }

    #[test]
    fn rider_sees_own_and_open_deliveries() {
        let market = market();
        let router = router();

        let PageView::RiderDashboard(dashboard) =
            render(&router, &market, &actor(&market, "rider1")).view
        else {
            panic!("expected rider dashboard");
        };
        assert_eq!(dashboard.assigned.len(), 1);
        assert_eq!(dashboard.assigned[0].vendor_company, "Ali's Shawarma Spot");
        let available: Vec<_> = dashboard
            .available
            .iter()
            .map(|card| card.delivery.id.as_str())
            .collect();
        assert_eq!(available, vec!["d2", "d3"]);
        assert_eq!(dashboard.earnings_this_week, Decimal::new(24550, 2));
    }

    #[test]
    fn rendered_page_is_tagged_json() {
        let market = market();
        let page = render(&router(), &market, &actor(&market, "rider2"));
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["role"], "rider");
        assert_eq!(value["view"]["page"], "rider_dashboard");
    }
}
