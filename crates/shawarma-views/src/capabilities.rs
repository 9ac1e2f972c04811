use std::collections::HashMap;

use shawarma_core::Role;

use crate::pages::{self, PageContext, PageView};

pub const DASHBOARD: &str = "Dashboard";

pub type Renderer = fn(&PageContext<'_>) -> PageView;

/// Navigation entries for one role, in menu order, with the renderer behind each.
#[derive(Clone)]
pub struct RoleCapabilities {
    pages: Vec<(&'static str, Renderer)>,
}

impl RoleCapabilities {
    pub fn new(pages: Vec<(&'static str, Renderer)>) -> Self {
        Self { pages }
    }

    pub fn navigation(&self) -> Vec<&'static str> {
        self.pages.iter().map(|(name, _)| *name).collect()
    }

    pub fn renderer(&self, page: &str) -> Option<Renderer> {
        self.pages
            .iter()
            .find(|(name, _)| *name == page)
            .map(|(_, renderer)| *renderer)
    }
}

/// Role → capabilities. Adding a role or a page is a table entry.
#[derive(Clone, Default)]
pub struct CapabilityTable {
    roles: HashMap<Role, RoleCapabilities>,
}

impl CapabilityTable {
    pub fn standard() -> Self {
        Self::default()
            .with_role(
                Role::Vendor,
                RoleCapabilities::new(vec![
                    page(DASHBOARD, pages::vendor_dashboard),
                    page("Products", pages::product_catalog),
                    page("Orders", pages::order_history),
                    page("Wallet", pages::wallet),
                    page("Support", pages::support),
                ]),
            )
            .with_role(
                Role::Admin,
                RoleCapabilities::new(vec![
                    page(DASHBOARD, pages::admin_dashboard),
                    page("Analytics", pages::analytics),
                    page("Manage Orders", pages::manage_orders),
                    page("Manage Products", pages::manage_products),
                    page("Manage Vendors", pages::manage_vendors),
                ]),
            )
            .with_role(
                Role::Rider,
                RoleCapabilities::new(vec![
                    page(DASHBOARD, pages::rider_dashboard),
                    page("Deliveries", pages::rider_dashboard),
                    page("Earnings", pages::rider_dashboard),
                ]),
            )
    }

    pub fn with_role(mut self, role: Role, capabilities: RoleCapabilities) -> Self {
        self.roles.insert(role, capabilities);
        self
    }

    pub fn capabilities(&self, role: Role) -> Option<&RoleCapabilities> {
        self.roles.get(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.keys().copied()
    }
}

pub fn page(name: &'static str, renderer: Renderer) -> (&'static str, Renderer) {
    (name, renderer)
}
