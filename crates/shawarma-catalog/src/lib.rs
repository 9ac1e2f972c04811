use rust_decimal::Decimal;
use serde::Serialize;
use shawarma_core::{Product, ProductCategory};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalesEstimate {
    pub product_id: String,
    pub name: String,
    pub sold: Decimal,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    /// `None` means every category.
    pub fn by_category(&self, category: Option<ProductCategory>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| category.is_none_or(|wanted| product.category == wanted))
            .collect()
    }

    /// Rough sell-through figures for the first `limit` listed products.
    pub fn top_selling(&self, limit: usize) -> Vec<SalesEstimate> {
        self.products
            .iter()
            .take(limit)
            .map(|product| SalesEstimate {
                product_id: product.id.clone(),
                name: product.name.clone(),
                sold: Decimal::from(150) - Decimal::from(product.stock) / Decimal::from(5),
            })
            .collect()
    }
}

/// Unit price once the bulk threshold is met.
pub fn bulk_unit_price(product: &Product) -> Decimal {
    let discount =
        product.unit_price * product.bulk_discount.discount_percentage / Decimal::ONE_HUNDRED;
    (product.unit_price - discount).round_dp(2)
}

pub fn unit_price_for(product: &Product, quantity: u32) -> Decimal {
    if quantity >= product.bulk_discount.quantity {
        bulk_unit_price(product)
    } else {
        product.unit_price
    }
}

pub fn line_total(product: &Product, quantity: u32) -> Decimal {
    (unit_price_for(product, quantity) * Decimal::from(quantity)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use shawarma_core::BulkDiscount;

    use super::*;

    fn product(id: &str, category: ProductCategory, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category,
            unit_price: Decimal::new(850, 2),
            bulk_discount: BulkDiscount {
                quantity: 50,
                discount_percentage: Decimal::from(10),
            },
            image_url: String::new(),
            stock,
        }
    }

    #[test]
    fn discount_applies_from_threshold_onwards() {
        let chicken = product("p1", ProductCategory::Ingredients, 500);
        assert_eq!(unit_price_for(&chicken, 49), Decimal::new(850, 2));
        assert_eq!(unit_price_for(&chicken, 50), Decimal::new(765, 2));
        assert_eq!(line_total(&chicken, 50), Decimal::new(38250, 2));
    }

    #[test]
    fn category_filter_keeps_listing_order() {
        let catalog = Catalog::new(vec![
            product("p1", ProductCategory::Ingredients, 500),
            product("p4", ProductCategory::Vegetables, 80),
            product("p3", ProductCategory::Ingredients, 1000),
        ]);

        let ids: Vec<_> = catalog
            .by_category(Some(ProductCategory::Ingredients))
            .into_iter()
            .map(|product| product.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(catalog.by_category(None).len(), 3);
        assert!(catalog.by_category(Some(ProductCategory::Drinks)).is_empty());
    }

    #[test]
    fn top_selling_derives_from_stock() {
        let catalog = Catalog::new(vec![
            product("p1", ProductCategory::Ingredients, 500),
            product("p4", ProductCategory::Vegetables, 80),
        ]);

        let top = catalog.top_selling(5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].sold, Decimal::from(50));
        assert_eq!(top[1].sold, Decimal::from(134));
    }
}
