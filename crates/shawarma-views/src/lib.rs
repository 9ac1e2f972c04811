pub mod capabilities;
pub mod pages;
pub mod router;

pub use capabilities::{CapabilityTable, DASHBOARD, Renderer, RoleCapabilities, page};
pub use pages::{PageContext, PageView, PricedLine, VendorOrder};
pub use router::{Navigation, RenderedPage, RouterError, ViewRouter};
