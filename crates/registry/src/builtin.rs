//! The dashboard's compiled-in sidebar menu.

use opsdash_types::NavigationNode;

use crate::NavigationTree;

/// Capability names referenced by the built-in menu.
pub mod capabilities {
    pub const INVENTORY: &str = "inventory";
    pub const REPORTS: &str = "reports";
    pub const LOGISTICS: &str = "logistics";
    pub const ADMIN: &str = "admin";
}

impl NavigationTree {
    /// The default operator dashboard menu.
    pub fn builtin() -> Self {
        use capabilities::{ADMIN, INVENTORY, LOGISTICS, REPORTS};

        Self::new(vec![
            NavigationNode::leaf("Dashboard", "/").with_icon("dashboard"),
            NavigationNode::group(
                "Items",
                vec![
                    NavigationNode::leaf("Amazon", "/items/amazon").requires(INVENTORY),
                    NavigationNode::leaf("Walmart", "/items/walmart").requires(INVENTORY),
                    NavigationNode::leaf("Warehouse", "/items/warehouse").requires(INVENTORY),
                ],
            )
            .with_path("/items")
            .requires(INVENTORY)
            .with_icon("inventory"),
            NavigationNode::group(
                "Reports",
                vec![
                    NavigationNode::group(
                        "Amazon Reports",
                        vec![
                            NavigationNode::leaf("Amazon", "/reports/amazon").requires(REPORTS),
                            NavigationNode::leaf("Settlements", "/reports/amazon/settlements").requires(REPORTS),
                        ],
                    )
                    .requires(REPORTS),
                    NavigationNode::group(
                        "Sales Reports",
                        vec![
                            NavigationNode::leaf("Daily Sales", "/reports/sales/daily").requires(REPORTS),
                            NavigationNode::leaf("Monthly Sales", "/reports/sales/monthly").requires(REPORTS),
                        ],
                    )
                    .requires(REPORTS),
                ],
            )
            .requires(REPORTS)
            .with_icon("bar_chart"),
            NavigationNode::group(
                "Logistics",
                vec![
                    NavigationNode::leaf("Shipments", "/logistics/shipments").requires(LOGISTICS),
                    NavigationNode::leaf("Inbound", "/logistics/inbound").requires(LOGISTICS),
                    NavigationNode::leaf("Returns", "/logistics/returns").requires(LOGISTICS),
                ],
            )
            .requires(LOGISTICS)
            .with_icon("local_shipping"),
            NavigationNode::group(
                "Users & Permissions",
                vec![
                    NavigationNode::leaf("Users", "/admin/users").requires(ADMIN),
                    NavigationNode::leaf("Permissions", "/admin/permissions").requires(ADMIN),
                ],
            )
            .requires(ADMIN)
            .with_icon("admin_panel_settings"),
            NavigationNode::group(
                "Settings",
                vec![
                    NavigationNode::leaf("Profile", "/settings/profile"),
                    NavigationNode::leaf("Integrations", "/settings/integrations").requires(ADMIN),
                ],
            )
            .with_icon("settings"),
        ])
    }
}
