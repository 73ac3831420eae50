//! Role-based navigation.
//!
//! Each role maps to a fixed set of dashboard sections through a lookup
//! table; adding a role means adding a row, not another branch.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavItem {
    Dashboard,
    Students,
    Payments,
    Invoices,
    Reports,
    Settings,
}

impl NavItem {
    pub fn label(self) -> &'static str {
        match self {
            NavItem::Dashboard => "Dashboard",
            NavItem::Students => "Students",
            NavItem::Payments => "Payments",
            NavItem::Invoices => "Invoices",
            NavItem::Reports => "Reports",
            NavItem::Settings => "Settings",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            NavItem::Dashboard => "/dashboard",
            NavItem::Students => "/students",
            NavItem::Payments => "/payments",
            NavItem::Invoices => "/invoices",
            NavItem::Reports => "/reports",
            NavItem::Settings => "/settings",
        }
    }
}

impl fmt::Display for NavItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const NAVIGATION: &[(Role, &[NavItem])] = &[
    (
        Role::Admin,
        &[
            NavItem::Dashboard,
            NavItem::Students,
            NavItem::Payments,
            NavItem::Invoices,
            NavItem::Reports,
            NavItem::Settings,
        ],
    ),
    (
        Role::Accountant,
        &[
            NavItem::Dashboard,
            NavItem::Students,
            NavItem::Payments,
            NavItem::Invoices,
            NavItem::Reports,
        ],
    ),
    (
        Role::Parent,
        &[NavItem::Dashboard, NavItem::Payments, NavItem::Invoices],
    ),
];

/// Sections visible to the role, in menu order.
pub fn nav_items(role: Role) -> &'static [NavItem] {
    NAVIGATION
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, items)| *items)
        .unwrap_or(&[])
}

pub fn can_access(role: Role, item: NavItem) -> bool {
    nav_items(role).contains(&item)
}
