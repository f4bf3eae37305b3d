//! User roles

use serde::{Deserialize, Serialize};

/// Dashboard a signed-in user is allowed into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Warehouse,
    Sales,
    Delivery,
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Warehouse => "warehouse",
            UserRole::Sales => "sales",
            UserRole::Delivery => "delivery",
            UserRole::Client => "client",
        }
    }

    /// Roles that see inventory alerts
    pub fn can_view_alerts(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Warehouse)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "warehouse" => Ok(UserRole::Warehouse),
            "sales" => Ok(UserRole::Sales),
            "delivery" => Ok(UserRole::Delivery),
            "client" => Ok(UserRole::Client),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
