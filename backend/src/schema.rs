//! Typed rows for the `public` schema.
//!
//! DESIGN
//! ======
//! These mirror the hosted database's generated table definitions. The
//! database owns integrity (foreign keys, row-level security); the client
//! only needs lossless serde so rows can be read and patched.
//!
//! Foreign keys, for reference:
//! - `affiliates.user_id` -> `profiles.id`
//! - `appointments.store_id` -> `stores.id`
//! - `appointments.professional_id` -> `professionals.id`
//! - `professionals.store_id` -> `stores.id`
//! - `stores.owner_id` -> `profiles.id`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row type backed by a named table.
pub trait Table: DeserializeOwned {
    const NAME: &'static str;
}

// =============================================================================
// ENUMS
// =============================================================================

/// `user_role` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Owner,
    Employee,
    Support,
    Affiliate,
}

impl Role {
    pub const ALL: [Self; 5] = [Self::Admin, Self::Owner, Self::Employee, Self::Support, Self::Affiliate];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::Employee => "employee",
            Self::Support => "support",
            Self::Affiliate => "affiliate",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// `commission_type` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    Fixed,
    Percentage,
}

/// `payment_type` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    OneTime,
    Recurring,
}

// =============================================================================
// PROFILES
// =============================================================================

/// One row per user extending the auth identity with role and contact data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Profile {
    const NAME: &'static str = "profiles";
}

/// Partial profile patch. Unset fields are left untouched by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none() && self.role.is_none()
    }
}

// =============================================================================
// STORES & STAFF
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub segment_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Store {
    const NAME: &'static str = "stores";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    pub store_id: String,
    pub full_name: String,
    pub document: String,
    pub login: String,
    /// Hash computed by the backend; never produced client-side.
    pub password_hash: String,
    pub is_active: Option<bool>,
    pub permissions: Option<Value>,
    pub profile_photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Professional {
    const NAME: &'static str = "professionals";
}

// =============================================================================
// BOOKINGS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub store_id: String,
    pub professional_id: Option<String>,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub service_name: String,
    /// `YYYY-MM-DD`.
    pub appointment_date: String,
    /// `HH:MM[:SS]`.
    pub appointment_time: String,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Appointment {
    const NAME: &'static str = "appointments";
}

// =============================================================================
// BILLING
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub days: i32,
    pub features: Option<Value>,
    pub is_hidden: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Plan {
    const NAME: &'static str = "plans";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affiliate {
    pub id: String,
    pub user_id: Option<String>,
    pub commission_type: CommissionType,
    pub commission_value: f64,
    pub payment_type: PaymentType,
    pub created_at: String,
    pub updated_at: String,
}

impl Table for Affiliate {
    const NAME: &'static str = "affiliates";
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
