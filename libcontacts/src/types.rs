//! Core types for the contact manager

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A persisted person record
///
/// `id` is `None` until the store assigns one on first upsert, and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl Contact {
    /// Build a contact that has not been stored yet
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Copy of this contact carrying a store-assigned id
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// "First Last", as shown in the contact list
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Field the contact list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    FirstName,
    LastName,
    PhoneNumber,
}

impl SortOrder {
    /// All orders, in the order they are offered to the user
    pub const ALL: [SortOrder; 3] = [
        SortOrder::FirstName,
        SortOrder::LastName,
        SortOrder::PhoneNumber,
    ];

    /// Column of the `Contact` table this order sorts by
    pub fn column(&self) -> &'static str {
        match self {
            SortOrder::FirstName => "firstName",
            SortOrder::LastName => "lastName",
            SortOrder::PhoneNumber => "phoneNumber",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::FirstName => "First name",
            SortOrder::LastName => "Last name",
            SortOrder::PhoneNumber => "Phone number",
        }
    }

    /// The order after this one, wrapping around
    pub fn next(&self) -> SortOrder {
        match self {
            SortOrder::FirstName => SortOrder::LastName,
            SortOrder::LastName => SortOrder::PhoneNumber,
            SortOrder::PhoneNumber => SortOrder::FirstName,
        }
    }

    /// Sort key of a contact under this order
    pub fn key<'a>(&self, contact: &'a Contact) -> &'a str {
        match self {
            SortOrder::FirstName => &contact.first_name,
            SortOrder::LastName => &contact.last_name,
            SortOrder::PhoneNumber => &contact.phone_number,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-name" | "firstname" | "first" => Ok(SortOrder::FirstName),
            "last-name" | "lastname" | "last" => Ok(SortOrder::LastName),
            "phone-number" | "phonenumber" | "phone" => Ok(SortOrder::PhoneNumber),
            _ => Err(format!(
                "Invalid sort order: '{}'. Valid options: first-name, last-name, phone-number",
                s
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::FirstName => write!(f, "first-name"),
            SortOrder::LastName => write!(f, "last-name"),
            SortOrder::PhoneNumber => write!(f, "phone-number"),
        }
    }
}
