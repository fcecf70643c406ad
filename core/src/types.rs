//! Domain types for the contacts API.
//!
//! # Design
//! `PageResult` keeps items as raw JSON: the backend's record shape is not
//! known ahead of time, so canonicalisation into `Contact` happens in a
//! separate step (`normalize::normalize_contact`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of an empty field.
pub const PLACEHOLDER: &str = "—";

/// Canonical contact record. Missing fields are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Fields of a canonical `Contact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Id,
    Name,
    Email,
    Phone,
    Address,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::Id => "id",
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Address => "address",
        }
    }
}

impl Contact {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Id => &self.id,
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Address => &self.address,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Id => &mut self.id,
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Address => &mut self.address,
        }
    }

    /// Field value for display, with `PLACEHOLDER` for empty values.
    pub fn display(&self, field: ContactField) -> &str {
        match self.get(field) {
            "" => PLACEHOLDER,
            value => value,
        }
    }

    /// Stable key for a listing row: the id, else `email-index`.
    pub fn row_key(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("{}-{index}", self.email)
        } else {
            self.id.clone()
        }
    }
}

/// One page of contacts as reported (or implied) by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Contact-shaped JSON values, in server order.
    pub items: Vec<Value>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}
