// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Model
//!
//! Transient contact views handed across the bridge. The repository owns the
//! contacts; these are snapshots and creation requests only.

mod property;

pub use property::{ContactProperties, KnownProperty, PropertyKind, PropertyValue, DATE_FORMAT};

/// A point-in-time view of a local contact.
///
/// The remote identity is always untagged: it is the value the external side
/// knows the contact by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactSnapshot {
    /// Repository-assigned local id.
    pub id: String,
    /// Untagged remote identity, if the contact has one.
    pub remote_id: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub display_name: String,
    pub properties: ContactProperties,
}

/// A request to create a new local contact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactDraft {
    /// Raw (untagged) remote identity to assign.
    pub remote_id: String,
    pub given_name: String,
    pub family_name: String,
    pub display_name: String,
    pub properties: ContactProperties,
}

impl ContactDraft {
    /// Creates a draft with the three name fields and no properties.
    pub fn new(remote_id: &str, given_name: &str, family_name: &str, display_name: &str) -> Self {
        ContactDraft {
            remote_id: remote_id.to_string(),
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            display_name: display_name.to_string(),
            properties: ContactProperties::new(),
        }
    }

    /// Adds a property, builder style.
    pub fn with_property(mut self, property: KnownProperty, value: impl Into<PropertyValue>) -> Self {
        self.properties.set(property, value);
        self
    }
}
