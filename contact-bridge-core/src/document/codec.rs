// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact record codec.
//!
//! Field order on encode: `RemoteId`, `GivenName`, `FamilyName`,
//! `DisplayName`, then every present property in property-set order.

use tracing::debug;

use super::{ContactRecord, DocumentError, DISPLAY_NAME, FAMILY_NAME, GIVEN_NAME, REMOTE_ID};
use crate::contact::{ContactDraft, ContactProperties, ContactSnapshot, KnownProperty, PropertyValue};

/// Encodes a contact snapshot as a document record.
///
/// A contact without a remote identity is written with an empty `RemoteId`.
pub fn encode(snapshot: &ContactSnapshot) -> ContactRecord {
    let mut record = ContactRecord::new();
    record.push(REMOTE_ID, snapshot.remote_id.as_deref().unwrap_or_default());
    record.push(GIVEN_NAME, &snapshot.given_name);
    record.push(FAMILY_NAME, &snapshot.family_name);
    record.push(DISPLAY_NAME, &snapshot.display_name);

    for (property, value) in snapshot.properties.iter() {
        record.push(property.name(), &value.to_string());
    }

    record
}

/// Decodes a document record into a creation request.
///
/// The draft's remote identity is `sequence_id` in decimal; the record's own
/// `RemoteId` is ignored. Unknown fields are dropped. Name fields are only
/// ever read as mandatory fields, never as optional properties.
pub fn decode(record: &ContactRecord, sequence_id: u64) -> Result<ContactDraft, DocumentError> {
    let given_name = required(record, GIVEN_NAME)?;
    let family_name = required(record, FAMILY_NAME)?;
    let display_name = required(record, DISPLAY_NAME)?;

    let mut properties = ContactProperties::new();
    for (name, raw) in record.fields() {
        let Some(property) = KnownProperty::from_name(name) else {
            if !is_core_field(name) {
                debug!("Dropping unknown field {}", name);
            }
            continue;
        };
        let value = PropertyValue::parse(property, raw).map_err(|e| {
            DocumentError::MalformedRecord(format!("{} value '{}': {}", property, raw, e))
        })?;
        properties.set(property, value);
    }

    Ok(ContactDraft {
        remote_id: sequence_id.to_string(),
        given_name: given_name.to_string(),
        family_name: family_name.to_string(),
        display_name: display_name.to_string(),
        properties,
    })
}

fn required<'a>(record: &'a ContactRecord, name: &str) -> Result<&'a str, DocumentError> {
    record
        .get(name)
        .ok_or_else(|| DocumentError::MalformedRecord(format!("missing {}", name)))
}

fn is_core_field(name: &str) -> bool {
    matches!(name, REMOTE_ID | GIVEN_NAME | FAMILY_NAME | DISPLAY_NAME)
}
