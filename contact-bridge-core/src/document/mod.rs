// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Document Module
//!
//! A contact document is an ordered list of contact records, each an ordered
//! list of `(field name, value)` pairs. [`codec`] maps records to and from
//! contacts; [`xml`] maps whole documents to and from their XML form.

pub mod codec;
pub mod xml;

pub use codec::{decode, encode};

use thiserror::Error;

/// Field carrying the remote identity. Written on export, ignored on import.
pub const REMOTE_ID: &str = "RemoteId";
pub const GIVEN_NAME: &str = "GivenName";
pub const FAMILY_NAME: &str = "FamilyName";
pub const DISPLAY_NAME: &str = "DisplayName";

/// Element wrapping each contact record.
pub const CONTACT_ELEMENT: &str = "Contact";

/// Root element written on export.
pub const DEFAULT_ROOT_ELEMENT: &str = "LocalContacts";

/// Document errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Input is not a well-formed document.
    #[error("Document parse error: {0}")]
    Parse(String),

    /// A record is missing a mandatory field or carries an unusable value.
    #[error("Malformed contact record: {0}")]
    MalformedRecord(String),

    /// The document could not be written.
    #[error("Document write error: {0}")]
    Write(String),
}

/// One contact's fields, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactRecord {
    fields: Vec<(String, String)>,
}

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    /// Appends a field, builder style.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the value of a field. When a field occurs more than once the
    /// last occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all fields in document order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns field names in document order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered collection of contact records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactDocument {
    records: Vec<ContactRecord>,
}

impl ContactDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ContactRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parses a document from its XML form.
    pub fn from_xml(input: &str) -> Result<Self, DocumentError> {
        xml::parse_document(input)
    }

    /// Serializes the document with the default root element.
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        xml::write_document(self, DEFAULT_ROOT_ELEMENT)
    }
}

impl FromIterator<ContactRecord> for ContactDocument {
    fn from_iter<I: IntoIterator<Item = ContactRecord>>(iter: I) -> Self {
        ContactDocument {
            records: iter.into_iter().collect(),
        }
    }
}
