// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test Fixtures

use contact_bridge_core::document::{DISPLAY_NAME, FAMILY_NAME, GIVEN_NAME, REMOTE_ID};
use contact_bridge_core::{
    ContactDraft, ContactRecord, InMemoryContactRepository, KnownProperty, SyncSession,
};

/// The single-contact document used by the end-to-end examples.
pub const ADA_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<LocalContacts>
  <Contact>
    <RemoteId>r1</RemoteId>
    <GivenName>Ada</GivenName>
    <FamilyName>Lovelace</FamilyName>
    <DisplayName>Ada Lovelace</DisplayName>
    <Email>ada@example.com</Email>
  </Contact>
</LocalContacts>"#;

/// Two contacts, one with an unknown field and a date.
pub const TWO_CONTACTS_XML: &str = r#"<LocalContacts>
  <Contact>
    <GivenName>Ada</GivenName>
    <FamilyName>Lovelace</FamilyName>
    <DisplayName>Ada Lovelace</DisplayName>
    <Birthdate>1815-12-10</Birthdate>
    <FavouriteEngine>Analytical</FavouriteEngine>
  </Contact>
  <Contact>
    <GivenName>Charles</GivenName>
    <FamilyName>Babbage</FamilyName>
    <DisplayName>Charles Babbage</DisplayName>
    <JobTitle>Mathematician</JobTitle>
  </Contact>
</LocalContacts>"#;

/// Record form of [`ADA_XML`].
pub fn ada_record() -> ContactRecord {
    ContactRecord::new()
        .with_field(REMOTE_ID, "r1")
        .with_field(GIVEN_NAME, "Ada")
        .with_field(FAMILY_NAME, "Lovelace")
        .with_field(DISPLAY_NAME, "Ada Lovelace")
        .with_field("Email", "ada@example.com")
}

/// A draft with a couple of properties set.
pub fn grace_draft(remote_id: &str) -> ContactDraft {
    ContactDraft::new(remote_id, "Grace", "Hopper", "Grace Hopper")
        .with_property(KnownProperty::Email, "grace@navy.mil")
        .with_property(KnownProperty::JobTitle, "Rear Admiral")
}

/// A session over an empty in-memory repository.
pub fn memory_session() -> SyncSession<InMemoryContactRepository> {
    SyncSession::new(InMemoryContactRepository::new())
}

/// Initializes test logging once; respects RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
