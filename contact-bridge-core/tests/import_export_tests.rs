// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for sync::session (import and export flows)

mod common;

use std::io;

use async_trait::async_trait;
use common::fixtures::{grace_draft, init_tracing, memory_session, ADA_XML, TWO_CONTACTS_XML};
use contact_bridge_core::sync::CHECKPOINT_KEY;
use contact_bridge_core::{
    BridgeError, ContactDocument, ContactRepository, DocumentSink, FileDocument,
    InMemoryContactRepository, KnownProperty, PropertyValue, SyncConfig, SyncPhase, SyncSession,
};
use tempfile::TempDir;

/// A sink that refuses every write.
struct BrokenSink;

#[async_trait]
impl DocumentSink for BrokenSink {
    async fn write_document(&self, _contents: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}

// === Import ===

#[tokio::test]
async fn test_import_end_to_end_example() {
    init_tracing();
    let mut session = memory_session();

    let outcome = session.import(ADA_XML).await.unwrap();
    assert_eq!(outcome.purged, 0);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.remote_ids, vec!["3735928560".to_string()]);
    assert_eq!(session.phase(), &SyncPhase::Done);

    let contacts = session.repository().contacts();
    assert_eq!(contacts.len(), 1);
    let ada = &contacts[0];
    assert_eq!(ada.given_name, "Ada");
    assert_eq!(ada.family_name, "Lovelace");
    assert_eq!(ada.display_name, "Ada Lovelace");
    assert_eq!(
        ada.properties.get(KnownProperty::Email),
        Some(&PropertyValue::Text("ada@example.com".to_string()))
    );

    let instance_id = session.instance_id().await.unwrap();
    assert_eq!(
        ada.remote_id.as_deref(),
        Some(format!("{}_3735928560", instance_id).as_str())
    );
}

#[tokio::test]
async fn test_import_assigns_consecutive_sequence_ids() {
    let mut session = memory_session();
    let outcome = session.import(TWO_CONTACTS_XML).await.unwrap();

    assert_eq!(outcome.remote_ids, vec!["3735928560", "3735928561"]);
    let contacts = session.repository().contacts();
    assert_eq!(contacts[0].given_name, "Ada");
    assert_eq!(contacts[1].given_name, "Charles");
}

#[tokio::test]
async fn test_import_drops_unknown_fields() {
    let mut session = memory_session();
    session.import(TWO_CONTACTS_XML).await.unwrap();

    let ada = &session.repository().contacts()[0];
    assert_eq!(ada.properties.len(), 1);
    assert!(ada.properties.contains(KnownProperty::Birthdate));
}

#[tokio::test]
async fn test_import_custom_sequence_seed() {
    let config = SyncConfig::default().with_sequence_seed(100);
    let mut session = SyncSession::with_config(InMemoryContactRepository::new(), config);

    let outcome = session.import(TWO_CONTACTS_XML).await.unwrap();
    assert_eq!(outcome.remote_ids, vec!["101", "102"]);
}

#[tokio::test]
async fn test_import_sequence_seed_overflow() {
    let config = SyncConfig::default().with_sequence_seed(u64::MAX);
    let mut session = SyncSession::with_config(InMemoryContactRepository::new(), config);

    let result = session.import(ADA_XML).await;
    assert!(matches!(result, Err(BridgeError::Configuration(_))));
    assert_eq!(session.repository().contact_count(), 0);
}

#[tokio::test]
async fn test_import_sequence_seed_at_limit() {
    let config = SyncConfig::default().with_sequence_seed(u64::MAX - 1);
    let mut session = SyncSession::with_config(InMemoryContactRepository::new(), config);

    let outcome = session.import(ADA_XML).await.unwrap();
    assert_eq!(outcome.remote_ids, vec![u64::MAX.to_string()]);
}

#[tokio::test]
async fn test_import_empty_document() {
    let mut session = memory_session();
    let outcome = session.import("<LocalContacts/>").await.unwrap();

    assert!(outcome.created.is_empty());
    assert_eq!(session.repository().contact_count(), 0);
}

#[tokio::test]
async fn test_import_missing_given_name_leaves_no_contacts() {
    let mut session = memory_session();
    let input = "<LocalContacts><Contact>\
        <FamilyName>Lovelace</FamilyName><DisplayName>Ada Lovelace</DisplayName>\
        </Contact></LocalContacts>";

    let result = session.import(input).await;
    assert!(matches!(result, Err(BridgeError::MalformedRecord(_))));
    assert_eq!(session.repository().contact_count(), 0);
    assert!(matches!(session.phase(), SyncPhase::Failed { .. }));
}

#[tokio::test]
async fn test_import_malformed_record_keeps_existing_contacts() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let input = "<LocalContacts>\
        <Contact><GivenName>Ada</GivenName><FamilyName>L</FamilyName><DisplayName>Ada</DisplayName></Contact>\
        <Contact><GivenName>Bad</GivenName><FamilyName>Date</FamilyName><DisplayName>Bad</DisplayName>\
        <Birthdate>yesterday</Birthdate></Contact>\
        </LocalContacts>";
    assert!(matches!(
        session.import(input).await,
        Err(BridgeError::MalformedRecord(_))
    ));

    let contacts = session.repository().contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].given_name, "Grace");
}

#[tokio::test]
async fn test_import_parse_error() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let result = session.import("<LocalContacts><Contact>").await;
    assert!(matches!(result, Err(BridgeError::DocumentParse(_))));
    assert_eq!(session.repository().contact_count(), 1);
}

#[tokio::test]
async fn test_import_twice_is_deterministic() {
    let mut session = memory_session();
    session.import(TWO_CONTACTS_XML).await.unwrap();
    let second = session.import(TWO_CONTACTS_XML).await.unwrap();

    assert_eq!(second.purged, 2);
    let contacts = session.repository().contacts();
    assert_eq!(contacts.len(), 2);
    let names: Vec<&str> = contacts.iter().map(|c| c.given_name.as_str()).collect();
    assert_eq!(names, ["Ada", "Charles"]);
    // Sequence ids restart with every import.
    assert_eq!(second.remote_ids, vec!["3735928560", "3735928561"]);
}

#[tokio::test]
async fn test_import_purge_respects_checkpoint() {
    let mut session = memory_session();
    session.add_contact(grace_draft("old")).await.unwrap();
    let revision = session.repository().current_revision().await.unwrap();
    session.commit_checkpoint(revision).await.unwrap();
    session.add_contact(grace_draft("new")).await.unwrap();

    let outcome = session.import(ADA_XML).await.unwrap();
    assert_eq!(outcome.purged, 1);

    let contacts = session.repository().contacts();
    assert_eq!(contacts.len(), 2);
    let instance_id = session.instance_id().await.unwrap();
    assert_eq!(contacts[0].remote_id, Some(format!("{}_old", instance_id)));
    assert_eq!(contacts[1].given_name, "Ada");
}

#[tokio::test]
async fn test_import_does_not_advance_checkpoint() {
    let mut session = memory_session();
    let outcome = session.import(ADA_XML).await.unwrap();

    assert_eq!(session.load_checkpoint().await.unwrap(), 0);
    assert_eq!(
        outcome.revision,
        session.repository().current_revision().await.unwrap()
    );
}

#[tokio::test]
async fn test_import_save_failure_stops_import() {
    let mut session = memory_session();
    session.repository().fail_saves_after(1);

    let result = session.import(TWO_CONTACTS_XML).await;
    assert!(matches!(result, Err(BridgeError::Repository(_))));
    // The first contact was already written.
    assert_eq!(session.repository().contact_count(), 1);
    assert!(matches!(session.phase(), SyncPhase::Failed { .. }));
}

#[tokio::test]
async fn test_import_delete_failure_aborts_before_writes() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();
    session.repository().set_fail_deletes(true);

    let result = session.import(ADA_XML).await;
    assert!(matches!(result, Err(BridgeError::Repository(_))));
    let contacts = session.repository().contacts();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].given_name, "Grace");
}

#[tokio::test]
async fn test_import_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("contacts.xml");
    std::fs::write(&path, ADA_XML).unwrap();

    let mut session = memory_session();
    let outcome = session.import_from(&FileDocument::new(&path)).await.unwrap();
    assert_eq!(outcome.created.len(), 1);
}

#[tokio::test]
async fn test_import_from_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = memory_session();

    let source = FileDocument::new(temp_dir.path().join("missing.xml"));
    assert!(matches!(
        session.import_from(&source).await,
        Err(BridgeError::Io(_))
    ));
}

// === Export ===

#[tokio::test]
async fn test_export_empty_repository() {
    let mut session = memory_session();
    let outcome = session.export().await.unwrap();

    assert!(outcome.document.is_empty());
    assert_eq!(outcome.checkpoint, 0);
    assert_eq!(outcome.highest_revision, 0);
    assert!(ContactDocument::from_xml(&outcome.xml).unwrap().is_empty());
}

#[tokio::test]
async fn test_export_round_trip_of_import() {
    let mut session = memory_session();
    session.import(ADA_XML).await.unwrap();

    let outcome = session.export().await.unwrap();
    assert_eq!(outcome.document.len(), 1);
    let record = &outcome.document.records()[0];
    assert_eq!(record.get("RemoteId"), Some("3735928560"));
    assert_eq!(record.get("GivenName"), Some("Ada"));
    assert_eq!(record.get("FamilyName"), Some("Lovelace"));
    assert_eq!(record.get("DisplayName"), Some("Ada Lovelace"));
    assert_eq!(record.get("Email"), Some("ada@example.com"));

    assert_eq!(ContactDocument::from_xml(&outcome.xml).unwrap(), outcome.document);
}

#[tokio::test]
async fn test_export_does_not_persist_checkpoint() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let first = session.export().await.unwrap();
    assert_eq!(first.highest_revision, 1);
    assert_eq!(session.load_checkpoint().await.unwrap(), 0);

    let again = session.export().await.unwrap();
    assert_eq!(again.document, first.document);
}

#[tokio::test]
async fn test_export_since_checkpoint() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();
    session.add_contact(grace_draft("g2")).await.unwrap();

    let outcome = session.export_since(1).await.unwrap();
    assert_eq!(outcome.document.len(), 1);
    assert_eq!(outcome.document.records()[0].get("RemoteId"), Some("g2"));
    assert_eq!(outcome.highest_revision, 2);
}

#[tokio::test]
async fn test_export_since_past_head_reports_head() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let outcome = session.export_since(100).await.unwrap();
    assert!(outcome.document.is_empty());
    assert_eq!(outcome.checkpoint, 100);
    assert_eq!(outcome.highest_revision, 1);
}

#[tokio::test]
async fn test_export_since_past_head_keeps_later_changes() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let outcome = session.export_since(100).await.unwrap();
    session.commit_checkpoint(outcome.highest_revision).await.unwrap();
    session.add_contact(grace_draft("g2")).await.unwrap();

    let next = session.export().await.unwrap();
    assert_eq!(next.document.len(), 1);
    assert_eq!(next.document.records()[0].get("RemoteId"), Some("g2"));
}

#[tokio::test]
async fn test_export_skips_deleted_contacts() {
    let mut session = memory_session();
    let id = session.add_contact(grace_draft("g1")).await.unwrap();
    session.add_contact(grace_draft("g2")).await.unwrap();
    session.repository().delete_contact(&id).await.unwrap();

    let outcome = session.export().await.unwrap();
    assert_eq!(outcome.document.len(), 1);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.highest_revision, 3);
}

#[tokio::test]
async fn test_export_contact_once_per_change() {
    let mut session = memory_session();
    let id = session.add_contact(grace_draft("g1")).await.unwrap();
    let mut stored = session
        .repository()
        .find_contact_by_id(&id)
        .await
        .unwrap()
        .unwrap();
    stored.given_name = "Rear Admiral Grace".to_string();
    session.repository().save_contact(&stored).await.unwrap();

    let outcome = session.export().await.unwrap();
    assert_eq!(outcome.document.len(), 2);
    assert!(outcome
        .document
        .records()
        .iter()
        .all(|r| r.get("GivenName") == Some("Rear Admiral Grace")));
}

#[tokio::test]
async fn test_export_uses_configured_root() {
    let config = SyncConfig::default().with_root_element("AddressBook");
    let mut session = SyncSession::with_config(InMemoryContactRepository::new(), config);

    let outcome = session.export().await.unwrap();
    assert!(outcome.xml.contains("<AddressBook>"));
}

#[tokio::test]
async fn test_export_foreign_identity_fails() {
    let mut session = memory_session();
    session
        .repository()
        .save_contact(&contact_bridge_core::StoredContact {
            remote_id: Some("other-app:99".to_string()),
            given_name: "X".to_string(),
            family_name: "Y".to_string(),
            display_name: "X Y".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(matches!(
        session.export().await,
        Err(BridgeError::IdentityFormat(_))
    ));
    assert!(matches!(session.phase(), SyncPhase::Failed { .. }));
}

#[tokio::test]
async fn test_export_to_commits_checkpoint() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.xml");
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let outcome = session.export_to(&FileDocument::new(&path)).await.unwrap();
    assert_eq!(session.load_checkpoint().await.unwrap(), outcome.highest_revision);

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, outcome.xml);

    // Nothing new since the committed checkpoint.
    let next = session.export().await.unwrap();
    assert!(next.document.is_empty());
}

#[tokio::test]
async fn test_export_to_failed_write_keeps_checkpoint() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    let result = session.export_to(&BrokenSink).await;
    assert!(matches!(result, Err(BridgeError::Io(_))));
    assert_eq!(session.load_checkpoint().await.unwrap(), 0);
    assert!(matches!(session.phase(), SyncPhase::Failed { .. }));
}

#[tokio::test]
async fn test_export_to_failed_commit_marks_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.xml");
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();
    session.repository().set_fail_property_writes(true);

    let result = session.export_to(&FileDocument::new(&path)).await;
    assert!(matches!(result, Err(BridgeError::Repository(_))));
    assert!(matches!(session.phase(), SyncPhase::Failed { .. }));
    assert!(path.exists());

    session.repository().set_fail_property_writes(false);
    assert_eq!(session.load_checkpoint().await.unwrap(), 0);
}

// === Checkpoint ===

#[tokio::test]
async fn test_commit_checkpoint_is_monotonic() {
    let mut session = memory_session();
    for remote_id in ["g1", "g2", "g3", "g4", "g5"] {
        session.add_contact(grace_draft(remote_id)).await.unwrap();
    }

    session.commit_checkpoint(5).await.unwrap();
    session.commit_checkpoint(3).await.unwrap();
    assert_eq!(session.load_checkpoint().await.unwrap(), 5);

    session.reset_checkpoint().await.unwrap();
    assert_eq!(session.load_checkpoint().await.unwrap(), 0);
}

#[tokio::test]
async fn test_commit_checkpoint_capped_at_head() {
    let mut session = memory_session();
    session.add_contact(grace_draft("g1")).await.unwrap();

    session.commit_checkpoint(100).await.unwrap();
    assert_eq!(session.load_checkpoint().await.unwrap(), 1);

    session.add_contact(grace_draft("g2")).await.unwrap();
    let outcome = session.export().await.unwrap();
    assert_eq!(outcome.document.len(), 1);
    assert_eq!(outcome.document.records()[0].get("RemoteId"), Some("g2"));
}

#[tokio::test]
async fn test_invalid_stored_checkpoint() {
    let session = memory_session();
    session
        .repository()
        .save_extended_property(CHECKPOINT_KEY, "not-a-number")
        .await
        .unwrap();

    assert!(matches!(
        session.load_checkpoint().await,
        Err(BridgeError::Repository(_))
    ));
}
