// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use chrono::NaiveDate;
use contact_bridge_core::{ContactProperties, KnownProperty, PropertyKind, PropertyValue};
use proptest::prelude::*;

// ============================================================
// String Strategies
// ============================================================

/// Strategy for generating names (non-empty, no surrounding whitespace).
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z'\\-]{0,19}"
}

/// Strategy for generating raw remote identities (non-empty, arbitrary).
pub fn raw_identity_strategy() -> impl Strategy<Value = String> {
    ".{1,40}"
}

/// Strategy for generating property text, including XML special characters.
pub fn text_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 @.<>&\"'+\\-]{1,40}".prop_filter("no surrounding whitespace", |s| {
        s.trim() == s
    })
}

/// Strategy for generating calendar dates.
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

// ============================================================
// Property Strategies
// ============================================================

/// Strategy for generating one known property.
pub fn known_property_strategy() -> impl Strategy<Value = KnownProperty> {
    prop::sample::select(KnownProperty::ALL.to_vec())
}

/// Strategy for generating a value of the right kind for a property.
pub fn property_entry_strategy() -> impl Strategy<Value = (KnownProperty, PropertyValue)> {
    known_property_strategy().prop_flat_map(|property| match property.kind() {
        PropertyKind::Text => text_value_strategy()
            .prop_map(move |s| (property, PropertyValue::Text(s)))
            .boxed(),
        PropertyKind::Date => date_strategy()
            .prop_map(move |d| (property, PropertyValue::Date(d)))
            .boxed(),
    })
}

/// Strategy for generating a non-empty property set.
pub fn properties_strategy() -> impl Strategy<Value = ContactProperties> {
    prop::collection::vec(property_entry_strategy(), 1..12)
        .prop_map(|entries| entries.into_iter().collect())
}
