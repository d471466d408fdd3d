// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Known Contact Properties
//!
//! The closed set of optional contact properties understood by the bridge,
//! and their typed values.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Canonical date format used on the wire (ISO-8601 calendar date).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An optional contact property.
///
/// The mandatory name fields (`GivenName`, `FamilyName`, `DisplayName`) and
/// the remote identity are part of the contact's core identity and are
/// not members of this set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KnownProperty {
    AdditionalName,
    Address,
    AlternateMobileTelephone,
    Anniversary,
    Birthdate,
    Children,
    CompanyName,
    CompanyTelephone,
    Email,
    HomeFax,
    HonorificPrefix,
    HonorificSuffix,
    JobTitle,
    Manager,
    MobileTelephone,
    Nickname,
    Notes,
    OfficeLocation,
    OtherAddress,
    OtherEmail,
    SignificantOther,
    Telephone,
    Url,
    WorkAddress,
    WorkEmail,
    WorkFax,
    WorkTelephone,
    YomiCompanyName,
    YomiFamilyName,
    YomiGivenName,
}

/// Value shape of a known property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Text,
    Date,
}

impl KnownProperty {
    /// Every known property, in declaration order.
    pub const ALL: [KnownProperty; 30] = [
        KnownProperty::AdditionalName,
        KnownProperty::Address,
        KnownProperty::AlternateMobileTelephone,
        KnownProperty::Anniversary,
        KnownProperty::Birthdate,
        KnownProperty::Children,
        KnownProperty::CompanyName,
        KnownProperty::CompanyTelephone,
        KnownProperty::Email,
        KnownProperty::HomeFax,
        KnownProperty::HonorificPrefix,
        KnownProperty::HonorificSuffix,
        KnownProperty::JobTitle,
        KnownProperty::Manager,
        KnownProperty::MobileTelephone,
        KnownProperty::Nickname,
        KnownProperty::Notes,
        KnownProperty::OfficeLocation,
        KnownProperty::OtherAddress,
        KnownProperty::OtherEmail,
        KnownProperty::SignificantOther,
        KnownProperty::Telephone,
        KnownProperty::Url,
        KnownProperty::WorkAddress,
        KnownProperty::WorkEmail,
        KnownProperty::WorkFax,
        KnownProperty::WorkTelephone,
        KnownProperty::YomiCompanyName,
        KnownProperty::YomiFamilyName,
        KnownProperty::YomiGivenName,
    ];

    /// Returns the field name used in documents.
    pub fn name(self) -> &'static str {
        match self {
            KnownProperty::AdditionalName => "AdditionalName",
            KnownProperty::Address => "Address",
            KnownProperty::AlternateMobileTelephone => "AlternateMobileTelephone",
            KnownProperty::Anniversary => "Anniversary",
            KnownProperty::Birthdate => "Birthdate",
            KnownProperty::Children => "Children",
            KnownProperty::CompanyName => "CompanyName",
            KnownProperty::CompanyTelephone => "CompanyTelephone",
            KnownProperty::Email => "Email",
            KnownProperty::HomeFax => "HomeFax",
            KnownProperty::HonorificPrefix => "HonorificPrefix",
            KnownProperty::HonorificSuffix => "HonorificSuffix",
            KnownProperty::JobTitle => "JobTitle",
            KnownProperty::Manager => "Manager",
            KnownProperty::MobileTelephone => "MobileTelephone",
            KnownProperty::Nickname => "Nickname",
            KnownProperty::Notes => "Notes",
            KnownProperty::OfficeLocation => "OfficeLocation",
            KnownProperty::OtherAddress => "OtherAddress",
            KnownProperty::OtherEmail => "OtherEmail",
            KnownProperty::SignificantOther => "SignificantOther",
            KnownProperty::Telephone => "Telephone",
            KnownProperty::Url => "Url",
            KnownProperty::WorkAddress => "WorkAddress",
            KnownProperty::WorkEmail => "WorkEmail",
            KnownProperty::WorkFax => "WorkFax",
            KnownProperty::WorkTelephone => "WorkTelephone",
            KnownProperty::YomiCompanyName => "YomiCompanyName",
            KnownProperty::YomiFamilyName => "YomiFamilyName",
            KnownProperty::YomiGivenName => "YomiGivenName",
        }
    }

    /// Looks up a property by its document field name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Returns the value shape this property carries.
    pub fn kind(self) -> PropertyKind {
        match self {
            KnownProperty::Anniversary | KnownProperty::Birthdate => PropertyKind::Date,
            _ => PropertyKind::Text,
        }
    }
}

impl fmt::Display for KnownProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar property value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    Date(NaiveDate),
}

impl PropertyValue {
    /// Parses a wire value for the given property.
    ///
    /// Text is taken verbatim. Dates accept `YYYY-MM-DD` or an RFC 3339
    /// timestamp, in which case only the date part is kept.
    pub fn parse(property: KnownProperty, raw: &str) -> Result<Self, chrono::ParseError> {
        match property.kind() {
            PropertyKind::Text => Ok(PropertyValue::Text(raw.to_string())),
            PropertyKind::Date => {
                let raw = raw.trim();
                match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                    Ok(date) => Ok(PropertyValue::Date(date)),
                    Err(_) => DateTime::parse_from_rfc3339(raw)
                        .map(|dt| PropertyValue::Date(dt.date_naive())),
                }
            }
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Date(_) => None,
        }
    }

    /// Returns the date, if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PropertyValue::Date(d) => Some(*d),
            PropertyValue::Text(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(d: NaiveDate) -> Self {
        PropertyValue::Date(d)
    }
}

/// The optional properties present on a contact.
///
/// Absent properties are simply not in the set; there is no null value.
/// Iteration follows [`KnownProperty`] declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactProperties {
    values: BTreeMap<KnownProperty, PropertyValue>,
}

impl ContactProperties {
    /// Creates an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a property, if present.
    pub fn get(&self, property: KnownProperty) -> Option<&PropertyValue> {
        self.values.get(&property)
    }

    /// Sets a property, returning the previous value.
    pub fn set(
        &mut self,
        property: KnownProperty,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.values.insert(property, value.into())
    }

    /// Removes a property, returning its value.
    pub fn remove(&mut self, property: KnownProperty) -> Option<PropertyValue> {
        self.values.remove(&property)
    }

    /// Returns true if the property is present.
    pub fn contains(&self, property: KnownProperty) -> bool {
        self.values.contains_key(&property)
    }

    /// Iterates over present properties.
    pub fn iter(&self) -> impl Iterator<Item = (KnownProperty, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(KnownProperty, PropertyValue)> for ContactProperties {
    fn from_iter<I: IntoIterator<Item = (KnownProperty, PropertyValue)>>(iter: I) -> Self {
        ContactProperties {
            values: iter.into_iter().collect(),
        }
    }
}
