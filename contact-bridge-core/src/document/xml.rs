// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! XML form of a contact document.
//!
//! ```xml
//! <LocalContacts>
//!   <Contact>
//!     <RemoteId>r1</RemoteId>
//!     <GivenName>Ada</GivenName>
//!     ...
//!   </Contact>
//! </LocalContacts>
//! ```
//!
//! On read the root element name is not checked and `Contact` elements are
//! collected at any depth. A field's value is all text inside it.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{ContactDocument, ContactRecord, DocumentError, CONTACT_ELEMENT};

/// Writes a document as indented XML under the given root element.
pub fn write_document(document: &ContactDocument, root: &str) -> Result<String, DocumentError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_event(&mut writer, Event::Start(BytesStart::new(root)))?;

    for record in document.records() {
        write_event(&mut writer, Event::Start(BytesStart::new(CONTACT_ELEMENT)))?;
        for (name, value) in record.fields() {
            if value.is_empty() {
                write_event(&mut writer, Event::Empty(BytesStart::new(name.as_str())))?;
                continue;
            }
            write_event(&mut writer, Event::Start(BytesStart::new(name.as_str())))?;
            write_event(&mut writer, Event::Text(BytesText::new(value)))?;
            write_event(&mut writer, Event::End(BytesEnd::new(name.as_str())))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new(CONTACT_ELEMENT)))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new(root)))?;

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| DocumentError::Write(e.to_string()))
}

fn write_event(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Write(e.to_string()))
}

/// An open field inside a contact element.
struct OpenField {
    name: String,
    value: String,
}

/// Parses a document from XML.
///
/// Fails with [`DocumentError::Parse`] unless the input is a single
/// well-formed root element.
pub fn parse_document(input: &str) -> Result<ContactDocument, DocumentError> {
    let mut reader = Reader::from_str(input);
    let mut document = ContactDocument::new();

    let mut depth = 0usize;
    let mut root_closed = false;
    // Depth of the open contact element, if any.
    let mut contact_depth: Option<usize> = None;
    let mut record = ContactRecord::new();
    let mut field: Option<OpenField> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            DocumentError::Parse(format!(
                "at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(start) => {
                if root_closed {
                    return Err(DocumentError::Parse("multiple root elements".into()));
                }
                let name = element_name(&start)?;
                depth += 1;
                match contact_depth {
                    None if name == CONTACT_ELEMENT => {
                        contact_depth = Some(depth);
                        record = ContactRecord::new();
                    }
                    Some(cd) if depth == cd + 1 => {
                        field = Some(OpenField {
                            name,
                            value: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Event::Empty(start) => {
                if root_closed {
                    return Err(DocumentError::Parse("multiple root elements".into()));
                }
                let name = element_name(&start)?;
                match contact_depth {
                    None if name == CONTACT_ELEMENT => document.push(ContactRecord::new()),
                    Some(cd) if depth == cd => record.push(&name, ""),
                    _ => {}
                }
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|e| DocumentError::Parse(e.to_string()))?;
                if let Some(open) = field.as_mut() {
                    open.value.push_str(&unescaped);
                } else if depth == 0 && !unescaped.trim().is_empty() {
                    return Err(DocumentError::Parse("text outside the root element".into()));
                }
            }
            Event::CData(data) => {
                if let Some(open) = field.as_mut() {
                    let text = std::str::from_utf8(&data)
                        .map_err(|e| DocumentError::Parse(e.to_string()))?;
                    open.value.push_str(text);
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Err(DocumentError::Parse("unexpected closing tag".into()));
                }
                if let Some(cd) = contact_depth {
                    if depth == cd + 1 {
                        if let Some(open) = field.take() {
                            record.push(&open.name, &open.value);
                        }
                    } else if depth == cd {
                        document.push(std::mem::take(&mut record));
                        contact_depth = None;
                    }
                }
                depth -= 1;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if depth != 0 {
        return Err(DocumentError::Parse("unexpected end of document".into()));
    }
    if !root_closed {
        return Err(DocumentError::Parse("missing root element".into()));
    }

    Ok(document)
}

fn element_name(start: &BytesStart<'_>) -> Result<String, DocumentError> {
    std::str::from_utf8(start.name().as_ref())
        .map(str::to_string)
        .map_err(|e| DocumentError::Parse(e.to_string()))
}
