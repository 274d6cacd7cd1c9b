//! Reversible escaping of field names MongoDB refuses to store.
//!
//! MongoDB rejects keys containing a NUL byte and treats `.` and `$` in keys as
//! path and operator syntax. Record fields may legitimately use any of them,
//! so keys are percent-escaped on the way in and unescaped on the way out.
//! Values are stored untouched so equality filters still match them.
//!
//! A top-level `_id` field is also escaped, to `%5Fid`, since that key holds
//! the primary key in storage.

use bson::{Bson, Document};

/// Percent-escapes forbidden key characters. `%` is escaped too so the
/// mapping stays reversible.
pub(crate) struct KeyEscaper;

impl KeyEscaper {
    const ESCAPES: [(char, &'static str); 4] = [('%', "%25"), ('.', "%2E"), ('$', "%24"), ('\0', "%00")];

    const PRIMARY_KEY: &'static str = "_id";
    const ESCAPED_PRIMARY_KEY: &'static str = "%5Fid";

    pub(crate) fn escape_key(key: &str) -> String {
        let mut escaped = String::with_capacity(key.len());
        for ch in key.chars() {
            match Self::ESCAPES.iter().find(|(target, _)| *target == ch) {
                Some((_, replacement)) => escaped.push_str(replacement),
                None => escaped.push(ch),
            }
        }
        escaped
    }

    pub(crate) fn unescape_key(key: &str) -> String {
        let mut restored = String::with_capacity(key.len());
        let mut rest = key;

        while let Some(index) = rest.find('%') {
            restored.push_str(&rest[..index]);
            let tail = &rest[index..];

            match Self::ESCAPES.iter().find(|(_, replacement)| tail.starts_with(replacement)) {
                Some((target, replacement)) => {
                    restored.push(*target);
                    rest = &tail[replacement.len()..];
                }
                None => {
                    restored.push('%');
                    rest = &tail[1..];
                }
            }
        }

        restored.push_str(rest);
        restored
    }

    /// Escapes a key at the top level of a stored document.
    pub(crate) fn escape_field(key: &str) -> String {
        if key == Self::PRIMARY_KEY {
            Self::ESCAPED_PRIMARY_KEY.to_string()
        } else {
            Self::escape_key(key)
        }
    }

    pub(crate) fn unescape_field(key: &str) -> String {
        if key == Self::ESCAPED_PRIMARY_KEY {
            Self::PRIMARY_KEY.to_string()
        } else {
            Self::unescape_key(key)
        }
    }

    /// Escapes a whole record, including a top-level `_id` field.
    pub(crate) fn escape_record(record: &Document) -> Document {
        record
            .iter()
            .map(|(key, value)| (Self::escape_field(key), Self::map_value(value, Self::escape_key)))
            .collect()
    }

    pub(crate) fn unescape_record(document: &Document) -> Document {
        document
            .iter()
            .map(|(key, value)| (Self::unescape_field(key), Self::map_value(value, Self::unescape_key)))
            .collect()
    }

    fn map_keys(document: &Document, f: fn(&str) -> String) -> Document {
        document
            .iter()
            .map(|(key, value)| (f(key), Self::map_value(value, f)))
            .collect()
    }

    fn map_value(value: &Bson, f: fn(&str) -> String) -> Bson {
        match value {
            Bson::Document(doc) => Bson::Document(Self::map_keys(doc, f)),
            Bson::Array(arr) => Bson::Array(arr.iter().map(|item| Self::map_value(item, f)).collect()),
            other => other.clone(),
        }
    }
}
