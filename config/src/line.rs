//! Line classification and the parse state machine.
//!
//! Each input line is trimmed and classified as blank, a `[section]` header or
//! a `key = value` assignment. [`parse_line`] applies that verdict to a
//! [`SectionStore`] through an explicit [`ParseState`] cursor.

use crate::store::{SectionId, SectionStore};
use crate::{LineError, LineErrorKind};

/// Which section subsequent key/value lines append to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    /// No header seen yet.
    #[default]
    Outside,
    InSection(SectionId),
}

impl ParseState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::InSection(_))
    }
}

/// A syntactically valid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Section(&'a str),
    KeyValue { key: &'a str, value: &'a str },
}

impl<'a> Line<'a> {
    /// Classify `raw` without touching any state.
    pub fn classify(raw: &'a str) -> Result<Self, LineError> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(Self::Blank);
        }

        if let Some(name) = line
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            if name.trim().is_empty() {
                return Err(LineError::new(line, LineErrorKind::EmptySectionName));
            }
            return Ok(Self::Section(name));
        }

        let (key, value) = match line.find('=') {
            Some(pos) if pos > 0 => (&line[..pos], &line[pos + 1..]),
            _ => return Err(LineError::new(line, LineErrorKind::InvalidLine)),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(LineError::new(line, LineErrorKind::EmptyKey));
        }

        Ok(Self::KeyValue {
            key,
            value: strip_quotes(value.trim()),
        })
    }
}

/// Strip one pair of surrounding double quotes. A lone `"` is left as is.
fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 {
        if let Some(inner) = value
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return inner;
        }
    }
    value
}

/// Parse one line and apply it to `store`, advancing `state`.
pub fn parse_line(
    raw: &str,
    state: &mut ParseState,
    store: &mut SectionStore,
) -> Result<(), LineError> {
    match Line::classify(raw)? {
        Line::Blank => {}
        Line::Section(name) => {
            *state = ParseState::InSection(store.get_or_create(name));
        }
        Line::KeyValue { key, value } => {
            let ParseState::InSection(id) = *state else {
                return Err(LineError::new(raw.trim(), LineErrorKind::LineOutsideSection));
            };
            store.section_mut(id).set(key, value);
        }
    }
    Ok(())
}
