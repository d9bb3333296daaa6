use std::fmt;
use std::sync::Arc;

use crate::ident::{GROUP_MARKER, IdentifierError, validate_identifier};

/// Key of a raw or merged table entry.
///
/// Two keys are equal only when both the identifier and the group flag match,
/// so `stone` and `#stone` are distinct entries that may coexist in one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
	id: Arc<str>,
	is_group: bool,
}

impl EntryKey {
	/// Key for a direct element reference.
	pub fn element(id: impl Into<Arc<str>>) -> Self {
		Self {
			id: id.into(),
			is_group: false,
		}
	}

	/// Key for a group reference.
	pub fn group(id: impl Into<Arc<str>>) -> Self {
		Self {
			id: id.into(),
			is_group: true,
		}
	}

	/// Parses the textual key form used in definition records.
	///
	/// A leading [`GROUP_MARKER`] denotes a group reference; the remainder must
	/// be a valid identifier in both cases.
	pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
		match raw.strip_prefix(GROUP_MARKER) {
			Some(group) => {
				validate_identifier(group)?;
				Ok(Self::group(group))
			}
			None => {
				validate_identifier(raw)?;
				Ok(Self::element(raw))
			}
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Shared handle to the identifier, for callers that keep it past the key.
	pub fn id_arc(&self) -> &Arc<str> {
		&self.id
	}

	pub fn is_group(&self) -> bool {
		self.is_group
	}
}

impl fmt::Display for EntryKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_group {
			write!(f, "{GROUP_MARKER}{}", self.id)
		} else {
			f.write_str(&self.id)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_distinguishes_groups() {
		let elem = EntryKey::parse("minecraft:oak_log").unwrap();
		assert!(!elem.is_group());
		assert_eq!(elem.id(), "minecraft:oak_log");

		let group = EntryKey::parse("#minecraft:logs").unwrap();
		assert!(group.is_group());
		assert_eq!(group.id(), "minecraft:logs");
		assert_eq!(group.to_string(), "#minecraft:logs");
	}

	#[test]
	fn group_and_element_with_same_id_differ() {
		assert_ne!(EntryKey::element("stone"), EntryKey::group("stone"));
		assert_eq!(EntryKey::element("stone"), EntryKey::parse("stone").unwrap());
	}

	#[test]
	fn parse_rejects_bare_marker_and_double_marker() {
		assert_eq!(EntryKey::parse("#"), Err(IdentifierError::Empty));
		assert!(matches!(EntryKey::parse("##logs"), Err(IdentifierError::GroupMarker(_))));
	}
}
