/// Prefix marking an entry key as a group reference (`#group_id`).
pub const GROUP_MARKER: char = '#';

/// Reasons an identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
	#[error("identifier is empty")]
	Empty,
	#[error("identifier {0:?} contains whitespace or control characters")]
	InvalidChar(String),
	#[error("identifier {0:?} starts with the group marker '#'")]
	GroupMarker(String),
	#[error("identifier of {len} bytes exceeds the {max} byte limit")]
	TooLong { len: usize, max: usize },
}

/// Checks that `id` is usable as a table, element, or group identifier.
///
/// Identifiers must be non-empty, must not contain whitespace or control
/// characters, and must not start with [`GROUP_MARKER`] (the marker belongs to
/// the entry key syntax, not to the identifier).
pub fn validate_identifier(id: &str) -> Result<(), IdentifierError> {
	if id.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if id.starts_with(GROUP_MARKER) {
		return Err(IdentifierError::GroupMarker(id.to_string()));
	}
	if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
		return Err(IdentifierError::InvalidChar(id.to_string()));
	}
	Ok(())
}
