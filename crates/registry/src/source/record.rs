use std::collections::BTreeMap;

use datatables_primitives::{EntryKey, RawDefinition, TableKind, validate_identifier};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Logical schema of a definition record.
///
/// Entry keys starting with `#` reference groups; all other keys reference
/// elements directly. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefinitionRecord {
	#[serde(rename = "type")]
	pub kind: TableKind,
	pub parents: Vec<String>,
	pub default_value: i32,
	pub entries: BTreeMap<String, i32>,
}

impl DefinitionRecord {
	/// Validates the record and turns it into the raw definition for table `id`.
	pub fn into_definition(self, id: &str) -> Result<RawDefinition, ParseError> {
		validate_identifier(id).map_err(ParseError::TableId)?;

		let mut builder = RawDefinition::builder(id).kind(self.kind).default_value(self.default_value);
		for parent in self.parents {
			if let Err(source) = validate_identifier(&parent) {
				return Err(ParseError::Parent { parent, source });
			}
			builder = builder.parent(parent);
		}
		for (key, value) in self.entries {
			match EntryKey::parse(&key) {
				Ok(key) => builder = builder.key(key, value),
				Err(source) => return Err(ParseError::EntryKey { key, source }),
			}
		}
		Ok(builder.build())
	}

	/// Parses a JSON record for table `id`.
	#[cfg(feature = "json")]
	pub fn parse_json(id: &str, text: &str) -> Result<RawDefinition, ParseError> {
		let record: DefinitionRecord = serde_json::from_str(text).map_err(|e| ParseError::Syntax(e.to_string()))?;
		record.into_definition(id)
	}
}
