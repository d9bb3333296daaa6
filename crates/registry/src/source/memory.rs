#[cfg(feature = "json")]
use std::sync::Arc;

use datatables_primitives::RawDefinition;

#[cfg(feature = "json")]
use super::record::DefinitionRecord;
use super::{DefinitionSource, SourcedDefinition};

/// Source with nothing to load, for dependent peers that only receive snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl DefinitionSource for EmptySource {
	fn definitions(&self) -> Vec<SourcedDefinition> {
		Vec::new()
	}
}

/// Source over already-built definitions.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	defs: Vec<RawDefinition>,
}

impl MemorySource {
	pub fn new(defs: impl IntoIterator<Item = RawDefinition>) -> Self {
		Self {
			defs: defs.into_iter().collect(),
		}
	}

	pub fn push(&mut self, def: RawDefinition) {
		self.defs.push(def);
	}
}

impl DefinitionSource for MemorySource {
	fn definitions(&self) -> Vec<SourcedDefinition> {
		self.defs.iter().cloned().map(SourcedDefinition::ok).collect()
	}
}

/// Source over `(id, json)` pairs, parsed on every load.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Default)]
pub struct JsonSource {
	records: Vec<(Arc<str>, String)>,
}

#[cfg(feature = "json")]
impl JsonSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, id: impl Into<Arc<str>>, json: impl Into<String>) -> Self {
		self.records.push((id.into(), json.into()));
		self
	}
}

#[cfg(feature = "json")]
impl DefinitionSource for JsonSource {
	fn definitions(&self) -> Vec<SourcedDefinition> {
		self.records
			.iter()
			.map(|(id, json)| SourcedDefinition {
				id: Arc::clone(id),
				result: DefinitionRecord::parse_json(id, json),
			})
			.collect()
	}
}
