//! Definition sources.
//!
//! A [`DefinitionSource`] hands the registry one result per table id. Parsing
//! and discovery live behind this trait; the registry only logs and skips
//! failed records.

use std::sync::Arc;

use datatables_primitives::RawDefinition;

use crate::error::ParseError;

mod memory;
mod record;

#[cfg(feature = "json")]
pub use memory::JsonSource;
pub use memory::{EmptySource, MemorySource};
pub use record::DefinitionRecord;

/// One record produced by a source.
#[derive(Debug, Clone)]
pub struct SourcedDefinition {
	pub id: Arc<str>,
	pub result: Result<RawDefinition, ParseError>,
}

impl SourcedDefinition {
	pub fn ok(def: RawDefinition) -> Self {
		Self {
			id: Arc::clone(def.id()),
			result: Ok(def),
		}
	}

	pub fn err(id: impl Into<Arc<str>>, error: ParseError) -> Self {
		Self {
			id: id.into(),
			result: Err(error),
		}
	}
}

/// Supplies the raw definitions of one load cycle.
pub trait DefinitionSource {
	fn definitions(&self) -> Vec<SourcedDefinition>;
}

impl<T: DefinitionSource + ?Sized> DefinitionSource for &T {
	fn definitions(&self) -> Vec<SourcedDefinition> {
		(**self).definitions()
	}
}

impl<T: DefinitionSource + ?Sized> DefinitionSource for Arc<T> {
	fn definitions(&self) -> Vec<SourcedDefinition> {
		(**self).definitions()
	}
}
