use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Domain a table's identifiers belong to.
///
/// The kind selects which group membership provider expands group entries.
/// [`TableKind::Misc`] is the generic kind with no expected membership source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TableKind {
	Block,
	Entity,
	Item,
	#[default]
	Misc,
}

impl TableKind {
	pub const ALL: [TableKind; 4] = [TableKind::Block, TableKind::Entity, TableKind::Item, TableKind::Misc];

	/// Returns true for the untyped kind, where unresolved groups are only warnings.
	pub fn is_generic(self) -> bool {
		self == TableKind::Misc
	}

	/// Stable tag used by the sync wire format.
	pub fn wire_tag(self) -> u8 {
		match self {
			TableKind::Block => 0,
			TableKind::Entity => 1,
			TableKind::Item => 2,
			TableKind::Misc => 3,
		}
	}

	pub fn from_wire_tag(tag: u8) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.wire_tag() == tag)
	}
}
