//! Event-driven lifecycle for a [`Registry`].
//!
//! The host side reloads definitions and resolves them when its dependencies
//! (group membership) are ready, then serves snapshots on request. A dependent
//! peer only installs snapshots received from the host.

use std::sync::Arc;

use crate::db::{LoadReport, Registry};
use crate::error::RegistryError;
use crate::groups::GroupProviders;
use crate::resolve::ResolveReport;
use crate::source::{DefinitionSource, EmptySource};
use crate::sync::{self, SyncLimits};

/// Binds a registry to its definition source, group providers and decode limits.
#[derive(Debug)]
pub struct Lifecycle<S = EmptySource> {
	registry: Arc<Registry>,
	source: S,
	groups: GroupProviders,
	limits: SyncLimits,
}

impl<S: DefinitionSource> Lifecycle<S> {
	/// Authoritative side: loads from `source` and resolves against `groups`.
	pub fn host(registry: Arc<Registry>, source: S, groups: GroupProviders) -> Self {
		Self {
			registry,
			source,
			groups,
			limits: SyncLimits::default(),
		}
	}

	pub fn with_limits(mut self, limits: SyncLimits) -> Self {
		self.limits = limits;
		self
	}

	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	/// Definitions on disk (or wherever the source reads) changed.
	pub fn on_definitions_changed(&self) -> LoadReport {
		self.registry.load(&self.source)
	}

	/// Group membership is available; tables can be resolved.
	pub fn on_dependencies_ready(&self) -> Result<ResolveReport, RegistryError> {
		self.registry.resolve(&self.groups)
	}

	/// Installs a snapshot sent by the authoritative side.
	///
	/// A rejected snapshot leaves the registry in its prior state.
	pub fn on_sync_received(&self, bytes: &[u8]) -> Result<usize, RegistryError> {
		let snapshot = sync::decode(bytes, &self.limits).inspect_err(|error| {
			tracing::error!(
				domain = "datatables",
				bytes = bytes.len(),
				%error,
				"rejected data table snapshot",
			);
		})?;
		Ok(self.registry.apply_snapshot(snapshot))
	}

	/// Encodes the resolved tables for a dependent peer.
	///
	/// Tables a peer with the same limits would reject are refused here instead.
	pub fn on_sync_requested(&self) -> Result<Vec<u8>, RegistryError> {
		let snapshot = self.registry.create_snapshot().inspect_err(|_| {
			tracing::error!(
				domain = "datatables",
				state = %self.registry.state(),
				"data tables are not resolved on the authoritative side",
			);
		})?;
		let bytes = sync::encode(&snapshot, &self.limits).inspect_err(|error| {
			tracing::error!(domain = "datatables", %error, "data table snapshot cannot be sent");
		})?;
		Ok(bytes)
	}
}

impl Lifecycle<EmptySource> {
	/// Dependent side: no definitions of its own, only received snapshots.
	pub fn peer(registry: Arc<Registry>) -> Self {
		Self::host(registry, EmptySource, GroupProviders::new())
	}
}
