//! Various helper functions for testing
//!
//! Fixtures here never touch the network: the registry is an in-memory
//! [`StaticRegistry`] and local databases are built from literal records.

use std::sync::atomic::{AtomicUsize, Ordering};

use stew::forge::{SourcePackage, SourceRegistry};
use stew::localdb::{LocalDb, RepoPackage, SyncRepo};

/// Builds a binary package record.
pub fn repo_pkg(name: &str, version: &str, repo: &str, provides: &[&str], depends: &[&str]) -> RepoPackage {
	RepoPackage {
		name: name.to_string(),
		version: version.to_string(),
		repo: repo.to_string(),
		provides: provides.iter().map(|s| s.to_string()).collect(),
		depends: depends.iter().map(|s| s.to_string()).collect(),
	}
}

/// Builds a forge package record.
pub fn source_pkg(name: &str, base: &str, version: &str) -> SourcePackage {
	SourcePackage {
		name: name.to_string(),
		base: base.to_string(),
		version: version.to_string(),
		..Default::default()
	}
}

/// Builds a sync repo from packages and group names.
pub fn sync_repo(name: &str, packages: Vec<RepoPackage>, groups: &[&str]) -> SyncRepo {
	SyncRepo {
		name: name.to_string(),
		packages,
		groups: groups.iter().map(|s| s.to_string()).collect(),
	}
}

/// A local database with nothing installed and no repos.
pub fn empty_local_db() -> LocalDb {
	LocalDb::default()
}

/// In-memory stand-in for the forge with call counters.
///
/// `info` returns every package whose name was asked for; `search` matches
/// names containing the fragment. Counters let tests assert how many round
/// trips a resolution needed.
#[derive(Default)]
pub struct StaticRegistry {
	packages: Vec<SourcePackage>,
	info_calls: AtomicUsize,
	search_calls: AtomicUsize,
}

impl StaticRegistry {
	pub fn new(packages: Vec<SourcePackage>) -> Self {
		StaticRegistry { packages, ..Default::default() }
	}

	pub fn info_calls(&self) -> usize {
		self.info_calls.load(Ordering::SeqCst)
	}

	pub fn search_calls(&self) -> usize {
		self.search_calls.load(Ordering::SeqCst)
	}
}

impl SourceRegistry for StaticRegistry {
	fn info(&self, names: &[String]) -> stew::Result<Vec<SourcePackage>> {
		self.info_calls.fetch_add(1, Ordering::SeqCst);

		Ok(self.packages.iter()
			.filter(|pkg| names.iter().any(|name| name == &pkg.name))
			.cloned()
			.collect())
	}

	fn search(&self, fragment: &str) -> stew::Result<Vec<SourcePackage>> {
		self.search_calls.fetch_add(1, Ordering::SeqCst);

		Ok(self.packages.iter()
			.filter(|pkg| pkg.name.contains(fragment))
			.cloned()
			.collect())
	}
}
