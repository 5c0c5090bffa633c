//! The materialized local package database.
//!
//! Holds everything the resolver may query synchronously: the set of
//! installed packages, the configured sync repositories in configuration
//! order and their package groups. The database is externally owned data;
//! stew only ever reads it.

use std::collections::HashSet;
use std::io::{Read, Write};

use serde::{Serialize, Deserialize};

use crate::dependency::{pkg_satisfies, provide_satisfies};

/// A binary package record from a sync repository or the install database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPackage {
	pub name: String,
	pub version: String,
	/// Name of the sync repo this record came from; empty for installed-only records.
	pub repo: String,
	pub provides: Vec<String>,
	pub depends: Vec<String>,
}

impl RepoPackage {
	/// True when this package, by name or through a provide entry, satisfies `dep`.
	pub fn satisfies(&self, dep: &str) -> bool {
		if pkg_satisfies(&self.name, &self.version, dep) {
			return true;
		}

		self.provides.iter().any(|provide| provide_satisfies(provide, dep))
	}
}

/// One configured binary repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncRepo {
	pub name: String,
	pub packages: Vec<RepoPackage>,
	pub groups: HashSet<String>,
}

impl SyncRepo {
	/// A package whose name matches wins over one that merely provides `dep`.
	pub fn find_satisfier(&self, dep: &str) -> Option<&RepoPackage> {
		self.packages.iter()
			.find(|pkg| pkg_satisfies(&pkg.name, &pkg.version, dep))
			.or_else(|| {
				self.packages.iter().find(|pkg| {
					pkg.provides.iter().any(|provide| provide_satisfies(provide, dep))
				})
			})
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalDb {
	installed: Vec<RepoPackage>,
	repos: Vec<SyncRepo>,
}

impl LocalDb {
	pub fn new(installed: Vec<RepoPackage>, repos: Vec<SyncRepo>) -> Self {
		LocalDb { installed, repos }
	}

	pub fn installed(&self) -> &[RepoPackage] {
		&self.installed
	}

	pub fn repos(&self) -> &[SyncRepo] {
		&self.repos
	}

	pub fn repo_by_name(&self, name: &str) -> Option<&SyncRepo> {
		self.repos.iter().find(|repo| repo.name == name)
	}

	/// Searches the install database for a satisfier of `dep`.
	pub fn find_installed_satisfier(&self, dep: &str) -> Option<&RepoPackage> {
		self.installed.iter()
			.find(|pkg| pkg_satisfies(&pkg.name, &pkg.version, dep))
			.or_else(|| {
				self.installed.iter().find(|pkg| {
					pkg.provides.iter().any(|provide| provide_satisfies(provide, dep))
				})
			})
	}

	/// Searches every sync repo in configuration order for a satisfier of `dep`.
	pub fn find_sync_satisfier(&self, dep: &str) -> Option<&RepoPackage> {
		self.repos.iter().find_map(|repo| repo.find_satisfier(dep))
	}

	/// Only checks that the group exists; group members are never expanded here.
	pub fn find_group(&self, name: &str) -> bool {
		self.repos.iter().any(|repo| repo.groups.contains(name))
	}

	pub fn load_from_disk(options: &crate::StewOptions) -> crate::Result<Self> {
		let mut f = std::fs::File::open(options.data_dir().join("localdb.bin"))?;
		let mut v = Vec::<u8>::new();
		f.read_to_end(&mut v)?;
		Ok(bincode::deserialize::<Self>(&v)?)
	}

	pub fn save_to_disk(&self, options: &crate::StewOptions) -> crate::Result<()> {
		std::fs::create_dir_all(options.data_dir())?;
		let data = bincode::serialize(self)?;
		let mut f = std::fs::File::create(options.data_dir().join("localdb.bin"))?;
		f.write_all(&data)?;
		Ok(())
	}
}
