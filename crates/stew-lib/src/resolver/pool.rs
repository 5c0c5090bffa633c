//! The dependency pool: working state of one resolution.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::StewOptions;
use crate::dependency::{split_dep, Target};
use crate::forge::{SourcePackage, SourceRegistry};
use crate::localdb::{LocalDb, RepoPackage};

/// Decides between several forge packages satisfying one dependency.
///
/// Candidates arrive name-sorted; the returned index selects one of them.
/// Out-of-range indices fall back to the last candidate.
pub trait ProviderPicker {
	fn pick(&self, dep: &str, candidates: &[&SourcePackage]) -> usize;
}

/// Deterministic default: the first candidate in name order wins.
pub struct TakeFirst;

impl ProviderPicker for TakeFirst {
	fn pick(&self, _dep: &str, _candidates: &[&SourcePackage]) -> usize {
		0
	}
}

/// Mutable resolution state.
///
/// A name present in `repo` is never also present in `source`; once a name
/// enters either map it is skipped by all further expansion, which is what
/// terminates recursion even across cyclic provides.
pub struct DepPool<'a> {
	pub targets: Vec<Target>,
	/// Packages to be installed from a sync repo.
	pub repo: HashMap<String, RepoPackage>,
	/// Packages to be built from forge sources.
	pub source: HashMap<String, SourcePackage>,
	/// Every forge record fetched so far, used or not.
	pub cache: HashMap<String, SourcePackage>,
	/// Matched group targets, recorded but never expanded.
	pub groups: Vec<String>,
	local: &'a LocalDb,
	registry: &'a dyn SourceRegistry,
	options: &'a StewOptions,
	picker: &'a dyn ProviderPicker,
}

/// Resolves raw target strings into a completed pool.
pub fn resolve<'a>(
	pkgs: &[String],
	local: &'a LocalDb,
	registry: &'a dyn SourceRegistry,
	options: &'a StewOptions,
	picker: &'a dyn ProviderPicker,
) -> crate::Result<DepPool<'a>> {
	let mut pool = DepPool::new(local, registry, options, picker);
	pool.resolve_targets(pkgs)?;
	Ok(pool)
}

impl<'a> DepPool<'a> {
	pub fn new(
		local: &'a LocalDb,
		registry: &'a dyn SourceRegistry,
		options: &'a StewOptions,
		picker: &'a dyn ProviderPicker,
	) -> Self {
		DepPool {
			targets: Vec::new(),
			repo: HashMap::new(),
			source: HashMap::new(),
			cache: HashMap::new(),
			groups: Vec::new(),
			local,
			registry,
			options,
			picker,
		}
	}

	pub fn local(&self) -> &'a LocalDb {
		self.local
	}

	/// Resolves every target, batching all forge-bound lookups into one
	/// expansion pass at the end.
	///
	/// Targets already satisfied by the pool are skipped in target order,
	/// first match wins. A target naming a sync repo that does not exist is a
	/// configuration error and aborts the whole resolution.
	pub fn resolve_targets(&mut self, pkgs: &[String]) -> crate::Result<()> {
		for pkg in pkgs {
			self.targets.push(Target::parse(pkg));
		}

		/* Forge requests are slow; collect as many names as possible into a
		 * single batched info call. */
		let mut forge_targets = HashSet::<String>::new();

		let targets = self.targets.clone();
		for target in &targets {
			if self.has_satisfier(&target.dep_string()) {
				log::info!("skipping target {}: already satisfied", target);
				continue;
			}

			if target.is_forge_only() {
				forge_targets.insert(target.dep_string());
				continue;
			}

			let found = if let Some(repo_name) = &target.repo {
				let repo = self.local.repo_by_name(repo_name)
					.ok_or_else(|| crate::Error::NoSuchRepo(repo_name.clone()))?;
				repo.find_satisfier(&target.dep_string()).cloned()
			} else {
				self.local.find_sync_satisfier(&target.dep_string()).cloned()
			};

			if let Some(pkg) = found {
				self.resolve_repo_dependency(pkg);
				continue;
			}

			/* Groups are opaque installs: record the match, never expand it. */
			if self.local.find_group(&target.name) {
				self.groups.push(target.to_string());
				continue;
			}

			if target.repo.is_none() {
				forge_targets.insert(target.dep_string());
			}
		}

		if !forge_targets.is_empty() {
			self.resolve_source_packages(forge_targets)?;
		}

		Ok(())
	}

	/// Adds a sync-repo package and recursively pulls in its dependencies.
	///
	/// Sync-repo dependency chains are assumed closed over the sync repos: a
	/// dependency satisfiable only on the forge is left alone here and will
	/// surface in the missing report instead.
	pub fn resolve_repo_dependency(&mut self, pkg: RepoPackage) {
		log::debug!("resolved {} {} from sync repo {}", pkg.name, pkg.version, pkg.repo);
		let deps = pkg.depends.clone();
		self.repo.insert(pkg.name.clone(), pkg);

		for dep in deps {
			if self.has_satisfier(&dep) {
				continue;
			}

			if self.local.find_installed_satisfier(&dep).is_some() {
				continue;
			}

			if let Some(next) = self.local.find_sync_satisfier(&dep).cloned() {
				self.resolve_repo_dependency(next);
			}
		}
	}

	/// Recursive expansion of the forge side of the pool.
	///
	/// Each level fetches metadata for the whole candidate set in one batched
	/// call, promotes satisfiers out of the cache, then classifies the newly
	/// exposed dependencies: pool-satisfied and installed ones are dropped,
	/// sync-satisfiable ones are resolved through the repo path, and the rest
	/// are carried into the next level. Network round trips therefore scale
	/// with dependency depth, not breadth.
	pub fn resolve_source_packages(&mut self, pkgs: HashSet<String>) -> crate::Result<()> {
		self.cache_source_packages(&pkgs)?;

		let mut new_deps = HashSet::<String>::new();
		let mut carried = HashSet::<String>::new();

		let mut requested: Vec<&String> = pkgs.iter().collect();
		requested.sort();

		for name in requested {
			if self.source.contains_key(name.as_str()) {
				continue;
			}

			let pkg = match self.find_satisfier_cache(name) {
				Some(pkg) => pkg.clone(),
				None => continue,
			};

			log::debug!("resolved {} {} from the forge (base {})", pkg.name, pkg.version, pkg.base);
			new_deps.extend(pkg.all_depends().cloned());
			self.source.insert(pkg.name.clone(), pkg);
		}

		let mut deps: Vec<String> = new_deps.into_iter().collect();
		deps.sort();

		for dep in deps {
			if self.has_satisfier(&dep) {
				continue;
			}

			if self.local.find_installed_satisfier(&dep).is_some() {
				continue;
			}

			if let Some(repo_pkg) = self.local.find_sync_satisfier(&dep).cloned() {
				self.resolve_repo_dependency(repo_pkg);
				continue;
			}

			/* assume the forge has it */
			carried.insert(dep);
		}

		if !carried.is_empty() {
			self.resolve_source_packages(carried)?;
		}

		Ok(())
	}

	/// Fetches metadata for every name in `pkgs` not already cached, in one
	/// batched call. Everything returned lands in the cache whether or not it
	/// ends up used.
	fn cache_source_packages(&mut self, pkgs: &HashSet<String>) -> crate::Result<()> {
		let mut wanted: HashSet<String> = pkgs.iter()
			.filter(|pkg| !self.cache.contains_key(pkg.as_str()))
			.cloned()
			.collect();

		if wanted.is_empty() {
			return Ok(());
		}

		if self.options.discover_provides() {
			self.discover_provides(&mut wanted);
		}

		let mut query: Vec<String> = wanted.iter()
			.filter(|pkg| !self.cache.contains_key(pkg.as_str()))
			.map(|pkg| split_dep(pkg).0.to_string())
			.collect();
		query.sort();
		query.dedup();

		let info = self.registry.info(&query)?;

		for pkg in info {
			self.cache.insert(pkg.name.clone(), pkg);
		}

		Ok(())
	}

	/// Speculative provide discovery.
	///
	/// Searches the forge for every unmatched name and merges the hits into
	/// the request set so the following info call caches them. The fragment is
	/// widened by retrying with progressively longer hyphen-delimited
	/// prefixes, shortest first, so `java-environment` searches as `java`.
	/// Search failures are logged and skipped; discovery is best-effort.
	fn discover_provides(&self, pkgs: &mut HashSet<String>) {
		/* worker cap per batch; readers only run after the scope joins */
		const SEARCH_WORKERS: usize = 8;

		let names: Vec<String> = pkgs.iter().cloned().collect();
		let hits = Mutex::new(HashSet::<String>::new());
		let registry = self.registry;

		for batch in names.chunks(SEARCH_WORKERS) {
			std::thread::scope(|scope| {
				for name in batch {
					let hits = &hits;
					scope.spawn(move || {
						let words: Vec<&str> = split_dep(name).0.split('-').collect();

						for i in 0..words.len() {
							match registry.search(&words[..=i].join("-")) {
								Ok(results) => {
									let mut hits = hits.lock().unwrap();
									for result in results {
										hits.insert(result.name);
									}
									break;
								}
								Err(e) => log::warn!("provide discovery for `{}`: {}", name, e),
							}
						}
					});
				}
			});
		}

		for hit in hits.into_inner().unwrap() {
			if !self.cache.contains_key(&hit) {
				pkgs.insert(hit);
			}
		}
	}

	/// Finds a satisfier among the packages already picked for building.
	pub fn find_satisfier_source(&self, dep: &str) -> Option<&SourcePackage> {
		let mut names: Vec<&String> = self.source.keys().collect();
		names.sort();

		names.into_iter()
			.map(|name| &self.source[name])
			.find(|pkg| pkg.satisfies(dep))
	}

	/// Finds a satisfier among the packages already picked for repo install.
	pub fn find_satisfier_repo(&self, dep: &str) -> Option<&RepoPackage> {
		let mut names: Vec<&String> = self.repo.keys().collect();
		names.sort();

		names.into_iter()
			.map(|name| &self.repo[name])
			.find(|pkg| pkg.satisfies(dep))
	}

	/// Promotes a satisfier out of the metadata cache.
	///
	/// A cached record matching the name of an already installed satisfier is
	/// preferred outright. Otherwise every cached candidate is collected in
	/// name order and an ambiguity is handed to the provider picker.
	pub fn find_satisfier_cache(&self, dep: &str) -> Option<&SourcePackage> {
		if let Some(installed) = self.local.find_installed_satisfier(dep) {
			if let Some(provider) = self.cache.get(&installed.name) {
				return Some(provider);
			}
		}

		let mut names: Vec<&String> = self.cache.keys().collect();
		names.sort();

		let providers: Vec<&SourcePackage> = names.into_iter()
			.map(|name| &self.cache[name])
			.filter(|pkg| pkg.satisfies(dep))
			.collect();

		match providers.len() {
			0 => None,
			1 => Some(providers[0]),
			_ => {
				let choice = self.picker.pick(dep, &providers);
				Some(providers[choice.min(providers.len() - 1)])
			}
		}
	}

	pub fn has_satisfier(&self, dep: &str) -> bool {
		self.find_satisfier_repo(dep).is_some() || self.find_satisfier_source(dep).is_some()
	}

	pub fn has_package(&self, name: &str) -> bool {
		self.repo.contains_key(name)
			|| self.source.contains_key(name)
			|| self.groups.iter().any(|group| group == name)
	}
}

impl std::fmt::Display for DepPool<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		fn sorted<'k>(keys: impl Iterator<Item = &'k String>) -> Vec<&'k str> {
			let mut v: Vec<&str> = keys.map(String::as_str).collect();
			v.sort();
			v
		}

		writeln!(f, "Targets ({}): {}", self.targets.len(),
			self.targets.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" "))?;
		writeln!(f, "Repo ({}): {}", self.repo.len(), sorted(self.repo.keys()).join(" "))?;
		writeln!(f, "Source ({}): {}", self.source.len(), sorted(self.source.keys()).join(" "))?;
		writeln!(f, "Source cache ({}): {}", self.cache.len(), sorted(self.cache.keys()).join(" "))?;
		write!(f, "Groups ({}): {}", self.groups.len(), self.groups.join(" "))
	}
}
