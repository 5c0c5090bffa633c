//! Post-processing of a completed pool into a dependency-first plan.

use std::collections::{HashMap, HashSet};

use super::DepPool;
use crate::forge::SourcePackage;
use crate::localdb::RepoPackage;

/// The build-and-install plan derived from a completed [`DepPool`].
///
/// Both orderings are dependency-first: anything a package needs appears
/// before it. Forge packages are rolled up into their source bases, one entry
/// per base however many packages it builds.
#[derive(Debug, Default)]
pub struct InstallOrder {
	/// Sync-repo packages, dependency-first.
	pub repo: Vec<RepoPackage>,
	/// Forge source bases, dependency-first, deduplicated per base.
	pub base_order: Vec<String>,
	/// Constituent packages of every resolved base, name-sorted.
	pub bases: HashMap<String, Vec<SourcePackage>>,
	/// Names reachable from a target through pure runtime dependency edges.
	pub runtime: HashSet<String>,
}

impl InstallOrder {
	pub fn from_pool(pool: &DepPool) -> Self {
		let mut order = InstallOrder::default();

		for pkg in pool.source.values() {
			order.bases.entry(pkg.base.clone()).or_default().push(pkg.clone());
		}
		for packages in order.bases.values_mut() {
			packages.sort_by(|a, b| a.name.cmp(&b.name));
		}

		/* Worklist copies of the resolved maps; a package leaves its pending
		 * map the moment it is visited, so no package is emitted twice even
		 * when several paths reach it. */
		let mut pending_repo = pool.repo.clone();
		let mut pending_source = pool.source.clone();

		for target in &pool.targets {
			let dep = target.dep_string();

			if let Some(pkg) = take_pending(&mut pending_source, &dep) {
				order.emit_source(pkg, &mut pending_source, &mut pending_repo);
			}

			if let Some(pkg) = take_pending(&mut pending_repo, &dep) {
				order.emit_repo(pkg, &mut pending_repo);
			}
		}

		order.runtime = classify_runtime(pool);

		order
	}

	/// Post-order emission: dependencies first, then the package's own base.
	fn emit_source(
		&mut self,
		pkg: SourcePackage,
		pending_source: &mut HashMap<String, SourcePackage>,
		pending_repo: &mut HashMap<String, RepoPackage>,
	) {
		for dep in pkg.all_depends() {
			if let Some(next) = take_pending(pending_source, dep) {
				self.emit_source(next, pending_source, pending_repo);
			}

			if let Some(next) = take_pending(pending_repo, dep) {
				self.emit_repo(next, pending_repo);
			}
		}

		if !self.base_order.iter().any(|base| base == &pkg.base) {
			self.base_order.push(pkg.base.clone());
		}
	}

	fn emit_repo(&mut self, pkg: RepoPackage, pending_repo: &mut HashMap<String, RepoPackage>) {
		for dep in &pkg.depends {
			if let Some(next) = take_pending(pending_repo, dep) {
				self.emit_repo(next, pending_repo);
			}
		}

		self.repo.push(pkg);
	}

	fn resolved_names(&self) -> impl Iterator<Item = &String> {
		self.repo.iter().map(|pkg| &pkg.name)
			.chain(self.bases.values().flatten().map(|pkg| &pkg.name))
	}

	/// True when anything resolved is only needed at build time.
	pub fn has_make_only(&self) -> bool {
		self.runtime.len() != self.resolved_names().count()
	}

	/// Names needed only to build, candidates for removal after install.
	pub fn get_make_only(&self) -> Vec<String> {
		let mut names: Vec<String> = self.resolved_names()
			.filter(|name| !self.runtime.contains(name.as_str()))
			.cloned()
			.collect();
		names.sort();
		names
	}
}

/// Removes and returns the name-sorted first pending satisfier of `dep`.
fn take_pending<P: Satisfier>(pending: &mut HashMap<String, P>, dep: &str) -> Option<P> {
	let mut names: Vec<&String> = pending.keys().collect();
	names.sort();

	let found = names.into_iter().find(|name| pending[name.as_str()].satisfies(dep)).cloned();
	found.and_then(|name| pending.remove(&name))
}

/// The shared capability both package shapes expose to dependency walks.
trait Satisfier {
	fn satisfies(&self, dep: &str) -> bool;
}

impl Satisfier for SourcePackage {
	fn satisfies(&self, dep: &str) -> bool {
		SourcePackage::satisfies(self, dep)
	}
}

impl Satisfier for RepoPackage {
	fn satisfies(&self, dep: &str) -> bool {
		RepoPackage::satisfies(self, dep)
	}
}

/// Runtime reachability: chase only each package's plain runtime dependency
/// list from the targets outward. Hops through build or check lists never
/// confer runtime status.
fn classify_runtime(pool: &DepPool) -> HashSet<String> {
	let mut runtime = HashSet::<String>::new();
	let mut work: Vec<String> = pool.targets.iter().map(|target| target.dep_string()).collect();

	while let Some(dep) = work.pop() {
		if let Some(pkg) = pool.find_satisfier_source(&dep) {
			if runtime.insert(pkg.name.clone()) {
				work.extend(pkg.depends.iter().cloned());
			}
		}

		if let Some(pkg) = pool.find_satisfier_repo(&dep) {
			if runtime.insert(pkg.name.clone()) {
				work.extend(pkg.depends.iter().cloned());
			}
		}
	}

	runtime
}

impl std::fmt::Display for InstallOrder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "Repo ({}): {}", self.repo.len(),
			self.repo.iter().map(|pkg| pkg.name.as_str()).collect::<Vec<_>>().join(" "))?;

		let rendered_bases: Vec<String> = self.base_order.iter().map(|base| {
			let members = self.bases.get(base).map(Vec::as_slice).unwrap_or(&[]);
			if members.len() == 1 && members[0].name == *base {
				base.clone()
			} else {
				format!("{} ({})", base,
					members.iter().map(|pkg| pkg.name.as_str()).collect::<Vec<_>>().join(" "))
			}
		}).collect();
		writeln!(f, "Build ({}): {}", self.base_order.len(), rendered_bases.join(" "))?;

		let mut runtime: Vec<&String> = self.runtime.iter().collect();
		runtime.sort();
		writeln!(f, "Runtime ({}): {}", runtime.len(),
			runtime.iter().map(|name| name.as_str()).collect::<Vec<_>>().join(" "))?;

		let make_only = self.get_make_only();
		write!(f, "Make only ({}): {}", make_only.len(), make_only.join(" "))
	}
}
