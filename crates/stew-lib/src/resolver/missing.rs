//! Unsatisfiable-dependency reporting.
//!
//! Missing dependencies are data, not errors: the resolver records them and
//! keeps going, leaving the final decision to the caller.

use std::collections::{HashMap, HashSet};

use super::DepPool;

/// Every unsatisfiable dependency string, each with the distinct requirement
/// chains that led to it.
#[derive(Debug, Default)]
pub struct MissingReport {
	pub missing: HashMap<String, Vec<Vec<String>>>,
}

impl MissingReport {
	pub fn is_empty(&self) -> bool {
		self.missing.is_empty()
	}
}

impl std::fmt::Display for MissingReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut deps: Vec<&String> = self.missing.keys().collect();
		deps.sort();

		for dep in deps {
			for chain in &self.missing[dep] {
				if chain.is_empty() {
					writeln!(f, "{} (target)", dep)?;
				} else {
					writeln!(f, "{} (wanted by: {})", dep, chain.join(" -> "))?;
				}
			}
		}

		Ok(())
	}
}

impl DepPool<'_> {
	/// Walks every target's dependency tree against what is actually
	/// installed or resolvable and reports the dead ends.
	///
	/// A memo set of known-good dependency strings and per-dependency chain
	/// dedup keep the walk linear on diamond-shaped graphs.
	pub fn check_missing(&self) -> MissingReport {
		let mut good = HashSet::<String>::new();
		let mut report = MissingReport::default();

		for target in &self.targets {
			self.walk_missing(&target.dep_string(), &[], &mut good, &mut report);
		}

		report
	}

	fn walk_missing(&self, dep: &str, chain: &[String], good: &mut HashSet<String>, report: &mut MissingReport) {
		if self.local().find_installed_satisfier(dep).is_some() {
			good.insert(dep.to_string());
			return;
		}

		if good.contains(dep) {
			return;
		}

		if let Some(chains) = report.missing.get_mut(dep) {
			/* a second path to a known-missing dependency only counts when
			 * the chain itself is new */
			if chains.iter().any(|known| known == chain) {
				return;
			}
			chains.push(chain.to_vec());
			return;
		}

		if let Some(pkg) = self.find_satisfier_source(dep) {
			good.insert(dep.to_string());

			let mut next_chain = chain.to_vec();
			next_chain.push(pkg.name.clone());

			for next in pkg.all_depends() {
				self.walk_missing(next, &next_chain, good, report);
			}

			return;
		}

		if let Some(pkg) = self.find_satisfier_repo(dep) {
			good.insert(dep.to_string());

			let mut next_chain = chain.to_vec();
			next_chain.push(pkg.name.clone());

			for next in &pkg.depends {
				self.walk_missing(next, &next_chain, good, report);
			}

			return;
		}

		report.missing.entry(dep.to_string()).or_default().push(chain.to_vec());
	}
}
