//! Dependency strings, install targets and satisfier matching.
//!
//! A dependency string has the form `name[op version]`, e.g. `openssl>=3.0`.
//! An install target additionally allows a source qualifier prefix,
//! `[repo/]name[op version]`; the reserved qualifier [`FORGE_REPO`] restricts
//! a target to the forge.

use crate::version::vercmp;

/// Source qualifier selecting the forge instead of a sync repo.
pub const FORGE_REPO: &str = "forge";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConstraintOp {
	#[default] Any,
	Eq,
	Lt,
	Le,
	Gt,
	Ge,
}

impl ConstraintOp {
	/// Unrecognized operator runs behave as `Any`, matching how an
	/// unconstrained comparison always succeeds.
	pub fn parse(op: &str) -> Self {
		match op {
			"=" => ConstraintOp::Eq,
			"<" => ConstraintOp::Lt,
			"<=" => ConstraintOp::Le,
			">" => ConstraintOp::Gt,
			">=" => ConstraintOp::Ge,
			_ => ConstraintOp::Any,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ConstraintOp::Any => "",
			ConstraintOp::Eq => "=",
			ConstraintOp::Lt => "<",
			ConstraintOp::Le => "<=",
			ConstraintOp::Gt => ">",
			ConstraintOp::Ge => ">=",
		}
	}
}

impl std::fmt::Display for ConstraintOp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Splits a dependency string on the first occurrence of a comparison
/// character; consecutive comparison characters form the operator token.
///
/// An operator without a trailing version degrades to an unconstrained match.
pub fn split_dep(dep: &str) -> (&str, ConstraintOp, &str) {
	let is_op_char = |c: char| c == '<' || c == '>' || c == '=';

	match dep.find(is_op_char) {
		Some(start) => {
			let name = &dep[..start];
			let rest = &dep[start..];
			let end = rest.find(|c| !is_op_char(c)).unwrap_or(rest.len());
			let version = &rest[end..];
			if version.is_empty() {
				(name, ConstraintOp::Any, "")
			} else {
				(name, ConstraintOp::parse(&rest[..end]), version)
			}
		}
		None => (dep, ConstraintOp::Any, ""),
	}
}

/// True when `ver1` stands in relation `op` to `ver2`.
pub fn ver_satisfies(ver1: &str, op: ConstraintOp, ver2: &str) -> bool {
	use std::cmp::Ordering::*;

	match op {
		ConstraintOp::Any => true,
		ConstraintOp::Eq => vercmp(ver1, ver2) == Equal,
		ConstraintOp::Lt => vercmp(ver1, ver2) == Less,
		ConstraintOp::Le => vercmp(ver1, ver2) != Greater,
		ConstraintOp::Gt => vercmp(ver1, ver2) == Greater,
		ConstraintOp::Ge => vercmp(ver1, ver2) != Less,
	}
}

/// True when a package called `name` at `version` satisfies `dep`.
pub fn pkg_satisfies(name: &str, version: &str, dep: &str) -> bool {
	let (dep_name, dep_op, dep_version) = split_dep(dep);

	if dep_name.is_empty() || dep_name != name {
		return false;
	}

	ver_satisfies(version, dep_op, dep_version)
}

/// True when a provide entry satisfies `dep`.
///
/// An unversioned provide can not satisfy a versioned dependency.
pub fn provide_satisfies(provide: &str, dep: &str) -> bool {
	let (dep_name, dep_op, dep_version) = split_dep(dep);
	let (provide_name, provide_op, provide_version) = split_dep(provide);

	if dep_name.is_empty() || provide_name != dep_name {
		return false;
	}

	if provide_op == ConstraintOp::Any && dep_op != ConstraintOp::Any {
		return false;
	}

	ver_satisfies(provide_version, dep_op, dep_version)
}

/// A user-specified package reference, optionally qualified by source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
	pub repo: Option<String>,
	pub name: String,
	pub op: ConstraintOp,
	pub version: String,
}

impl Target {
	pub fn parse(pkg: &str) -> Self {
		let (repo, dep) = match pkg.split_once('/') {
			Some((repo, dep)) if !repo.is_empty() => (Some(repo.to_string()), dep),
			_ => (None, pkg),
		};

		let (name, op, version) = split_dep(dep);

		Target {
			repo,
			name: name.to_string(),
			op,
			version: version.to_string(),
		}
	}

	pub fn is_forge_only(&self) -> bool {
		self.repo.as_deref() == Some(FORGE_REPO)
	}

	/// The unqualified dependency string for this target.
	pub fn dep_string(&self) -> String {
		format!("{}{}{}", self.name, self.op, self.version)
	}
}

impl std::fmt::Display for Target {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if let Some(repo) = &self.repo {
			write!(f, "{}/", repo)?;
		}
		write!(f, "{}", self.dep_string())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn split_dep_unversioned() {
		assert_eq!(split_dep("openssl"), ("openssl", ConstraintOp::Any, ""));
	}

	#[test]
	fn split_dep_multichar_op() {
		assert_eq!(split_dep("openssl>=3.0"), ("openssl", ConstraintOp::Ge, "3.0"));
		assert_eq!(split_dep("openssl<=3.0"), ("openssl", ConstraintOp::Le, "3.0"));
	}

	#[test]
	fn split_dep_trailing_op_is_unconstrained() {
		assert_eq!(split_dep("openssl>="), ("openssl", ConstraintOp::Any, ""));
	}

	#[test]
	fn pkg_satisfies_respects_name_and_version() {
		assert!(pkg_satisfies("foo", "2.0", "foo>=1.0"));
		assert!(!pkg_satisfies("foo", "0.9", "foo>=1.0"));
		assert!(!pkg_satisfies("bar", "2.0", "foo>=1.0"));
	}

	#[test]
	fn empty_dep_matches_nothing() {
		assert!(!pkg_satisfies("foo", "1.0", ""));
		assert!(!provide_satisfies("foo=1.0", ""));
	}

	#[test]
	fn names_are_case_sensitive() {
		assert!(!pkg_satisfies("Foo", "1.0", "foo"));
	}

	#[test]
	fn unversioned_provide_cannot_satisfy_versioned_dep() {
		assert!(!provide_satisfies("foo", "foo>=2.0"));
		assert!(provide_satisfies("foo", "foo"));
	}

	#[test]
	fn versioned_provide_satisfies_within_bounds() {
		assert!(provide_satisfies("foo=2.0", "foo>=1.0"));
		assert!(!provide_satisfies("foo=2.0", "foo>=3.0"));
		assert!(provide_satisfies("foo=2.0", "foo"));
	}

	#[test]
	fn target_parse_with_repo_hint() {
		let t = Target::parse("extra/foo>=1.0");
		assert_eq!(t.repo.as_deref(), Some("extra"));
		assert_eq!(t.name, "foo");
		assert_eq!(t.dep_string(), "foo>=1.0");
		assert_eq!(t.to_string(), "extra/foo>=1.0");
	}

	#[test]
	fn target_parse_forge_hint() {
		assert!(Target::parse("forge/foo").is_forge_only());
		assert!(!Target::parse("foo").is_forge_only());
	}
}
