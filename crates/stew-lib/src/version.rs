//! Total ordering over package version strings.
//!
//! Versions follow a `[epoch:]pkgver[-pkgrel]` format.
//! - `epoch` overrides any comparison of the remaining parts and exists to
//! correct mistakes in upstream versioning schemes.
//! - `pkgver` can technically be *any* string.
//! - `pkgrel` counts rebuilds of the same upstream version and only
//! participates in a comparison when both sides carry one.

use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Version {
	epoch: i64,
	pkgver: String,
	pkgrel: Option<String>,
}

impl Version {
	pub fn new(version: &str) -> Self {
		let (epoch, rest) = match version.split_once(':') {
			Some((e, rest)) if !e.is_empty() && e.chars().all(|c| c.is_ascii_digit()) => {
				(e.parse::<i64>().unwrap_or(0), rest)
			}
			_ => (0, version),
		};

		let (pkgver, pkgrel) = match rest.rsplit_once('-') {
			Some((v, r)) if !r.is_empty() => (v.to_string(), Some(r.to_string())),
			_ => (rest.to_string(), None),
		};

		Version { epoch, pkgver, pkgrel }
	}
}

impl From<&str> for Version {
	fn from(value: &str) -> Self { Self::new(value) }
}

/// Compares two raw version strings.
pub fn vercmp(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	Version::new(lhs).cmp(&Version::new(rhs))
}

fn take_nondigits(s: &str) -> (&str, &str) {
	match s.find(|c: char| c.is_ascii_digit()) {
		Some(i) => s.split_at(i),
		None => (s, ""),
	}
}

fn take_digits(s: &str) -> (&str, &str) {
	match s.find(|c: char| !c.is_ascii_digit()) {
		Some(i) => s.split_at(i),
		None => (s, ""),
	}
}

/// An empty run counts as zero.
fn cmp_digit_runs(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	let lhs = lhs.trim_start_matches('0');
	let rhs = rhs.trim_start_matches('0');
	match lhs.len().cmp(&rhs.len()) {
		std::cmp::Ordering::Equal => lhs.cmp(rhs),
		ord => ord,
	}
}

/// Walks both strings in alternating non-digit/digit runs.
///
/// Non-digit runs compare lexically and digit runs numerically; when one side
/// reaches digits while the other still has letters the numeric side is the
/// newer one. If the walk exhausts one side the longer remainder wins.
fn cmp_segments(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	let mut lhs = lhs;
	let mut rhs = rhs;

	while !lhs.is_empty() && !rhs.is_empty() {
		let (la, lr) = take_nondigits(lhs);
		let (ra, rr) = take_nondigits(rhs);

		if la.is_empty() != ra.is_empty() {
			return if la.is_empty() { std::cmp::Ordering::Greater } else { std::cmp::Ordering::Less };
		}

		match la.cmp(ra) {
			std::cmp::Ordering::Equal => {}
			ord => return ord,
		}

		let (ld, lr) = take_digits(lr);
		let (rd, rr) = take_digits(rr);

		match cmp_digit_runs(ld, rd) {
			std::cmp::Ordering::Equal => {}
			ord => return ord,
		}

		lhs = lr;
		rhs = rr;
	}

	lhs.len().cmp(&rhs.len())
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.epoch.cmp(&other.epoch) {
			std::cmp::Ordering::Equal => {}
			ord => return ord,
		}

		match cmp_segments(&self.pkgver, &other.pkgver) {
			std::cmp::Ordering::Equal => {}
			ord => return ord,
		}

		match (&self.pkgrel, &other.pkgrel) {
			(Some(lhs), Some(rhs)) => cmp_segments(lhs, rhs),
			_ => std::cmp::Ordering::Equal,
		}
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.epoch.hash(state);
		self.pkgver.hash(state);
		self.pkgrel.hash(state);
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.epoch != 0 {
			write!(f, "{}:", self.epoch)?;
		}
		write!(f, "{}", self.pkgver)?;
		if let Some(rel) = &self.pkgrel {
			write!(f, "-{}", rel)?;
		}
		Ok(())
	}
}
