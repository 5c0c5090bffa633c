//! The forge: a remote registry of source-built packages.
//!
//! Metadata is fetched over HTTP in batches and cached by the resolver for
//! the lifetime of a resolution. Several packages may share one source
//! `base`; fetching and building that base produces all of them.

use serde::{Serialize, Deserialize};

use crate::dependency::{pkg_satisfies, provide_satisfies};

/// Metadata record for one forge package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcePackage {
	pub name: String,
	/// The build unit this package belongs to. Multiple packages may share one base.
	pub base: String,
	pub version: String,
	#[serde(default)]
	pub description: Option<String>,
	/// Path of the source snapshot archive, relative to the forge URL.
	#[serde(default)]
	pub snapshot_url: Option<String>,
	#[serde(default)]
	pub sha256: Option<String>,
	#[serde(default)]
	pub depends: Vec<String>,
	#[serde(default)]
	pub make_depends: Vec<String>,
	#[serde(default)]
	pub check_depends: Vec<String>,
	#[serde(default)]
	pub provides: Vec<String>,
}

impl SourcePackage {
	/// True when this package, by name or through a provide entry, satisfies `dep`.
	pub fn satisfies(&self, dep: &str) -> bool {
		if pkg_satisfies(&self.name, &self.version, dep) {
			return true;
		}

		self.provides.iter().any(|provide| provide_satisfies(provide, dep))
	}

	/// Runtime, build and check dependencies in declaration order.
	pub fn all_depends(&self) -> impl Iterator<Item = &String> {
		self.depends.iter()
			.chain(self.make_depends.iter())
			.chain(self.check_depends.iter())
	}
}

/// Capabilities the resolver requires from the forge.
pub trait SourceRegistry: Sync {
	/// Fetches metadata for `names` in one batched call.
	///
	/// Names unknown to the forge are simply absent from the result.
	fn info(&self, names: &[String]) -> crate::Result<Vec<SourcePackage>>;

	/// Fuzzy name search, used only by provide discovery.
	fn search(&self, fragment: &str) -> crate::Result<Vec<SourcePackage>>;
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
	results: Vec<SourcePackage>,
}

/// `SourceRegistry` over the forge's HTTP API.
pub struct HttpRegistry {
	client: reqwest::blocking::Client,
	base_url: String,
}

impl HttpRegistry {
	pub fn new(options: &crate::StewOptions) -> crate::Result<Self> {
		let base_url = options.forge_url().trim_end_matches('/').to_string();

		if options.https_only() && !base_url.starts_with("https://") {
			return Err(crate::Error::Parse(format!("forge url is not https: {}", base_url)));
		}

		Ok(HttpRegistry {
			client: reqwest::blocking::Client::new(),
			base_url,
		})
	}
}

impl SourceRegistry for HttpRegistry {
	fn info(&self, names: &[String]) -> crate::Result<Vec<SourcePackage>> {
		if names.is_empty() {
			return Ok(Vec::new());
		}

		let query: Vec<(&str, &str)> = names.iter().map(|name| ("name", name.as_str())).collect();

		log::debug!("forge info request for {} name(s)", names.len());
		let response = self.client
			.get(format!("{}/api/info", self.base_url))
			.query(&query)
			.send()?
			.error_for_status()?
			.json::<InfoResponse>()?;

		Ok(response.results)
	}

	fn search(&self, fragment: &str) -> crate::Result<Vec<SourcePackage>> {
		log::debug!("forge search request for `{}`", fragment);
		let response = self.client
			.get(format!("{}/api/search", self.base_url))
			.query(&[("fragment", fragment)])
			.send()?
			.error_for_status()?
			.json::<InfoResponse>()?;

		Ok(response.results)
	}
}
