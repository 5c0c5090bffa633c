//! Downloads and unpacks source snapshots for ordered bases.
//!
//! Building and installing the unpacked sources is the build tool's job, not
//! stew's; this module only materializes the build directories.

use thiserror::Error;

use crate::StewOptions;
use crate::resolver::InstallOrder;

#[derive(Debug, Error)]
pub enum SnapshotError {
	/// The forge record carries no snapshot path for this base.
	#[error("base has no snapshot information")]
	MissingSnapshotFields,
	#[error("snapshot digest does not match the forge record")]
	DigestMismatch,
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

pub fn get_snapshot_path(options: &StewOptions, base: &str) -> std::path::PathBuf {
	options.build_dir().join(format!("{}.tar.gz", base))
}

pub fn get_build_path(options: &StewOptions, base: &str) -> std::path::PathBuf {
	options.build_dir().join(base)
}

/// Downloads every ordered base's snapshot and unpacks it into the build dir.
///
/// # Arguments
/// - `options` - Required for build directory layout.
/// - `client` - Client to download snapshots with.
/// - `forge_url` - Base URL the records' snapshot paths are relative to.
/// - `order` - A completed install order; bases are fetched in plan order.
/// - `force` - Redownload and unpack even when the build directory exists.
pub async fn download_snapshots<'order>(
	options: &StewOptions,
	client: &reqwest::Client,
	forge_url: &str,
	order: &'order InstallOrder,
	force: bool,
) -> Vec<(&'order str, Result<std::path::PathBuf, SnapshotError>)> {
	let mut results = Vec::<(&str, Result<std::path::PathBuf, SnapshotError>)>::new();

	for base in &order.base_order {
		let build_path = get_build_path(options, base);

		if build_path.exists() && !force {
			log::debug!("build files for {} already present, skipping.", base);
			results.push((base, Ok(build_path)));
			continue;
		}

		/* every package of a base shares the base's snapshot; the first
		 * record carries everything needed */
		let record = order.bases.get(base.as_str()).and_then(|packages| packages.first());

		let snapshot_path = match record.and_then(|pkg| pkg.snapshot_url.as_deref()) {
			Some(path) => path,
			None => {
				results.push((base, Err(SnapshotError::MissingSnapshotFields)));
				continue;
			}
		};

		let url = format!("{}/{}", forge_url.trim_end_matches('/'), snapshot_path.trim_start_matches('/'));

		log::info!("downloading snapshot for {} from {}", base, url);
		results.push((base, fetch_and_unpack(options, client, base, &url, record.and_then(|pkg| pkg.sha256.as_deref())).await));
	}

	results
}

async fn fetch_and_unpack(
	options: &StewOptions,
	client: &reqwest::Client,
	base: &str,
	url: &str,
	digest: Option<&str>,
) -> Result<std::path::PathBuf, SnapshotError> {
	let data = client
		.get(url)
		.send()
		.await?
		.error_for_status()?
		.bytes()
		.await?
		.to_vec();

	verify_digest(&data, digest)?;

	let snapshot_path = get_snapshot_path(options, base);
	tokio::fs::create_dir_all(options.build_dir()).await?;
	tokio::fs::write(&snapshot_path, &data).await?;

	log::info!("unpacking snapshot for {}", base);
	let gz = flate2::read::GzDecoder::new(data.as_slice());
	tar::Archive::new(gz).unpack(options.build_dir())?;

	Ok(get_build_path(options, base))
}

fn verify_digest(data: &[u8], expected: Option<&str>) -> Result<(), SnapshotError> {
	match expected {
		Some(expected) if sha256::digest(data) != expected => Err(SnapshotError::DigestMismatch),
		_ => Ok(()),
	}
}
