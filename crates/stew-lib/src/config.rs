use serde::{Serialize, Deserialize};

/// Runtime options shared by every stew component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StewOptions {
	build_dir: std::path::PathBuf,
	data_dir: std::path::PathBuf,
	forge_url: String,
	discover_provides: bool,
	https_only: bool,
}

impl Default for StewOptions {
	fn default() -> Self {
		Self {
			build_dir: {
				#[cfg(target_os = "windows")]
				let path = std::path::PathBuf::from(std::env::var("APPDATA").expect("APPDATA misssing."));

				#[cfg(not(target_os = "windows"))]
				let path = if let Ok(e) = std::env::var("XDG_CACHE_HOME") {
					std::path::PathBuf::from(e)
				} else {
					std::path::PathBuf::from(std::env::var("HOME").expect("HOME environment variable not set.")).join(".cache")
				};

				path.join("stew").join("builds")
			},
			data_dir: {
				#[cfg(target_os = "windows")]
				let path = std::path::PathBuf::from(std::env::var("APPDATA").expect("APPDATA misssing."));

				#[cfg(not(target_os = "windows"))]
				let path = if let Ok(e) = std::env::var("XDG_DATA_HOME") {
					std::path::PathBuf::from(e)
				} else {
					std::path::PathBuf::from(std::env::var("HOME").expect("HOME environment variable not set.")).join(".local/share")
				};

				path.join("stew").join("data")
			},
			forge_url: "https://forge.example.org".to_string(),
			discover_provides: false,
			https_only: true,
		}
	}
}

impl StewOptions {
	pub fn load_from_disk() -> crate::Result<Self> {
		let options = Self::default();
		let f = std::fs::File::open(options.data_dir.join("config.json"))?;
		Ok(serde_json::from_reader::<_, Self>(f)?)
	}

	pub fn save_to_disk(&self) -> crate::Result<()> {
		std::fs::create_dir_all(&self.data_dir)?;
		let f = std::fs::File::create(self.data_dir.join("config.json"))?;
		serde_json::to_writer_pretty(f, self)?;
		Ok(())
	}

	pub fn build_dir(&self) -> &std::path::PathBuf {
		&self.build_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_build_dir(&mut self, build_dir: std::path::PathBuf) -> bool {
		if build_dir.is_dir() {
			self.build_dir = build_dir;
			true
		} else {
			false
		}
	}

	pub fn data_dir(&self) -> &std::path::PathBuf {
		&self.data_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_data_dir(&mut self, data_dir: std::path::PathBuf) -> bool {
		if data_dir.is_dir() {
			self.data_dir = data_dir;
			true
		} else {
			false
		}
	}

	pub fn forge_url(&self) -> &str {
		&self.forge_url
	}
	pub fn set_forge_url(&mut self, forge_url: String) {
		self.forge_url = forge_url;
	}

	pub fn discover_provides(&self) -> bool {
		self.discover_provides
	}
	pub fn set_discover_provides(&mut self, discover_provides: bool) {
		self.discover_provides = discover_provides;
	}

	pub fn https_only(&self) -> bool {
		self.https_only
	}
	pub fn set_https_only(&mut self, https_only: bool) {
		self.https_only = https_only;
	}
}
