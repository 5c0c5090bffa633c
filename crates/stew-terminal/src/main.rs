use std::io::Write;

use stew::forge::SourcePackage;
use stew::resolver::{InstallOrder, ProviderPicker};

/// Presents provider choices on the terminal, first candidate by default.
struct TerminalPicker;

impl ProviderPicker for TerminalPicker {
	fn pick(&self, dep: &str, candidates: &[&SourcePackage]) -> usize {
		println!("There are {} providers available for {}:", candidates.len(), dep);
		for (i, pkg) in candidates.iter().enumerate() {
			println!("{:3}) {} {} ({})", i + 1, pkg.name, pkg.version, pkg.base);
		}

		match read_line("Enter a number (default 1): ") {
			Some(line) => match line.trim().parse::<usize>() {
				Ok(n) if n >= 1 && n <= candidates.len() => n - 1,
				_ => 0,
			},
			None => 0,
		}
	}
}

fn read_line(prompt: &str) -> Option<String> {
	print!("{}", prompt);
	std::io::stdout().flush().ok()?;

	let mut line = String::new();
	std::io::stdin().read_line(&mut line).ok()?;
	Some(line)
}

fn continue_task(question: &str) -> bool {
	match read_line(&format!("{} [Y/n] ", question)) {
		Some(line) => !line.trim().eq_ignore_ascii_case("n"),
		None => false,
	}
}

fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag("h", "help",     "Show help");
		opts.optflag("f", "force",    "Redownload snapshots even when build files exist");
		opts.optflag("p", "provides", "Search the forge for packages providing unmatched names");
		opts.optflag("n", "noconfirm", "Never ask for confirmation");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m) => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: stew [options] install <target>..."));
			return;
		}

		parsed_options
	};

	let mut config = stew::StewOptions::load_from_disk().unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		stew::StewOptions::default()
	});

	if parsed_options.opt_present("p") {
		config.set_discover_provides(true);
	}

	if parsed_options.free.is_empty() {
		eprintln!("No operation given, see --help.");
		return;
	}

	if parsed_options.free[0] == "install" {
		let targets: Vec<String> = parsed_options.free[1..].to_vec();
		if targets.is_empty() {
			log::error!("No targets given.");
			return;
		}

		let db = match stew::LocalDb::load_from_disk(&config) {
			Ok(db) => db,
			Err(e) => {
				log::error!("Failed to open the local database: {}", e);
				log::error!("Sync your repos first so stew has a database snapshot to plan against.");
				return;
			}
		};

		let registry = match stew::HttpRegistry::new(&config) {
			Ok(registry) => registry,
			Err(e) => { log::error!("Bad forge configuration: {}", e); return }
		};

		let picker = TerminalPicker;
		let pool = match stew::resolver::resolve(&targets, &db, &registry, &config, &picker) {
			Ok(pool) => pool,
			Err(e) => { log::error!("Failed to resolve targets: {}", e); return }
		};

		println!("{}", pool);

		let missing = pool.check_missing();
		if !missing.is_empty() {
			eprintln!("Could not satisfy all dependencies:");
			eprint!("{}", missing);
			return;
		}

		let order = InstallOrder::from_pool(&pool);
		println!("{}", order);

		if order.has_make_only() {
			println!("Make-only packages can be removed after building: {}", order.get_make_only().join(" "));
		}

		if order.base_order.is_empty() {
			println!("Nothing to build; the plan is repo packages and groups only.");
			return;
		}

		if !parsed_options.opt_present("n") && !continue_task("Proceed with snapshot download?") {
			println!("Aborting due to user.");
			return;
		}

		let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
			Ok(runtime) => runtime,
			Err(e) => { log::error!("Failed to start the async runtime: {}", e); return }
		};

		let client = reqwest::Client::new();
		let results = runtime.block_on(stew::snapshot::download_snapshots(
			&config,
			&client,
			config.forge_url(),
			&order,
			parsed_options.opt_present("f"),
		));

		let mut failed = false;
		for (base, result) in results {
			match result {
				Ok(path) => println!("Build files for {} ready at {}", base, path.display()),
				Err(e) => { failed = true; log::error!("Snapshot for {} failed: {}", base, e) }
			}
		}

		if failed {
			eprintln!("Some snapshots failed; fix the errors above and rerun.");
			return;
		}

		println!("Plan complete. Build each base in the order listed, then install the repo packages.");
	} else {
		eprintln!("Unknown operation `{}`, see --help.", parsed_options.free[0]);
	}
}
