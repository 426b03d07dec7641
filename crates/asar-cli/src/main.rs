use std::{env, process};

use log::{error, info};

mod app;
mod commands;
mod keys;

use keys::key_names;

fn main() {
	let keys = keys::build_keys();
	let app = app::build_app(keys);
	let commands = commands::build_commands();

	let matches = app.get_matches();

	let verbose = matches.is_present(key_names::VERBOSE)
		|| matches
			.subcommand()
			.map(|(_, args)| args.is_present(key_names::VERBOSE))
			.unwrap_or(false);

	if verbose {
		env::set_var("RUST_LOG", "debug");
	} else if env::var("RUST_LOG").is_err() {
		// log level not explicitly set by the user
		env::set_var("RUST_LOG", "info");
	}
	pretty_env_logger::init();

	let (name, args) = match matches.subcommand() {
		Some(command) => command,
		None => {
			error!("No subcommand specified, see `asar --help`");
			process::exit(1);
		},
	};

	let command = match commands.get(name) {
		Some(command) => command,
		None => {
			error!("Unknown subcommand: {}", name);
			process::exit(1);
		},
	};

	match command.evaluate(args) {
		Ok(()) => info!("Done"),
		Err(err) => {
			error!("{}", err);
			process::exit(1);
		},
	}
}
