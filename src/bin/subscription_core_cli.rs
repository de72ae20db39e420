use std::{env, process};

use subscription_core::{
    cli::{run_cli, usage, CliError},
    init,
};

fn main() {
    init();

    if let Err(err) = run_cli(env::args().skip(1)) {
        eprintln!("Error: {err}");
        if matches!(err, CliError::Usage(_)) {
            eprintln!("{}", usage());
        }
        process::exit(1);
    }
}
