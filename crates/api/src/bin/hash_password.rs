//! Print an `ADMIN_PASSWORD_HASH` value for a password read from stdin.
//!
//! ```text
//! printf '%s\n' 'operator password' | agency-hash-password
//! ```

use std::io::{self, BufRead};
use std::process::ExitCode;

use agency_api::auth::password::hash_operator_password;

fn main() -> ExitCode {
    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        eprintln!("Failed to read password from stdin: {e}");
        return ExitCode::FAILURE;
    }

    match hash_operator_password(&line) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
