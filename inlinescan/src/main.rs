//! Main binary entry point for the `inlinescan` repeated-subgraph scanner.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Delegate to the shared entry_point function.
    // Note: We avoid std::process::exit() to allow LLVM profile data flush for PGO builds
    match inlinescan::entry_point::run_with_args(std::env::args().skip(1).collect()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
