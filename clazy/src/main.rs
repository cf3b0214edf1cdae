//! Main binary entry point for the clazy check runner.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()` function
//! so that it behaves exactly like `clazy-cli`.

use anyhow::Result;

fn main() -> Result<()> {
    let code = clazy::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
