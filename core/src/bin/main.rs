/// accessflow CLI
///
/// Runs sessions and scripted scenarios against a flow graph from the shell,
/// which is handy for checking a graph change before shipping it.

use accessflow_core::cli;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
