//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

#[expect(
    clippy::print_stderr,
    reason = "Errors are reported on stderr before the logger may exist"
)]
fn main() {
    if let Err(err) = geonames_cli::run() {
        eprintln!("geonames: {err}");
        std::process::exit(1);
    }
}
