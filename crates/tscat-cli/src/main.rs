#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = tscat_cli::run_from_env() {
        eprintln!("tscat: {error}");
        std::process::exit(error.exit_code());
    }
}
