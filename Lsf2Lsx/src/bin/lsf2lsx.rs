fn main() {
    if let Err(e) = lsf2lsx::cli::run_cli() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
