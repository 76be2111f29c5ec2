fn main() {
    if let Err(err) = astgen_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
