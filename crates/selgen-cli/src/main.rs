fn main() {
    // `${VAR}` references in selgen.toml may come from a local .env file.
    dotenvy::dotenv().ok();

    if let Err(e) = selgen_cli::run(std::env::args().collect()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
