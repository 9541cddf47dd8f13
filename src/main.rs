fn main() {
    if let Err(err) = popmap::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
