fn main() {
    if let Err(e) = latchbench::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
