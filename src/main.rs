use pipeshell::Interpreter;

fn main() {
    let mut shell = Interpreter::new();
    // A failed editor setup is the one unrecoverable error: there is no
    // degraded mode without a line reader.
    if let Err(e) = shell.repl() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
