//! Version command

/// Run the version command.
pub fn run() {
    println!("kfo {}", env!("CARGO_PKG_VERSION"));
}
