//! sift: terminal viewer for conversation transcripts.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
