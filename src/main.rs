//! Airways entry point.

fn main() {
    airways::run();
}
