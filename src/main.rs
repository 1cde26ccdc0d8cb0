/// Binary entrypoint for the `ghost` executable.
///
/// Keeps the binary thin — all behavior lives in the `ghost_lib` crate so
/// unit tests can import library functions directly.
fn main() {
    std::process::exit(ghost_lib::run());
}
