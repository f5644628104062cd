//! Entry point for the WASM application

pub fn main() {
    seisweb_frontend::start();
}
