//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>"Seismic Event Detector • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href="https://ds.iris.edu/ds/nodes/dmc/data/formats/miniseed/" class="footer-link" target="_blank">
                    "MiniSEED format"
                </a>
                <a href="https://github.com/smousavi05/STEAD" class="footer-link" target="_blank">
                    "STEAD dataset"
                </a>
            </div>
        </footer>
    }
}
