//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Seismic Event Detector"</h1>
            <p class="subtitle">
                "Upload MiniSEED recordings to detect earthquakes and pick P and S phases. "
                "Choose the analysis window and the model weights, then follow the job until the results are ready."
            </p>
        </div>
    }
}
