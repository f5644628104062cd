//! Seismic Detector - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend that uploads MiniSEED batches to the detection
//! job server, follows the job's progress and downloads the results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection (phase = Idle)                           │
//! │  ├── ProgressSection (phase = Processing / Failed)          │
//! │  ├── ResultsSection (phase = Completed)                     │
//! │  └── Toasts                                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation, polling and error reporting live in the `seisweb` client
//! crate; this crate only renders and provides the browser transport.
//!
//! # Modules
//!
//! - [`config`] - Backend URL and overrides
//! - [`types`] - Job phase and toast types
//! - [`components`] - UI components
//! - [`services`] - Job server communication (upload, status, download)

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use seisweb::SessionStore;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{JobPhase, Toast};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install the panic hook and logger, then mount [`App`] on `<body>`.
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 {} - Starting Leptos App", APP_NAME);

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let config = load_config();
    let sink = ToastSink::new(config.notification_duration);

    // Shared by every section below
    provide_context(config);
    provide_context(sink);
    provide_context(store_value(SessionStore::new()));

    let (phase, set_phase) = create_signal(JobPhase::Idle);

    view! {
        <div class="container">
            <Hero/>

            <Show
                when=move || phase.with(JobPhase::is_idle)
                fallback=|| view! { }
            >
                <UploadSection set_phase=set_phase/>
            </Show>

            <Show
                when=move || phase.with(|p| matches!(p, JobPhase::Processing(_) | JobPhase::Failed(..)))
                fallback=|| view! { }
            >
                <ProgressSection phase=phase set_phase=set_phase/>
            </Show>

            <ResultsSection phase=phase set_phase=set_phase/>
        </div>

        <Toasts/>
        <Footer/>
    }
}
