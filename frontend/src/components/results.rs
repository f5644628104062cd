//! Results of a finished job: view, download, delete.

use leptos::*;
use seisweb::session::keys;
use seisweb::{report, ClientConfig, Endpoints, JobId, SessionStore, Severity, UiSink};

use crate::components::ToastSink;
use crate::services::{cleanup_job, download_results};
use crate::types::JobPhase;

#[component]
pub fn ResultsSection(phase: ReadSignal<JobPhase>, set_phase: WriteSignal<JobPhase>) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let sink = expect_context::<ToastSink>();
    let session = expect_context::<StoredValue<SessionStore>>();
    let endpoints = store_value(Endpoints::new(&config.backend_url));

    let (download_pct, set_download_pct) = create_signal(None::<f64>);
    let (is_downloading, set_is_downloading) = create_signal(false);
    let (is_deleting, set_is_deleting) = create_signal(false);

    let completed_job = move || {
        phase.with(|p| match p {
            JobPhase::Completed(id) => Some(id.clone()),
            _ => None,
        })
    };
    let current_job = move || phase.with_untracked(|p| p.job_id().cloned());

    let on_download = move |_| {
        let Some(job_id) = current_job() else {
            return;
        };
        set_is_downloading.set(true);
        spawn_local(async move {
            let result = download_results(&endpoints.get_value(), &job_id, |progress| {
                set_download_pct.set(progress.percentage());
            })
            .await;
            set_is_downloading.set(false);
            set_download_pct.set(None);

            match result {
                Ok(file_name) => sink.notify(&format!("Downloaded {}", file_name), Severity::Success),
                Err(err) => report(&sink, &err),
            }
        });
    };

    let on_delete = move |_| {
        let Some(job_id) = current_job() else {
            return;
        };
        set_is_deleting.set(true);
        spawn_local(async move {
            let result = cleanup_job(&endpoints.get_value(), &job_id).await;
            set_is_deleting.set(false);

            match result {
                Ok(message) => {
                    let text = if message.is_empty() { "Job files deleted".to_string() } else { message };
                    sink.notify(&text, Severity::Info);
                    forget_job(session, &job_id);
                    set_phase.set(JobPhase::Idle);
                }
                Err(err) => report(&sink, &err),
            }
        });
    };

    let download_label = move || match download_pct.get() {
        Some(pct) => format!("Downloading... {:.0}%", pct),
        None if is_downloading.get() => "Downloading...".to_string(),
        None => "Download results (.zip)".to_string(),
    };

    view! {
        <Show when=move || completed_job().is_some()>
            <div class="results-section show" id="resultsSection">
                <h3>"✅ Detection finished"</h3>
                <a
                    class="results-link"
                    target="_blank"
                    href=move || completed_job().map(|id| endpoints.with_value(|e| e.results(&id))).unwrap_or_default()
                >
                    "View results"
                </a>
                <button
                    class="upload-button primary"
                    disabled=move || is_downloading.get()
                    on:click=on_download
                >
                    {download_label}
                </button>
                <button
                    class="upload-button danger"
                    disabled=move || is_deleting.get()
                    on:click=on_delete
                >
                    "Delete job files"
                </button>
                <button class="upload-button" on:click=move |_| set_phase.set(JobPhase::Idle)>
                    "New analysis"
                </button>
            </div>
        </Show>
    }
}

fn forget_job(session: StoredValue<SessionStore>, job_id: &JobId) {
    session.update_value(|s| {
        if s.get::<JobId>(keys::LAST_JOB).as_ref() == Some(job_id) {
            s.remove(keys::LAST_JOB);
        }
    });
}
