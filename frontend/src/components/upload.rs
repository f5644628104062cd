//! MiniSEED batch selection and upload.
//!
//! Files are validated as soon as they are picked so the user sees every
//! problem before pressing upload; the same check runs again on submit.

use leptos::*;
use seisweb::config::{MAX_WINDOW_MINUTES, MIN_WINDOW_MINUTES};
use seisweb::session::keys;
use seisweb::{
    format_file_size, report, ClientConfig, ClientError, Dataset, Endpoints, FileCandidate, FileValidator,
    SessionStore, Severity, UiSink, UploadOptions, WindowLength,
};
use web_sys::{Event, File, HtmlInputElement};

use crate::components::ToastSink;
use crate::services::{candidate, selected_files, upload_files};
use crate::types::JobPhase;

#[component]
pub fn UploadSection(set_phase: WriteSignal<JobPhase>) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let sink = expect_context::<ToastSink>();
    let session = expect_context::<StoredValue<SessionStore>>();

    let accept = config.validator.accept_attribute();
    let max_total = config.validator.max_total_size_bytes;
    let validator = store_value(FileValidator::new(config.validator.clone()));
    let endpoints = store_value(Endpoints::new(&config.backend_url));

    // Restore the last choices made in this session
    let initial_window: WindowLength = session.with_value(|s| s.get(keys::WINDOW_LENGTH)).unwrap_or_default();
    let initial_dataset: Dataset = session.with_value(|s| s.get(keys::DATASET)).unwrap_or_default();

    let (files, set_files) = create_signal(Vec::<File>::new());
    let (candidates, set_candidates) = create_signal(Vec::<FileCandidate>::new());
    let (errors, set_errors) = create_signal(Vec::<String>::new());
    let (window_input, set_window_input) = create_signal(initial_window.to_string());
    let (dataset, set_dataset) = create_signal(initial_dataset);
    let (is_uploading, set_is_uploading) = create_signal(false);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let selected = selected_files(&input);
        let picked: Vec<FileCandidate> = selected.iter().map(candidate).collect();

        let result = validator.with_value(|v| v.validate(&picked));
        let messages = result.messages();
        for message in &messages {
            sink.notify(message, Severity::Warning);
        }

        set_errors.set(messages);
        set_candidates.set(picked);
        set_files.set(selected);
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let window_length = match window_input.get_untracked().parse::<WindowLength>() {
            Ok(window_length) => window_length,
            Err(e) => {
                sink.notify(&e.to_string(), Severity::Warning);
                set_errors.set(vec![e.to_string()]);
                return;
            }
        };
        let options = UploadOptions {
            window_length,
            dataset: dataset.get_untracked(),
        };

        session.update_value(|s| {
            let saved = s.set(keys::WINDOW_LENGTH, &options.window_length);
            if let Err(e) = saved.and_then(|_| s.set(keys::DATASET, &options.dataset)) {
                log::warn!("Could not remember upload options: {}", e);
            }
        });

        let selected = files.get_untracked();
        set_is_uploading.set(true);

        spawn_local(async move {
            let result = upload_files(&endpoints.get_value(), &validator.get_value(), &selected, &options).await;
            set_is_uploading.set(false);

            match result {
                Ok(response) => {
                    sink.notify(&response.message, Severity::Success);
                    session.update_value(|s| {
                        if let Err(e) = s.set(keys::LAST_JOB, &response.job_id) {
                            log::warn!("Could not remember job id: {}", e);
                        }
                    });
                    set_errors.set(Vec::new());
                    set_phase.set(JobPhase::Processing(response.job_id));
                }
                Err(err) => {
                    if let ClientError::Validation(reasons) = &err {
                        set_errors.set(reasons.iter().map(ToString::to_string).collect());
                    }
                    report(&sink, &err);
                }
            }
        });
    };

    let summary = move || {
        candidates.with(|list| {
            let total: u64 = list.iter().map(|c| c.size).sum();
            format!("{} file(s), {}", list.len(), format_file_size(total))
        })
    };

    view! {
        <form class="upload-section" id="uploadForm" on:submit=on_submit>
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_uploading.get() {
                    "⏳ Uploading files..."
                } else {
                    "Select MiniSEED files to analyse"
                }}
            </div>
            <div class="upload-hint">
                "Accepted: " {accept.clone()} " · up to " {format_file_size(max_total)} " per batch"
            </div>

            <input
                type="file"
                id="fileInput"
                multiple=true
                accept=accept
                style="display:none"
                on:change=on_file_change
            />
            <label for="fileInput" class="upload-button">"Choose files"</label>

            <Show when=move || candidates.with(|list| !list.is_empty())>
                <ul class="file-list">
                    <For
                        each=move || candidates.get().into_iter().enumerate()
                        key=|(idx, c)| format!("{}-{}", idx, c.name)
                        children=|(_, c)| view! {
                            <li>{c.name.clone()} " (" {format_file_size(c.size)} ")"</li>
                        }
                    />
                </ul>
                <div class="file-summary">{summary}</div>
            </Show>

            <Show when=move || errors.with(|list| !list.is_empty())>
                <div class="error-message">
                    <For
                        each=move || errors.get().into_iter().enumerate()
                        key=|(idx, message)| (*idx, message.clone())
                        children=|(_, message)| view! { <div>{message}</div> }
                    />
                </div>
            </Show>

            <div class="upload-options">
                <label>
                    "Window length (minutes)"
                    <input
                        type="number"
                        min=MIN_WINDOW_MINUTES.to_string()
                        max=MAX_WINDOW_MINUTES.to_string()
                        prop:value=move || window_input.get()
                        on:input=move |ev| set_window_input.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Model weights"
                    <select on:change=move |ev| {
                        match event_target_value(&ev).parse::<Dataset>() {
                            Ok(choice) => set_dataset.set(choice),
                            Err(e) => log::warn!("{}", e),
                        }
                    }>
                        {Dataset::ALL
                            .into_iter()
                            .map(|d| view! {
                                <option value=d.as_str() selected=move || dataset.get() == d>{d.label()}</option>
                            })
                            .collect_view()}
                    </select>
                </label>
            </div>

            <button
                type="submit"
                class="upload-button primary"
                disabled=move || is_uploading.get() || files.with(|list| list.is_empty())
            >
                {move || if is_uploading.get() { "Uploading..." } else { "Upload and analyse" }}
            </button>
        </form>
    }
}
