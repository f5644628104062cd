//! Live progress of the current detection job.

use leptos::*;
use seisweb::models::DEFAULT_PROGRESS_MESSAGE;
use seisweb::{
    report, ClientConfig, ClientError, Endpoints, JobId, PollOutcome, ProgressBand, ProgressPoller,
    ProgressSnapshot, Severity, UiSink,
};

use crate::components::ToastSink;
use crate::services::{FetchStatusSource, GlooTimer};
use crate::types::JobPhase;

#[component]
pub fn ProgressSection(phase: ReadSignal<JobPhase>, set_phase: WriteSignal<JobPhase>) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let sink = expect_context::<ToastSink>();
    let (snapshot, set_snapshot) = create_signal(None::<ProgressSnapshot>);

    let source = FetchStatusSource::new(Endpoints::new(&config.backend_url));
    let poller = store_value(ProgressPoller::new(source, GlooTimer).with_interval(config.poll_interval));

    // Start polling whenever a job enters processing; stop on any other phase
    create_effect(move |_| match phase.get() {
        JobPhase::Processing(job_id) => {
            set_snapshot.set(None);
            poller.update_value(|p| {
                let on_update = move |s: &ProgressSnapshot| set_snapshot.set(Some(s.clone()));
                let on_finish = finish_handler(job_id.clone(), sink, set_phase);
                let task = p.start(job_id, on_update, on_finish);
                spawn_local(async move {
                    let outcome = task.await;
                    log::debug!("Poll task ended: {:?}", outcome);
                });
            });
        }
        _ => {
            poller.try_update_value(|p| p.stop());
        }
    });

    on_cleanup(move || {
        poller.try_update_value(|p| p.stop());
    });

    let percentage = move || snapshot.with(|s| s.as_ref().map_or(0.0, |s| s.percentage));
    let band = move || snapshot.with(|s| s.as_ref().map_or(ProgressBand::Low, ProgressSnapshot::band));
    let message = move || {
        snapshot.with(|s| {
            s.as_ref()
                .map_or_else(|| DEFAULT_PROGRESS_MESSAGE.to_string(), |s| s.message.clone())
        })
    };
    let failure = move || {
        phase.with(|p| match p {
            JobPhase::Failed(_, reason) => Some(reason.clone()),
            _ => None,
        })
    };
    let job_label = move || phase.with(|p| p.job_id().map(ToString::to_string).unwrap_or_default());

    view! {
        <div class="progress-section show" id="progressSection">
            <div class="progress-job">"Job " <code>{job_label}</code></div>
            <div class="progress-bar">
                <div
                    class=move || format!("progress-fill {}", band().css_class())
                    id="progressFill"
                    style:width=move || format!("{:.0}%", percentage())
                ></div>
            </div>
            <div class="progress-text">{move || format!("{:.0}%", percentage())}</div>
            <div class="progress-message">{message}</div>

            <Show when=move || failure().is_some()>
                <div class="error-message">{move || failure().unwrap_or_default()}</div>
                <button class="upload-button" on:click=move |_| set_phase.set(JobPhase::Idle)>
                    "Start over"
                </button>
            </Show>
        </div>
    }
}

/// Turns the end of a polling run into a phase change and a notification.
fn finish_handler(
    job_id: JobId,
    sink: ToastSink,
    set_phase: WriteSignal<JobPhase>,
) -> impl FnOnce(PollOutcome) + 'static {
    move |outcome| match outcome {
        PollOutcome::Completed(snapshot) => match snapshot.error_message {
            Some(reason) => {
                sink.notify(&reason, Severity::Error);
                set_phase.set(JobPhase::Failed(job_id, reason));
            }
            None => {
                sink.notify("Processing complete", Severity::Success);
                set_phase.set(JobPhase::Completed(job_id));
            }
        },
        PollOutcome::Failed(err) => {
            let reason = err.user_message();
            report(&sink, &ClientError::Poll(err));
            set_phase.set(JobPhase::Failed(job_id, reason));
        }
        PollOutcome::Stopped => {}
    }
}
