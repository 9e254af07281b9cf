use std::ops::{Deref, DerefMut};

use tracing::{debug, instrument, warn};

use crate::client::{AnalysisClient, AnalysisResponse};
use crate::error::{TransportError, UploadError};
use crate::model::{AnalysisRequest, FindingCategory, UploadedFile};
use crate::render::{render, ResultsView};
use crate::surface::{Notice, Surface};
use crate::taxonomy::Taxonomy;

/// Lifecycle of one upload.
///
/// `Validating` and `Submitting` are passed through inside a single
/// `Submit` dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    AwaitingResponse,
    Displaying,
    Failed,
}

/// Inputs to the controller's state machine.
#[derive(Debug)]
pub enum Event {
    /// A file arrived from the picker or a drop.
    Submit(UploadedFile),
    /// The in-flight analysis finished.
    Completed(Result<AnalysisResponse, TransportError>),
    /// "Scan again" after results were shown.
    ScanAgain,
    /// The user dismissed a transport failure.
    Acknowledge,
    ToggleSection(FindingCategory),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::Completed(_) => "completed",
            Self::ScanAgain => "scan_again",
            Self::Acknowledge => "acknowledge",
            Self::ToggleSection(_) => "toggle_section",
        }
    }
}

/// What a dispatch did.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// The request must be sent and its outcome fed back as [`Event::Completed`].
    Dispatched(AnalysisRequest),
    Rejected(UploadError),
    /// The event is not valid in the current phase.
    Ignored,
    Displayed,
    AnalysisFailed(String),
    TransportFailed,
    Reset,
    Toggled,
}

/// Clears the busy indicator when dropped.
struct BusyGuard<'a, S: Surface> {
    surface: &'a mut S,
}

impl<'a, S: Surface> BusyGuard<'a, S> {
    fn new(surface: &'a mut S) -> Self {
        Self { surface }
    }
}

impl<S: Surface> Deref for BusyGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for BusyGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_busy(false);
    }
}

/// Owns the upload state machine and the surface it projects onto.
///
/// Only one request can be outstanding: `Submit` is ignored outside `Idle`.
pub struct UploadController<S: Surface> {
    surface: S,
    taxonomy: Taxonomy,
    phase: Phase,
    view: Option<ResultsView>,
}

impl<S: Surface> UploadController<S> {
    pub fn new(surface: S) -> Self {
        Self::with_taxonomy(surface, Taxonomy::standard())
    }

    pub fn with_taxonomy(mut surface: S, taxonomy: Taxonomy) -> Self {
        surface.set_busy(false);
        surface.set_intake_visible(true);
        Self {
            surface,
            taxonomy,
            phase: Phase::Idle,
            view: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The results currently on display, including toggle state.
    pub fn view(&self) -> Option<&ResultsView> {
        self.view.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    #[instrument(name = "dispatch", skip(self, event), fields(event = event.name(), phase = ?self.phase))]
    pub fn dispatch(&mut self, event: Event) -> Transition {
        match (self.phase, event) {
            (Phase::Idle, Event::Submit(file)) => self.submit(file),
            (Phase::AwaitingResponse, Event::Completed(outcome)) => self.complete(outcome),
            (Phase::Displaying, Event::ScanAgain) | (Phase::Failed, Event::Acknowledge) => {
                self.reset_to_idle()
            }
            (Phase::Displaying, Event::ToggleSection(category)) => self.toggle(category),
            (phase, event) => {
                debug!(?phase, event = event.name(), "event ignored");
                Transition::Ignored
            }
        }
    }

    /// Submit `file`, send it with `client`, and apply the outcome.
    pub async fn run<C>(&mut self, file: UploadedFile, client: &C) -> Transition
    where
        C: AnalysisClient + ?Sized,
    {
        match self.dispatch(Event::Submit(file)) {
            Transition::Dispatched(request) => {
                let outcome = client.analyze(request).await;
                self.dispatch(Event::Completed(outcome))
            }
            other => other,
        }
    }

    fn submit(&mut self, file: UploadedFile) -> Transition {
        self.phase = Phase::Validating;
        let kind = match file.accepted_type() {
            Ok(kind) => kind,
            Err(err) => {
                debug!(error = %err, "upload rejected");
                self.surface.notify(&Notice::UnsupportedFileType);
                self.phase = Phase::Idle;
                return Transition::Rejected(err);
            }
        };

        self.phase = Phase::Submitting;
        self.surface.set_intake_visible(false);
        self.surface.set_busy(true);
        self.phase = Phase::AwaitingResponse;
        debug!(kind = kind.extension(), size = file.bytes.len(), "upload dispatched");
        Transition::Dispatched(AnalysisRequest { file, kind })
    }

    fn complete(&mut self, outcome: Result<AnalysisResponse, TransportError>) -> Transition {
        let mut surface = BusyGuard::new(&mut self.surface);
        match outcome {
            Ok(AnalysisResponse::Completed(result)) => {
                let view = render(&result, &self.taxonomy);
                surface.show_results(&view);
                self.view = Some(view);
                self.phase = Phase::Displaying;
                Transition::Displayed
            }
            Ok(AnalysisResponse::Rejected { message }) => {
                surface.notify(&Notice::AnalysisError(message.clone()));
                surface.set_intake_visible(true);
                self.phase = Phase::Idle;
                Transition::AnalysisFailed(message)
            }
            Err(err) => {
                warn!(error = %err, "analysis transport failure");
                surface.notify(&Notice::TransportFailure);
                surface.set_intake_visible(true);
                self.phase = Phase::Failed;
                Transition::TransportFailed
            }
        }
    }

    fn reset_to_idle(&mut self) -> Transition {
        self.view = None;
        self.surface.clear_results();
        self.surface.clear_selection();
        self.surface.set_intake_visible(true);
        self.phase = Phase::Idle;
        Transition::Reset
    }

    fn toggle(&mut self, category: FindingCategory) -> Transition {
        let Some(view) = self.view.as_mut() else {
            return Transition::Ignored;
        };
        if !view.toggle(category) {
            return Transition::Ignored;
        }
        self.surface.show_results(view);
        Transition::Toggled
    }
}
