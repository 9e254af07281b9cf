use std::fmt;

use crate::render::ResultsView;

/// User-facing notices raised by the upload controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UnsupportedFileType,
    /// The service reported an error; the message is shown verbatim.
    AnalysisError(String),
    TransportFailure,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFileType => f.write_str("Please upload a PDF or DOCX file."),
            Self::AnalysisError(message) => write!(f, "Error: {message}"),
            Self::TransportFailure => f.write_str("An error occurred while analyzing the file."),
        }
    }
}

/// Presentation binding driven by the upload controller.
///
/// The controller is the only caller; implementations just reflect what they
/// are told.
pub trait Surface {
    /// Show or hide the file intake area (picker, drop zone, intro panel).
    fn set_intake_visible(&mut self, visible: bool);

    fn set_busy(&mut self, busy: bool);

    /// Blocking notice; returning counts as the user having seen it.
    fn notify(&mut self, notice: &Notice);

    /// Replace whatever results are shown with `view`.
    fn show_results(&mut self, view: &ResultsView);

    fn clear_results(&mut self);

    /// Forget the previously selected file so it can be picked again.
    fn clear_selection(&mut self) {}
}

/// Headless surface that keeps the last projected state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub intake_visible: bool,
    pub busy: bool,
    pub notices: Vec<Notice>,
    pub results: Option<ResultsView>,
    /// Number of times results were (re)drawn.
    pub renders: usize,
    pub selection_clears: usize,
}

impl Surface for RecordingSurface {
    fn set_intake_visible(&mut self, visible: bool) {
        self.intake_visible = visible;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn show_results(&mut self, view: &ResultsView) {
        self.results = Some(view.clone());
        self.renders += 1;
    }

    fn clear_results(&mut self) {
        self.results = None;
    }

    fn clear_selection(&mut self) {
        self.selection_clears += 1;
    }
}
