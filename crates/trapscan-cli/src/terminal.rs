use std::io::Write;

use trapscan_core::{render_report, Notice, OutputFormat, ResultsView, Surface, ThemePreference};

/// Surface writing reports to stdout and notices/progress to stderr.
pub struct TerminalSurface {
    format: OutputFormat,
    theme: ThemePreference,
    color: bool,
    expand_all: bool,
    file_label: String,
}

impl TerminalSurface {
    pub fn new(
        format: OutputFormat,
        theme: ThemePreference,
        color: bool,
        expand_all: bool,
        file_label: impl Into<String>,
    ) -> Self {
        Self {
            format,
            theme,
            color,
            expand_all,
            file_label: file_label.into(),
        }
    }
}

impl Surface for TerminalSurface {
    fn set_intake_visible(&mut self, visible: bool) {
        tracing::trace!(visible, "intake visibility");
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            eprintln!("Analyzing {}...", self.file_label);
        }
    }

    fn notify(&mut self, notice: &Notice) {
        eprintln!("{notice}");
    }

    fn show_results(&mut self, view: &ResultsView) {
        let mut view = view.clone();
        if self.expand_all {
            view.expand_all();
        }
        let palette = match self.format {
            OutputFormat::Human if self.color => Some(self.theme),
            OutputFormat::Html => Some(self.theme),
            _ => None,
        };
        match render_report(&view, self.format, palette) {
            Ok(rendered) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(err) = stdout.write_all(rendered.as_bytes()) {
                    tracing::error!(error = %err, "failed to write report");
                }
            }
            Err(err) => tracing::error!(error = %err, "failed to render report"),
        }
    }

    fn clear_results(&mut self) {}
}
