//! Projection of an [`AnalysisResult`] into a presentation-neutral view, plus
//! the adapters that turn that view into HTML, terminal text or JSON.

use serde::Serialize;

use crate::model::{AnalysisResult, Finding, FindingCategory, Verdict};
use crate::taxonomy::Taxonomy;
use crate::theme::ThemePreference;

pub mod html;
pub mod text;

/// Names longer than this are shortened for display.
pub const FILENAME_DISPLAY_LIMIT: usize = 20;
const FILENAME_KEEP_CHARS: usize = 17;
pub const ELLIPSIS: &str = "...";

/// Format styles supported by the bundled adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub verdict: Verdict,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Display name plus the untruncated name kept as an auxiliary label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilenameLabel {
    pub display: String,
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingView {
    pub location: Option<String>,
    /// Raw text; adapters quote and escape it.
    pub text: Option<String>,
    pub context: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    NoneDetected { message: String },
    Items { items: Vec<FindingView> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub category: FindingCategory,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub count: usize,
    pub expanded: bool,
    pub body: SectionBody,
}

/// Everything a surface needs to show one completed analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub banner: Banner,
    pub filename: FilenameLabel,
    pub file_type: String,
    pub verdict_message: Option<String>,
    pub suspicious_score: Option<i64>,
    pub total_pages: Option<u64>,
    pub total_paragraphs: Option<u64>,
    pub sections: Vec<SectionView>,
}

impl ResultsView {
    pub fn section(&self, category: FindingCategory) -> Option<&SectionView> {
        self.sections
            .iter()
            .find(|section| section.category == category)
    }

    /// Flip one section open or closed. Returns `false` when the section is
    /// not part of this view.
    pub fn toggle(&mut self, category: FindingCategory) -> bool {
        match self
            .sections
            .iter_mut()
            .find(|section| section.category == category)
        {
            Some(section) => {
                section.expanded = !section.expanded;
                true
            }
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        for section in &mut self.sections {
            section.expanded = true;
        }
    }
}

/// Build the view for `result`. Pure: the same input always yields the same
/// view, with toggle state reset to the defaults.
pub fn render(result: &AnalysisResult, taxonomy: &Taxonomy) -> ResultsView {
    let info = taxonomy.verdict(result.verdict);
    let sections = taxonomy
        .entries()
        .iter()
        .filter_map(|entry| {
            let findings = result.findings_for(entry.category)?;
            let count = findings.len();
            let body = if findings.is_empty() {
                SectionBody::NoneDetected {
                    message: format!("No {} detected", entry.title.to_lowercase()),
                }
            } else {
                SectionBody::Items {
                    items: findings.iter().map(finding_view).collect(),
                }
            };
            Some(SectionView {
                category: entry.category,
                icon: entry.icon,
                title: entry.title,
                description: entry.description,
                count,
                expanded: count > 0,
                body,
            })
        })
        .collect();

    ResultsView {
        banner: Banner {
            verdict: result.verdict,
            icon: info.icon,
            title: info.title,
            description: info.description,
        },
        filename: filename_label(&result.filename),
        file_type: result.file_type.clone(),
        verdict_message: result.verdict_message.clone(),
        suspicious_score: result.suspicious_score,
        total_pages: result.total_pages,
        total_paragraphs: result.total_paragraphs,
        sections,
    }
}

/// Render `view` with the adapter matching `format`.
pub fn render_report(
    view: &ResultsView,
    format: OutputFormat,
    theme: Option<ThemePreference>,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => text::render_text(view, theme),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Html => html::render_page(view, theme.unwrap_or_default()),
    }
}

pub fn filename_label(name: &str) -> FilenameLabel {
    let display = if name.chars().count() > FILENAME_DISPLAY_LIMIT {
        let mut short: String = name.chars().take(FILENAME_KEEP_CHARS).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        name.to_string()
    };
    FilenameLabel {
        display,
        full: name.to_string(),
    }
}

fn finding_view(finding: &Finding) -> FindingView {
    FindingView {
        location: location_line(finding),
        text: finding.text.clone(),
        context: finding.context.clone(),
        tags: tags(finding),
    }
}

/// `Page N` wins over `Paragraph N`; `location` and the character count are
/// appended to whichever is present.
pub fn location_line(finding: &Finding) -> Option<String> {
    let mut line = match (finding.page, finding.paragraph) {
        (Some(page), _) => format!("Page {page}"),
        (None, Some(paragraph)) => format!("Paragraph {paragraph}"),
        (None, None) => String::new(),
    };
    if let Some(location) = &finding.location {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&format!("({location})"));
    }
    if let Some(count) = finding.char_count {
        if !line.is_empty() {
            line.push_str(" • ");
        }
        line.push_str(&format!("{count} characters"));
    }
    (!line.is_empty()).then_some(line)
}

pub fn tags(finding: &Finding) -> Vec<String> {
    let mut tags = Vec::new();
    tags.extend(finding.char_code.clone());
    tags.extend(finding.char_name.clone());
    tags.extend(finding.color.clone());
    tags.extend(finding.font_size_pt.map(|size| format!("{size}pt")));
    tags.extend(finding.property.clone());
    tags
}
