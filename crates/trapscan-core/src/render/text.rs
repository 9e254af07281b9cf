use std::fmt::Write;

use colored::{Color, Colorize};

use super::{ResultsView, SectionBody};
use crate::model::Verdict;
use crate::theme::ThemePreference;

const INDENT: &str = "    ";

/// Colours for terminal output; one set per theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    heading: Color,
    muted: Color,
    count: Color,
    tag: Color,
}

impl Palette {
    fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Light => Self {
                heading: Color::Blue,
                muted: Color::BrightBlack,
                count: Color::Red,
                tag: Color::Magenta,
            },
            ThemePreference::Dark => Self {
                heading: Color::BrightCyan,
                muted: Color::White,
                count: Color::BrightRed,
                tag: Color::BrightMagenta,
            },
        }
    }
}

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Clean => Color::Green,
        Verdict::Low => Color::Cyan,
        Verdict::Medium => Color::Yellow,
        Verdict::High => Color::Red,
        Verdict::Unknown => Color::Magenta,
    }
}

fn paint(text: &str, color: Color, palette: Option<Palette>) -> String {
    match palette {
        Some(_) => text.color(color).to_string(),
        None => text.to_string(),
    }
}

fn paint_bold(text: &str, color: Color, palette: Option<Palette>) -> String {
    match palette {
        Some(_) => text.color(color).bold().to_string(),
        None => text.to_string(),
    }
}

/// Human-readable rendering. `theme` of `None` produces uncoloured text.
///
/// Collapsed sections print only their header, except that an empty section
/// always shows its "none detected" line.
pub fn render_text(view: &ResultsView, theme: Option<ThemePreference>) -> anyhow::Result<String> {
    let palette = theme.map(Palette::for_theme);
    let muted = palette.map_or(Color::White, |p| p.muted);
    let heading = palette.map_or(Color::White, |p| p.heading);
    let mut out = String::new();

    let banner = &view.banner;
    writeln!(
        out,
        "{} {}",
        banner.icon,
        paint_bold(banner.title, verdict_color(banner.verdict), palette)
    )?;
    writeln!(out, "{}", banner.description)?;
    if let Some(message) = &view.verdict_message {
        writeln!(out, "{}", paint(&sanitize_line(message), muted, palette))?;
    }
    write!(
        out,
        "File: {} ({})",
        sanitize_line(&view.filename.display),
        sanitize_line(&view.file_type)
    )?;
    if view.filename.display != view.filename.full {
        write!(
            out,
            "  [{}]",
            paint(&sanitize_line(&view.filename.full), muted, palette)
        )?;
    }
    writeln!(out)?;
    if let Some(score) = view.suspicious_score {
        writeln!(out, "Suspicion score: {score}")?;
    }
    if let Some(pages) = view.total_pages {
        writeln!(out, "Pages: {pages}")?;
    }
    if let Some(paragraphs) = view.total_paragraphs {
        writeln!(out, "Paragraphs: {paragraphs}")?;
    }

    for section in &view.sections {
        writeln!(out)?;
        let marker = if section.expanded { "▼" } else { "▶" };
        let count = section.count.to_string();
        let count = if section.count > 0 {
            paint_bold(&count, palette.map_or(Color::White, |p| p.count), palette)
        } else {
            count
        };
        writeln!(
            out,
            "{marker} {} {} ({count})",
            section.icon,
            paint_bold(section.title, heading, palette)
        )?;

        match &section.body {
            SectionBody::NoneDetected { message } => {
                writeln!(out, "{INDENT}✓ {message}")?;
            }
            SectionBody::Items { items } if section.expanded => {
                writeln!(out, "{INDENT}{}", paint(section.description, muted, palette))?;
                for item in items {
                    writeln!(out)?;
                    if let Some(location) = &item.location {
                        writeln!(out, "{INDENT}📍 {}", sanitize_line(location))?;
                    }
                    if let Some(text) = &item.text {
                        writeln!(out, "{INDENT}\"{}\"", sanitize_line(text))?;
                    }
                    if let Some(context) = &item.context {
                        writeln!(out, "{INDENT}{}", sanitize_line(context))?;
                    }
                    if !item.tags.is_empty() {
                        let tags: Vec<_> = item
                            .tags
                            .iter()
                            .map(|tag| {
                                paint(
                                    &format!("[{}]", sanitize_line(tag)),
                                    palette.map_or(Color::White, |p| p.tag),
                                    palette,
                                )
                            })
                            .collect();
                        writeln!(out, "{INDENT}{}", tags.join(" "))?;
                    }
                }
            }
            SectionBody::Items { .. } => {}
        }
    }

    Ok(out)
}

/// Keep each payload value on one terminal line and drop control characters.
fn sanitize_line(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            _ => Some(c),
        })
        .collect()
}
