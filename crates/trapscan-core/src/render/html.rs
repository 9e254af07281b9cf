use std::fmt::Write;

use super::{FindingView, ResultsView, SectionBody, SectionView};
use crate::theme::ThemePreference;

/// Entity-escape text for insertion into markup or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Verdict card followed by the findings container.
///
/// Built from scratch on every call; nothing from a previous rendering
/// survives.
pub fn render_fragment(view: &ResultsView) -> anyhow::Result<String> {
    let mut out = String::new();
    write_fragment(&mut out, view)?;
    Ok(out)
}

/// Standalone document wrapping [`render_fragment`].
pub fn render_page(view: &ResultsView, theme: ThemePreference) -> anyhow::Result<String> {
    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{theme}\">\n<head>\n<meta charset=\"utf-8\">\n<title>Scan results: {name}</title>\n</head>\n<body>\n<div class=\"results active\">\n{fragment}</div>\n</body>\n</html>\n",
        theme = theme.as_str(),
        name = escape_html(&view.filename.full),
        fragment = render_fragment(view)?,
    ))
}

fn write_fragment(out: &mut String, view: &ResultsView) -> std::fmt::Result {
    let banner = &view.banner;
    writeln!(out, "<div class=\"verdict-card {}\">", banner.verdict.as_str())?;
    writeln!(out, "  <div class=\"verdict-icon\">{}</div>", banner.icon)?;
    writeln!(out, "  <h2 class=\"verdict-title\">{}</h2>", banner.title)?;
    writeln!(
        out,
        "  <p class=\"verdict-message\">{}</p>",
        banner.description
    )?;
    writeln!(
        out,
        "  <div class=\"file-info\"><span class=\"filename\" title=\"{full}\">{display}</span><span class=\"filetype\">{kind}</span>{stats}</div>",
        full = escape_html(&view.filename.full),
        display = escape_html(&view.filename.display),
        kind = escape_html(&view.file_type),
        stats = document_stats(view),
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, "<div class=\"findings-container\">")?;
    for section in &view.sections {
        write_section(out, section)?;
    }
    writeln!(out, "</div>")
}

fn document_stats(view: &ResultsView) -> String {
    let mut stats = String::new();
    if let Some(pages) = view.total_pages {
        stats.push_str(&format!("<span class=\"file-stat\">{pages} pages</span>"));
    }
    if let Some(paragraphs) = view.total_paragraphs {
        stats.push_str(&format!(
            "<span class=\"file-stat\">{paragraphs} paragraphs</span>"
        ));
    }
    stats
}

fn write_section(out: &mut String, section: &SectionView) -> std::fmt::Result {
    let open = if section.expanded { " open" } else { "" };
    let zero = if section.count == 0 { " zero" } else { "" };

    writeln!(
        out,
        "  <div class=\"findings-section\" data-category=\"{}\">",
        section.category.key()
    )?;
    writeln!(out, "    <div class=\"findings-header{open}\">")?;
    writeln!(
        out,
        "      <div class=\"findings-title\"><span class=\"findings-title-icon\">{}</span><span>{}</span></div>",
        section.icon, section.title
    )?;
    writeln!(
        out,
        "      <div class=\"findings-meta\"><span class=\"findings-count{zero}\">{}</span><span class=\"findings-chevron\">▼</span></div>",
        section.count
    )?;
    writeln!(out, "    </div>")?;
    writeln!(out, "    <div class=\"findings-body{open}\">")?;
    match &section.body {
        SectionBody::NoneDetected { message } => {
            writeln!(out, "      <p class=\"empty-findings\">✓ {message}</p>")?;
        }
        SectionBody::Items { items } => {
            for item in items {
                write_item(out, item)?;
            }
        }
    }
    writeln!(out, "    </div>")?;
    writeln!(out, "  </div>")
}

fn write_item(out: &mut String, item: &FindingView) -> std::fmt::Result {
    writeln!(out, "      <div class=\"finding-item\">")?;
    if let Some(location) = &item.location {
        writeln!(
            out,
            "        <div class=\"finding-location\">📍 {}</div>",
            escape_html(location)
        )?;
    }
    if let Some(text) = &item.text {
        writeln!(
            out,
            "        <div class=\"finding-text\">&quot;{}&quot;</div>",
            escape_html(text)
        )?;
    }
    if let Some(context) = &item.context {
        writeln!(
            out,
            "        <div class=\"finding-text\">{}</div>",
            escape_html(context)
        )?;
    }
    if !item.tags.is_empty() {
        out.push_str("        <div class=\"finding-tags\">");
        for tag in &item.tags {
            write!(out, "<span class=\"finding-tag\">{}</span>", escape_html(tag))?;
        }
        out.push_str("</div>\n");
    }
    writeln!(out, "      </div>")
}
