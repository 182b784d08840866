use crate::loader::{FileRecord, RecordId};
use std::fmt::Write as _;
use std::sync::Arc;

/// View model for one grid card. `id` links the card back to its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: RecordId,
    pub icon: String,
    pub name: String,
    pub size_kb: String,
    pub description: Option<String>,
    pub records: usize,
    pub kind_label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    NoResults,
    Cards(Vec<Card>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStats {
    pub files: usize,
    pub records: usize,
}

pub fn format_size_kb(size: usize) -> String {
    format!("{:.2}", size as f64 / 1024.0)
}

pub fn card_for(record: &FileRecord) -> Card {
    Card {
        id: record.id,
        icon: record.icon.clone(),
        name: record.name.clone(),
        size_kb: format_size_kb(record.size),
        description: record.description.clone().filter(|d| !d.is_empty()),
        records: record.records,
        kind_label: record.kind().label(),
        url: record.url.clone(),
    }
}

pub fn render(filtered: &[Arc<FileRecord>]) -> GridView {
    if filtered.is_empty() {
        return GridView::NoResults;
    }
    GridView::Cards(filtered.iter().map(|r| card_for(r)).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    View,
    CopyUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIntent {
    Inspect(RecordId),
    CopyUrl(RecordId),
}

/// One click on a card yields at most one intent. An action control wins
/// over the card body it sits on.
pub fn resolve_card_click(
    id: RecordId,
    body_clicked: bool,
    action: Option<CardAction>,
) -> Option<CardIntent> {
    match action {
        Some(CardAction::View) => Some(CardIntent::Inspect(id)),
        Some(CardAction::CopyUrl) => Some(CardIntent::CopyUrl(id)),
        None if body_clicked => Some(CardIntent::Inspect(id)),
        None => None,
    }
}

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

const PAGE_STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#0f172a;color:#e5e7eb;margin:2rem}\
.stats{color:#94a3b8;margin-bottom:1rem}\
.json-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:1rem}\
.json-card{background:#1e293b;border-radius:12px;padding:1rem}\
.json-header{display:flex;gap:.75rem;align-items:center}\
.json-icon{font-size:2rem}.json-size,.json-description{color:#94a3b8}\
.json-info{display:flex;gap:1.5rem;margin-top:.5rem}\
.no-results{text-align:center;color:#94a3b8}";

fn write_card_html(out: &mut String, card: &Card) {
    let _ = write!(
        out,
        "<div class=\"json-card\" data-record-id=\"{}\">\
<div class=\"json-header\"><div class=\"json-icon\">{}</div>\
<div class=\"json-title\"><div class=\"json-name\">{}</div>\
<div class=\"json-size\">{} KB</div></div></div>",
        card.id.0,
        escape_html(&card.icon),
        escape_html(&card.name),
        card.size_kb,
    );
    if let Some(description) = &card.description {
        let _ = write!(
            out,
            "<p class=\"json-description\">{}</p>",
            escape_html(description)
        );
    }
    let _ = write!(
        out,
        "<div class=\"json-info\"><span>Records: {}</span><span>Type: {}</span></div>\
<div class=\"json-actions\"><a href=\"{}\">View</a></div></div>",
        card.records,
        card.kind_label,
        escape_html(&card.url),
    );
}

/// Static HTML page for the grid.
pub fn render_html(view: &GridView, stats: GridStats) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>JSON Shelf</title>\
<style>{PAGE_STYLE}</style></head><body>\n<h1>JSON Shelf</h1>\n\
<div class=\"stats\">Files: {} | Records: {}</div>\n",
        stats.files, stats.records
    );
    match view {
        GridView::NoResults => {
            out.push_str("<div class=\"no-results\"><p>No results</p></div>\n");
        }
        GridView::Cards(cards) => {
            out.push_str("<div class=\"json-grid\">\n");
            for card in cards {
                write_card_html(&mut out, card);
                out.push('\n');
            }
            out.push_str("</div>\n");
        }
    }
    out.push_str("</body></html>\n");
    out
}

pub fn render_plain(view: &GridView, stats: GridStats) -> String {
    let mut out = String::new();
    match view {
        GridView::NoResults => out.push_str("No results\n"),
        GridView::Cards(cards) => {
            for card in cards {
                let _ = write!(
                    out,
                    "{} {} | {} KB | {} records | {}",
                    card.icon, card.name, card.size_kb, card.records, card.kind_label
                );
                if let Some(description) = &card.description {
                    let _ = write!(out, " | {description}");
                }
                let _ = writeln!(out, " | {}", card.url);
            }
        }
    }
    let _ = writeln!(out, "Files: {} | Records: {}", stats.files, stats.records);
    out
}
