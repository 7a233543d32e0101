//! HTML rendering of proposal tables, budget charts, and ranked ideas.
//!
//! Pure functions: input in, markup out. Writing the result to disk is the
//! caller's job (see `artifact`).

use std::fmt::Write;

use ideascreen_core::{Document, ScoredIdea};
use serde_json::Value;

const TABLE_STYLE: &str = "\
body { display: flex; align-items: center; justify-content: center; margin: 0; background: white; color: black; }
table { border-collapse: collapse; width: 80%; }
th, td { border: 1px solid black; padding: 8px; text-align: center; }";

const CHART_STYLE: &str = "\
body { margin: 0; background-color: #f0f0f0; }
.container { text-align: center; }
svg { max-width: 100%; }";

const RANKED_STYLE: &str = "\
body { font-family: sans-serif; text-align: center; }
table { border-collapse: collapse; margin: 0 auto; width: 60%; }
th, td { border: 1px solid #444; padding: 8px; }
th { background-color: #2a2a72; color: white; }";

const CHART_HEIGHT: f64 = 400.0;
const BAR_SLOT: f64 = 60.0;
const MARGIN: f64 = 60.0;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, style: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{}</title>\n<style>\n{style}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn value_f64(value: Option<&Value>) -> Option<f64> {
    let v = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|v| v.is_finite())
}

/// Render documents as a table. Columns are the union of keys in first-seen order.
pub fn render_table(records: &[Document]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for doc in records {
        for key in doc.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }

    let mut body = String::from("<table>\n<tr>");
    for col in &columns {
        let _ = write!(body, "<th>{}</th>", escape_html(col));
    }
    body.push_str("</tr>\n");
    for doc in records {
        body.push_str("<tr>");
        for col in &columns {
            let _ = write!(body, "<td>{}</td>", escape_html(&cell_text(doc.get(*col))));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table>");

    page("Finance Data", TABLE_STYLE, &body)
}

/// Render a bar chart of `y_field` per `x_field` as SVG bytes.
///
/// Documents without a numeric `y_field` are left out. Negative values are
/// drawn as zero-height bars.
pub fn render_bar_chart(records: &[Document], x_field: &str, y_field: &str) -> Vec<u8> {
    let bars: Vec<(String, f64)> = records
        .iter()
        .filter_map(|doc| {
            let y = value_f64(doc.get(y_field))?;
            Some((cell_text(doc.get(x_field)), y))
        })
        .collect();

    let max = bars.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { max } else { 1.0 };
    let plot_h = CHART_HEIGHT - 2.0 * MARGIN;
    let width = (bars.len() as f64 * BAR_SLOT + 2.0 * MARGIN).max(600.0);

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{CHART_HEIGHT}\" \
         viewBox=\"0 0 {width} {CHART_HEIGHT}\">"
    );
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"18\">{} Values by {}</text>",
        width / 2.0,
        escape_html(y_field),
        escape_html(x_field)
    );
    let base = CHART_HEIGHT - MARGIN;
    let _ = write!(
        svg,
        "<line x1=\"{MARGIN}\" y1=\"{base}\" x2=\"{}\" y2=\"{base}\" stroke=\"black\"/>",
        width - MARGIN
    );
    for (i, (label, y)) in bars.iter().enumerate() {
        let h = y.max(0.0) / scale * plot_h;
        let x = MARGIN + i as f64 * BAR_SLOT + BAR_SLOT * 0.15;
        let w = BAR_SLOT * 0.7;
        let label = escape_html(label);
        let _ = write!(
            svg,
            "<rect x=\"{x}\" y=\"{}\" width=\"{w}\" height=\"{h}\" fill=\"#1f77b4\">\
             <title>{label}: {y}</title></rect>",
            base - h
        );
        let lx = x + w / 2.0;
        let ly = base + 14.0;
        let _ = write!(
            svg,
            "<text x=\"{lx}\" y=\"{ly}\" font-size=\"11\" text-anchor=\"end\" \
             transform=\"rotate(-45 {lx} {ly})\">{label}</text>"
        );
    }
    svg.push_str("</svg>");
    svg.into_bytes()
}

/// Wrap an SVG chart in a standalone page.
pub fn chart_page(title: &str, svg: &[u8]) -> String {
    let body = format!(
        "<div class=\"container\">\n<h1>{}</h1>\n{}\n</div>",
        escape_html(title),
        String::from_utf8_lossy(svg)
    );
    page(title, CHART_STYLE, &body)
}

/// Render the ranked ideas table, or a placeholder when nothing was ranked.
pub fn render_ranked(ranked: &[ScoredIdea]) -> String {
    let mut body = String::new();
    if ranked.is_empty() {
        body.push_str("<p>No proposals available to rank.</p>");
        return page("Screened Ideas", RANKED_STYLE, &body);
    }

    let _ = write!(body, "<p>Top {} Screened Ideas</p>\n<table>\n", ranked.len());
    body.push_str(
        "<tr><th>Rank</th><th>Score</th><th>Budget</th><th>NPV</th><th>IRR</th><th>Name</th></tr>\n",
    );
    for (idx, idea) in ranked.iter().enumerate() {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            idx + 1,
            idea.score,
            idea.budget,
            idea.npv,
            idea.irr,
            escape_html(&idea.name)
        );
    }
    body.push_str("</table>");
    page("Screened Ideas", RANKED_STYLE, &body)
}
