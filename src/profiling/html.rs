//! Self-contained HTML rendering of a [`ProfileReport`].

use std::fmt::Write;

use super::stats::{ColumnProfile, ColumnStats, CorrelationMatrix, MissingPattern, Overview, ProfileReport};
use crate::types::TIMESTAMP_DISPLAY_FORMAT;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin:0.5em 0 1.5em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:right}\
th{background:#f3f3f3}td.l,th.l{text-align:left}\
.col{border:1px solid #ddd;border-radius:4px;padding:0.5em 1em;margin-bottom:1em}\
.muted{color:#888}";

/// Render `report` as a single HTML document with inline styles.
pub fn render_html(report: &ProfileReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, report);
    out
}

fn write_document(out: &mut String, report: &ProfileReport) -> std::fmt::Result {
    let title = escape(&report.title);
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{title}</title><style>{STYLE}</style></head><body>")?;
    writeln!(out, "<h1>{title}</h1>")?;

    write_overview(out, &report.overview)?;

    writeln!(out, "<h2>Variables</h2>")?;
    for col in &report.columns {
        write_column(out, col)?;
    }

    write_correlations(out, &report.correlations)?;
    write_missing_patterns(out, &report.missing_patterns)?;

    writeln!(out, "</body></html>")
}

fn write_overview(out: &mut String, o: &Overview) -> std::fmt::Result {
    writeln!(out, "<h2>Overview</h2><table>")?;
    row(out, "Rows", &o.rows.to_string())?;
    row(out, "Columns", &o.columns.to_string())?;
    row(out, "Missing cells", &format!("{} ({:.1}%)", o.missing_cells, o.missing_cells_pct))?;
    row(out, "Duplicate rows", &o.duplicate_rows.to_string())?;
    for (ty, n) in &o.type_counts {
        row(out, &format!("{ty} columns"), &n.to_string())?;
    }
    writeln!(out, "</table>")
}

fn write_column(out: &mut String, c: &ColumnProfile) -> std::fmt::Result {
    writeln!(
        out,
        "<div class=\"col\"><h3>{} <span class=\"muted\">{}</span></h3><table>",
        escape(&c.name),
        c.data_type
    )?;
    row(out, "Count", &c.count.to_string())?;
    row(out, "Missing", &format!("{} ({:.1}%)", c.missing, c.missing_pct))?;
    row(out, "Distinct", &c.distinct.to_string())?;

    match &c.stats {
        ColumnStats::Numeric(s) => {
            row(out, "Mean", &num(s.mean))?;
            row(out, "Std", &s.std.map_or_else(|| "-".to_string(), num))?;
            row(out, "Min", &num(s.min))?;
            row(out, "25%", &num(s.q25))?;
            row(out, "50%", &num(s.median))?;
            row(out, "75%", &num(s.q75))?;
            row(out, "Max", &num(s.max))?;
            row(out, "Zeros", &s.zeros.to_string())?;
            row(out, "Negatives", &s.negatives.to_string())?;
        }
        ColumnStats::Boolean {
            true_count,
            false_count,
        } => {
            row(out, "True", &true_count.to_string())?;
            row(out, "False", &false_count.to_string())?;
        }
        ColumnStats::Temporal { min, max } => {
            row(out, "Min", &min.format(TIMESTAMP_DISPLAY_FORMAT).to_string())?;
            row(out, "Max", &max.format(TIMESTAMP_DISPLAY_FORMAT).to_string())?;
        }
        ColumnStats::Text(t) => {
            row(out, "Min length", &t.min_length.to_string())?;
            row(out, "Mean length", &num(t.mean_length))?;
            row(out, "Max length", &t.max_length.to_string())?;
            writeln!(out, "</table><table><tr><th class=\"l\">Top value</th><th>Count</th></tr>")?;
            for vc in &t.top_values {
                writeln!(
                    out,
                    "<tr><td class=\"l\">{}</td><td>{}</td></tr>",
                    escape(&vc.value),
                    vc.count
                )?;
            }
        }
        ColumnStats::Empty => {
            writeln!(out, "<tr><td class=\"l muted\" colspan=\"2\">no values</td></tr>")?;
        }
    }
    writeln!(out, "</table></div>")
}

fn write_correlations(out: &mut String, m: &CorrelationMatrix) -> std::fmt::Result {
    writeln!(out, "<h2>Correlations</h2>")?;
    if m.columns.len() < 2 {
        return writeln!(out, "<p class=\"muted\">Fewer than two numeric columns.</p>");
    }
    write!(out, "<table><tr><th></th>")?;
    for name in &m.columns {
        write!(out, "<th>{}</th>", escape(name))?;
    }
    writeln!(out, "</tr>")?;
    for (name, values) in m.columns.iter().zip(&m.values) {
        write!(out, "<tr><th class=\"l\">{}</th>", escape(name))?;
        for v in values {
            write!(out, "<td>{}</td>", v.map_or_else(|| "-".to_string(), |r| format!("{r:.3}")))?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</table>")
}

fn write_missing_patterns(out: &mut String, patterns: &[MissingPattern]) -> std::fmt::Result {
    writeln!(out, "<h2>Missing values</h2>")?;
    writeln!(out, "<table><tr><th class=\"l\">Missing columns</th><th>Rows</th></tr>")?;
    for p in patterns {
        let cols = if p.columns.is_empty() {
            "(none)".to_string()
        } else {
            escape(&p.columns.join(", "))
        };
        writeln!(out, "<tr><td class=\"l\">{cols}</td><td>{}</td></tr>", p.rows)?;
    }
    writeln!(out, "</table>")
}

fn row(out: &mut String, label: &str, value: &str) -> std::fmt::Result {
    writeln!(
        out,
        "<tr><th class=\"l\">{}</th><td>{}</td></tr>",
        escape(label),
        escape(value)
    )
}

fn num(v: f64) -> String {
    format!("{v:.4}")
}

fn escape(s: &str) -> String {
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
