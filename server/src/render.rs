//! HTML rendering of the read-only snapshot page.

use buyin_common::{format_plain, LedgerState, CURRENCY_SYMBOL};
use buyin_ledger::ReadOnlyView;

const STYLE: &str = "body{font-family:sans-serif;max-width:56rem;margin:0 auto;padding:1rem}\
h1{text-align:center}.note{text-align:center;color:#555;font-size:.875rem}\
section{background:#fff;border-radius:.25rem;box-shadow:0 1px 3px #0002;padding:1rem;margin-bottom:1rem}\
.badge{display:inline-block;background:#e5e7eb;color:#374151;padding:.25rem .75rem;border-radius:.25rem;margin:.125rem;font-size:.875rem}\
.total{font-size:.875rem;color:#555}.marker{font-style:italic;font-size:.75rem;color:#6b7280;margin-left:.25rem}\
.empty{color:#6b7280}";

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Render the shared, read-only view of a snapshot.
pub fn render_snapshot_page(state: &LedgerState) -> String {
    let view = ReadOnlyView::from_state(state);
    let mut body = String::new();

    body.push_str("<main>\n<h1>Poker Buy-In Tracker (Read-Only)</h1>\n");
    body.push_str("<p class=\"note\">This is a shared view. You cannot make changes here.</p>\n");

    body.push_str("<section>\n<h2>Players</h2>\n");
    if view.player_names.is_empty() {
        body.push_str("<p class=\"empty\">No players found.</p>\n");
    } else {
        body.push_str("<div>");
        for name in &view.player_names {
            body.push_str(&format!("<span class=\"badge\">{}</span>", escape_html(name)));
        }
        body.push_str("</div>\n");
    }
    body.push_str("</section>\n");

    if let Some(initial) = view.initial_buy_in {
        body.push_str(&format!(
            "<section>\n<h2>Initial Buy-In</h2>\n<p>Each player started with an initial buy-in of <strong>{}{}</strong>.</p>\n</section>\n",
            CURRENCY_SYMBOL,
            format_plain(initial)
        ));
    }

    body.push_str("<section>\n<h2>Buy-In Tracker</h2>\n");
    if view.players.is_empty() {
        body.push_str("<p class=\"empty\">No players added.</p>\n");
    }
    for section in &view.players {
        body.push_str(&format!(
            "<div>\n<h3>{} <span class=\"total\">(Total: {}{})</span></h3>\n<ul>\n",
            escape_html(&section.name),
            CURRENCY_SYMBOL,
            format_plain(section.total)
        ));
        for entry in &section.entries {
            body.push_str("<li>");
            body.push_str(&escape_html(&entry.text));
            if entry.initial_marker {
                body.push_str("<span class=\"marker\">(Initial)</span>");
            }
            body.push_str("</li>\n");
        }
        body.push_str("</ul>\n</div>\n");
    }
    body.push_str("</section>\n</main>\n");

    page("Poker Buy-In Tracker (Read-Only)", &body)
}

/// Render the generic page shown for unknown identifiers.
pub fn render_not_found_page() -> String {
    page(
        "Not Found",
        "<main>\n<h1>404</h1>\n<p class=\"note\">This page could not be found.</p>\n</main>\n",
    )
}
