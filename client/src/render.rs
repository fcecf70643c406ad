//! Plain-text rendering of a `ListingState` for terminals.

use contacts_core::{ContactField, ListingState, SortOrder};
use serde_json::json;

const COLUMNS: [(ContactField, &str); 4] = [
    (ContactField::Name, "Name"),
    (ContactField::Email, "Email"),
    (ContactField::Phone, "Phone"),
    (ContactField::Address, "Address"),
];

/// Summary line, error line, table (or empty-state hint) and footer.
pub fn render_table(state: &ListingState, api_base: &str) -> String {
    let mut out = String::new();
    out.push_str(&state.summary());
    out.push('\n');

    if let Some(error) = &state.error {
        out.push_str(&format!("Error: {error}\n"));
    }

    if state.items.is_empty() {
        out.push_str("No contacts found. Try a different search term or clear the filter.\n");
    } else {
        let headers: Vec<String> = COLUMNS
            .iter()
            .map(|(field, title)| header(state, *field, title))
            .collect();
        let rows: Vec<Vec<&str>> = state
            .items
            .iter()
            .map(|c| COLUMNS.iter().map(|(field, _)| c.display(*field)).collect())
            .collect();

        let widths: Vec<usize> = (0..COLUMNS.len())
            .map(|i| {
                rows.iter()
                    .map(|r| width(r[i]))
                    .chain(std::iter::once(width(&headers[i])))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        push_row(&mut out, headers.iter().map(String::as_str), &widths);
        push_row(
            &mut out,
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
            &widths,
        );
        for row in &rows {
            push_row(&mut out, row.iter().copied(), &widths);
        }
    }

    out.push_str(&format!("API base: {api_base}\n"));
    out
}

/// The listing as JSON: canonical contacts plus paging.
pub fn render_json(state: &ListingState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "items": state.items,
        "total": state.total,
        "page": state.page,
        "page_size": state.page_size,
        "total_pages": state.total_pages(),
    }))
}

fn header(state: &ListingState, field: ContactField, title: &str) -> String {
    if state.sort != field.as_str() {
        return title.to_string();
    }
    match state.order {
        SortOrder::Asc => format!("{title} ↑"),
        SortOrder::Desc => format!("{title} ↓"),
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, w)| format!("{cell}{}", " ".repeat(w.saturating_sub(width(cell)))))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
