//! DOM query primitives
//!
//! A missing element is a value (`None` / empty `Vec`), never an error. The
//! only error here is a selector that does not parse, which is a defect in
//! the selector profile.

use crate::extract::ExtractError;
use scraper::node::Node;
use scraper::{ElementRef, Selector};

/// Elements whose boundaries become line breaks in extracted text
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6", "section",
    "figcaption", "dd", "dt",
];

pub fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

pub fn select_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

pub fn select_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// Text of the first match, or `None` when absent or blank
pub fn text_of(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    select_first(scope, selector)
        .map(inner_text)
        .filter(|text| !text.is_empty())
}

/// Rendered text of an element, approximating the browser's `innerText`
///
/// Whitespace runs collapse to one space, `<br>` and block elements start new
/// lines, and script/style content is skipped.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);

    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Node::Element(el) => {
                let name = el.name();
                if name == "script" || name == "style" {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    let block = BLOCK_ELEMENTS.contains(&name);
                    if block {
                        out.push('\n');
                    }
                    collect_text(child_el, out);
                    if block {
                        out.push('\n');
                    }
                }
            }
            _ => {}
        }
    }
}

/// The first attribute in `names` that is present and non-blank
pub fn attr_first(element: ElementRef<'_>, names: &[String]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// The anchor element followed by all of its element siblings
///
/// Stat rows are addressed by their first cell; the rest of the row is the
/// cell's following siblings.
pub fn cells_from(anchor: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    std::iter::once(anchor)
        .chain(anchor.next_siblings().filter_map(ElementRef::wrap))
        .collect()
}

/// The `td`/`th` children of a table row
pub fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .collect()
}

/// The rows of a table, not descending into nested tables
pub fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|row| row.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

/// True for rows made only of `th` cells
pub fn is_header_row(row: ElementRef<'_>) -> bool {
    let cells = row_cells(row);
    !cells.is_empty() && cells.iter().all(|cell| cell.value().name() == "th")
}
