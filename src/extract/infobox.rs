//! Infobox selection and labelled field reads

use crate::extract::dom::{inner_text, row_cells, select_all, text_of};
use crate::extract::profile::{CompiledFields, CompiledProfile};
use crate::extract::record::Fields;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// Minimum title similarity for a confident pick among several infoboxes
pub const MATCH_THRESHOLD: f64 = 0.5;

/// The DOM region an entity is read from
#[derive(Debug, Clone, Copy)]
pub struct InfoboxMatch<'a> {
    pub scope: ElementRef<'a>,
    /// Number of infoboxes on the page
    pub candidates: usize,
    /// False when several infoboxes exist and none resembles the page title
    pub confident: bool,
}

/// Picks the infobox describing the page's entity
///
/// With no infobox the whole document is the scope. With several, each box's
/// title is compared with the title derived from the URL and the best match
/// wins. If no box reaches [`MATCH_THRESHOLD`], the first box is used and the
/// match is marked as not confident.
pub fn select_infobox<'a>(doc: &'a Html, profile: &CompiledProfile, url: &Url) -> InfoboxMatch<'a> {
    let root = doc.root_element();
    let boxes = select_all(root, &profile.infobox);

    match boxes.as_slice() {
        [] => InfoboxMatch {
            scope: root,
            candidates: 0,
            confident: true,
        },
        [only] => InfoboxMatch {
            scope: *only,
            candidates: 1,
            confident: true,
        },
        [first, ..] => {
            let page_title = title_from_url(url);
            let best = boxes
                .iter()
                .map(|b| {
                    let title = text_of(*b, &profile.title).unwrap_or_default();
                    (*b, title_similarity(&page_title, &title))
                })
                .fold(None::<(ElementRef<'a>, f64)>, |best, (b, score)| match best {
                    Some((_, top)) if top >= score => best,
                    _ => Some((b, score)),
                });

            match best {
                Some((scope, score)) if score >= MATCH_THRESHOLD => InfoboxMatch {
                    scope,
                    candidates: boxes.len(),
                    confident: true,
                },
                _ => InfoboxMatch {
                    scope: *first,
                    candidates: boxes.len(),
                    confident: false,
                },
            }
        }
    }
}

/// Page title as encoded in a wiki URL: last path segment, decoded, `_` as space
pub fn title_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).replace('_', " ")
}

/// Similarity of two titles in `[0, 1]`
///
/// Titles equal after lowercasing and dropping punctuation score 1.0,
/// otherwise the Jaccard index of their word sets.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let words = |s: &str| -> Vec<String> {
        s.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    };

    let (wa, wb) = (words(a), words(b));
    if wa.is_empty() || wb.is_empty() {
        return 0.0;
    }
    if wa == wb {
        return 1.0;
    }

    let sa: HashSet<&String> = wa.iter().collect();
    let sb: HashSet<&String> = wb.iter().collect();
    let shared = sa.intersection(&sb).count();
    let total = sa.union(&sb).count();
    shared as f64 / total as f64
}

/// Reads one labelled field, `None` when absent or blank
pub fn read_field(scope: ElementRef<'_>, profile: &CompiledProfile, key: &str) -> Option<String> {
    match &profile.fields {
        CompiledFields::DataSource { any, value, .. } => scope
            .select(any)
            .filter(|el| el.value().attr("data-source") == Some(key))
            .find_map(|el| text_of(el, value)),
        CompiledFields::LabelRows { row } => scope.select(row).find_map(|row| {
            let cells = row_cells(row);
            match cells.as_slice() {
                [label, value, ..] if label_matches(&inner_text(*label), key) => {
                    Some(inner_text(*value)).filter(|v| !v.is_empty())
                }
                _ => None,
            }
        }),
    }
}

/// Every labelled field in the scope, in page order, under its display label
pub fn all_fields(scope: ElementRef<'_>, profile: &CompiledProfile) -> Fields {
    let mut fields = Fields::new();

    match &profile.fields {
        CompiledFields::DataSource { any, label, value } => {
            for el in scope.select(any) {
                let Some(text) = text_of(el, value) else {
                    continue;
                };
                let name = text_of(el, label)
                    .or_else(|| el.value().attr("data-source").map(str::to_string))
                    .map(|l| clean_label(&l))
                    .unwrap_or_default();
                if !name.is_empty() {
                    fields.insert(name, text);
                }
            }
        }
        CompiledFields::LabelRows { row } => {
            for row in scope.select(row) {
                if let [label, value, ..] = row_cells(row).as_slice() {
                    let name = clean_label(&inner_text(*label));
                    let text = inner_text(*value);
                    if !name.is_empty() && !text.is_empty() {
                        fields.insert(name, text);
                    }
                }
            }
        }
    }

    fields
}

fn clean_label(raw: &str) -> String {
    raw.trim().trim_end_matches(':').trim().to_string()
}

fn label_matches(label: &str, key: &str) -> bool {
    clean_label(label).eq_ignore_ascii_case(key.trim())
}
