//! The challenges page: one table per category, one challenge per row
//!
//! Categories are assigned by table position: the Nth table on the page gets
//! the Nth configured category. A reordered page therefore mislabels rows.

use crate::extract::dom::{inner_text, is_header_row, row_cells, select_all, select_first, table_rows};
use crate::extract::media::{image_from, queue};
use crate::extract::record::{ChallengeRecord, EntityName, Record};
use crate::extract::{Finding, PageContext, Scan};
use scraper::{ElementRef, Html};

pub(crate) fn scan_challenges(doc: &Html, ctx: &PageContext<'_>, scan: &mut Scan) {
    let profile = ctx.profile;
    let columns = &profile.challenge_columns;
    let tables = select_all(doc.root_element(), &profile.challenge_table);

    for (index, table) in tables.into_iter().enumerate() {
        let Some(category) = ctx.categories.get(index) else {
            tracing::warn!(
                "Challenge table #{} on {} has no configured category, skipped",
                index + 1,
                ctx.url
            );
            scan.findings.push(Finding::UnmappedTable {
                url: ctx.url.to_string(),
                index,
            });
            continue;
        };

        for row in table_rows(table) {
            if is_header_row(row) {
                continue;
            }
            let cells = row_cells(row);
            if cells.is_empty() {
                continue;
            }

            let Some(name) = cell_text(&cells, columns.name_column).and_then(|t| EntityName::new(&t))
            else {
                tracing::warn!("Challenge row without a name in table #{}", index + 1);
                scan.findings.push(Finding::Nameless {
                    url: ctx.url.to_string(),
                });
                continue;
            };

            let image = queue(
                select_first(row, &profile.icon)
                    .and_then(|img| image_from(img, profile, ctx.root, name.as_str())),
                &mut scan.images,
            );

            scan.records.push(Record::Challenge(ChallengeRecord {
                wiki_url: ctx.url.to_string(),
                image,
                description: cell_text(&cells, columns.description_column),
                unlock: cell_text(&cells, columns.unlock_column),
                category: category.clone(),
                name,
            }));
        }
    }
}

fn cell_text(cells: &[ElementRef<'_>], column: usize) -> Option<String> {
    cells
        .get(column)
        .map(|cell| inner_text(*cell))
        .filter(|text| !text.is_empty())
}
