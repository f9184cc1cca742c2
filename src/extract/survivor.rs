//! Survivor pages: infobox attributes plus one table per skill

use crate::crawler::ImageRequest;
use crate::extract::dom::{inner_text, row_cells, select_all, select_first, table_rows, text_of};
use crate::extract::infobox::{all_fields, read_field, select_infobox};
use crate::extract::media::{image_from, queue};
use crate::extract::record::{EntityName, Fields, Record, SkillRecord, SurvivorRecord};
use crate::extract::unlock::parse_unlock;
use crate::extract::{Finding, PageContext, Scan};
use scraper::{ElementRef, Html};

const NOTES_LABEL: &str = "Notes";

pub(crate) fn scan_survivor(doc: &Html, ctx: &PageContext<'_>, scan: &mut Scan) {
    let profile = ctx.profile;
    let infobox = select_infobox(doc, profile, ctx.url);
    let scope = infobox.scope;

    let Some(name) = text_of(scope, &profile.title).and_then(|t| EntityName::new(&t)) else {
        tracing::warn!("No name found on {}, page skipped", ctx.url);
        scan.findings.push(Finding::Nameless {
            url: ctx.url.to_string(),
        });
        return;
    };

    if !infobox.confident {
        tracing::warn!(
            "{} has {} infoboxes and none matches its title; using the first ({})",
            ctx.url,
            infobox.candidates,
            name
        );
        scan.findings.push(Finding::LowConfidence {
            url: ctx.url.to_string(),
            chosen: name.to_string(),
            candidates: infobox.candidates,
        });
    }

    let image = queue(
        select_first(scope, &profile.image)
            .and_then(|img| image_from(img, profile, ctx.root, name.as_str())),
        &mut scan.images,
    );

    let description = read_field(scope, profile, &profile.keys.description)
        .or_else(|| text_of(doc.root_element(), &profile.summary));

    let skills = select_all(doc.root_element(), &profile.skill_table)
        .into_iter()
        .filter_map(|table| read_skill(table, ctx, &mut scan.images))
        .collect();

    scan.records.push(Record::Survivor(SurvivorRecord {
        wiki_url: ctx.url.to_string(),
        image,
        description,
        stats: all_fields(scope, profile),
        skills,
        name,
    }));
}

/// Reads one skill table
///
/// The first row holds the skill's icon and name. Every later row with two or
/// more cells is a label/value pair. A `Notes` label with an empty value takes
/// its text from the following single-cell row.
fn read_skill(
    table: ElementRef<'_>,
    ctx: &PageContext<'_>,
    images: &mut Vec<ImageRequest>,
) -> Option<SkillRecord> {
    let rows = table_rows(table);
    let (head, rest) = rows.split_first()?;

    let name = row_cells(*head)
        .into_iter()
        .map(inner_text)
        .find_map(|text| text.lines().next().map(str::to_string).filter(|l| !l.is_empty()))?;

    let image = queue(
        select_first(*head, &ctx.profile.icon)
            .and_then(|img| image_from(img, ctx.profile, ctx.root, &name)),
        images,
    );

    let mut fields = Fields::new();
    let mut i = 0;
    while i < rest.len() {
        let cells = row_cells(rest[i]);
        i += 1;

        let [label, value, ..] = cells.as_slice() else {
            continue;
        };
        let label = inner_text(*label).trim_end_matches(':').trim().to_string();
        if label.is_empty() {
            continue;
        }

        let mut value = inner_text(*value);
        if value.is_empty() && label.eq_ignore_ascii_case(NOTES_LABEL) {
            if let Some(next) = rest.get(i) {
                let next_cells = row_cells(*next);
                if next_cells.len() == 1 {
                    value = inner_text(next_cells[0]);
                    i += 1;
                }
            }
        }

        if !value.is_empty() {
            fields.insert(label, value);
        }
    }

    let unlock = fields.get(NOTES_LABEL).and_then(parse_unlock);
    if fields.get(NOTES_LABEL).is_some() && unlock.is_none() {
        tracing::debug!("Skill '{}' notes carry no unlock condition", name);
    }

    Some(SkillRecord {
        name,
        image,
        unlock,
        fields,
    })
}
