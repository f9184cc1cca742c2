//! Item and equipment pages: one infobox, optional stat table

use crate::extract::dom::{select_first, text_of};
use crate::extract::infobox::{read_field, select_infobox};
use crate::extract::media::{image_from, queue};
use crate::extract::record::{EntityName, ItemRecord, Record};
use crate::extract::stats::stat_rows;
use crate::extract::{Finding, PageContext, Scan};
use scraper::Html;

pub(crate) fn scan_item(doc: &Html, ctx: &PageContext<'_>, equipment: bool, scan: &mut Scan) {
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

    let keys = &profile.keys;
    let record = ItemRecord {
        wiki_url: ctx.url.to_string(),
        image,
        description: read_field(scope, profile, &keys.description),
        rarity: read_field(scope, profile, &keys.rarity),
        category: read_field(scope, profile, &keys.category),
        id: read_field(scope, profile, &keys.id),
        unlock: read_field(scope, profile, &keys.unlock),
        cooldown: if equipment {
            read_field(scope, profile, &keys.cooldown)
        } else {
            None
        },
        flavor_text: text_of(scope, &profile.caption),
        stats: stat_rows(scope, &profile.stat_cells),
        name,
    };

    scan.records.push(if equipment {
        Record::Equipment(record)
    } else {
        Record::Item(record)
    });
}
