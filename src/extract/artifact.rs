//! The artifacts page: one artifact per table row

use crate::extract::dom::{inner_text, is_header_row, row_cells, select_all, select_first};
use crate::extract::media::{image_from, queue};
use crate::extract::record::{ArtifactRecord, EntityName, Record};
use crate::extract::{Finding, PageContext, Scan};
use scraper::{ElementRef, Html, Selector};

pub(crate) fn scan_artifacts(doc: &Html, ctx: &PageContext<'_>, scan: &mut Scan) {
    let profile = ctx.profile;
    let columns = &profile.artifact_columns;

    for row in select_all(doc.root_element(), &profile.artifact_row) {
        if is_header_row(row) {
            continue;
        }
        let cells = row_cells(row);
        if cells.is_empty() {
            continue;
        }

        let Some(name) = cells
            .get(columns.name_column)
            .map(|cell| inner_text(*cell))
            .and_then(|t| EntityName::new(&t))
        else {
            scan.findings.push(Finding::Nameless {
                url: ctx.url.to_string(),
            });
            continue;
        };

        let icon = cells
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != columns.code_column)
            .find_map(|(_, cell)| select_first(*cell, &profile.icon));
        let image = queue(
            icon.and_then(|img| image_from(img, profile, ctx.root, name.as_str())),
            &mut scan.images,
        );

        scan.records.push(Record::Artifact(ArtifactRecord {
            wiki_url: ctx.url.to_string(),
            image,
            code: cells
                .get(columns.code_column)
                .and_then(|cell| artifact_code(*cell, &profile.icon)),
            description: cells
                .get(columns.description_column)
                .map(|cell| inner_text(*cell))
                .filter(|t| !t.is_empty()),
            name,
        }));
    }
}

/// The artifact code as one contiguous character per glyph
///
/// Readers slice the code into rows of three, so whitespace is dropped. A
/// cell drawn with glyph images contributes the first character of each alt.
fn artifact_code(cell: ElementRef<'_>, icon: &Selector) -> Option<String> {
    let text: String = inner_text(cell).chars().filter(|c| !c.is_whitespace()).collect();
    if !text.is_empty() {
        return Some(text);
    }

    let glyphs: String = select_all(cell, icon)
        .into_iter()
        .filter_map(|img| img.value().attr("alt"))
        .filter_map(|alt| alt.trim().chars().next())
        .collect();

    if glyphs.is_empty() {
        None
    } else {
        Some(glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::scan_html;
    use crate::extract::EntityKind;

    const ARTIFACTS: &str = r#"
        <table class="wikitable">
          <tr><th>Icon</th><th>Artifact</th><th>Code</th><th>Description</th></tr>
          <tr>
            <td><img src="/images/Artifact_of_Honor.png" data-image-name="Artifact of Honor.png"></td>
            <td>Artifact of Honor</td>
            <td><img src="/images/g1.png" alt="Circle"><img src="/images/g2.png" alt="Triangle"></td>
            <td>Enemies can only spawn as elites.</td>
          </tr>
          <tr>
            <td></td><td>Artifact of Command</td><td>ABC DEF</td><td>Choose your items.</td>
          </tr>
        </table>"#;

    fn artifacts() -> Vec<ArtifactRecord> {
        let scan = scan_html(
            EntityKind::Artifact,
            ARTIFACTS,
            "https://riskofrain2.fandom.com/wiki/Artifacts",
        );
        assert_eq!(scan.images.len(), 1);
        scan.records
            .into_iter()
            .map(|r| match r {
                Record::Artifact(a) => a,
                other => panic!("expected an artifact, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_artifact_rows() {
        let records = artifacts();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_str(), "Artifact of Honor");
        assert_eq!(
            records[0].image.as_ref().unwrap().img_name,
            "ArtifactofHonor.png"
        );
        assert_eq!(
            records[1].description.as_deref(),
            Some("Choose your items.")
        );
    }

    #[test]
    fn test_code_from_text_or_glyphs() {
        let records = artifacts();
        assert_eq!(records[0].code.as_deref(), Some("CT"));
        assert_eq!(records[1].code.as_deref(), Some("ABCDEF"));
    }

    #[test]
    fn test_glyph_code_is_nine_contiguous_characters() {
        let glyph = |alt: &str| format!(r#"<img src="/images/{0}.png" alt="{0}">"#, alt);
        let code: String = ["Square", "Circle", "Triangle", "Diamond", "Square", "Circle", "Triangle", "Diamond", "Square"]
            .iter()
            .map(|alt| glyph(alt))
            .collect();
        let html = format!(
            r#"<table class="wikitable">
                 <tr><th>Icon</th><th>Artifact</th><th>Code</th><th>Description</th></tr>
                 <tr><td></td><td>Artifact of Chaos</td><td>{}</td><td>Friendly fire is enabled.</td></tr>
               </table>"#,
            code
        );

        let scan = scan_html(EntityKind::Artifact, &html, "https://riskofrain2.fandom.com/wiki/Artifacts");
        let Record::Artifact(artifact) = &scan.records[0] else {
            panic!("expected an artifact");
        };
        assert_eq!(artifact.code.as_deref(), Some("SCTDSCTDS"));
    }
}
