use crate::extract::dom::{cells_from, inner_text};
use crate::extract::normalize::camel_case_key;
use crate::extract::record::Fields;
use scraper::{ElementRef, Selector};

/// Reads a variable-width stat table
///
/// `anchors` matches the first cell of every stat row. The first match is the
/// header; its cells become camelCase keys. Every later row is zipped with
/// those keys by position.
pub fn stat_rows(scope: ElementRef<'_>, anchors: &Selector) -> Vec<Fields> {
    let mut rows = scope.select(anchors);
    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let keys: Vec<String> = cells_from(header)
        .into_iter()
        .map(|cell| camel_case_key(&inner_text(cell)))
        .collect();

    rows.filter_map(|anchor| {
        let values: Vec<String> = cells_from(anchor).into_iter().map(inner_text).collect();
        zip_row(&keys, &values)
    })
    .collect()
}

/// Zips header keys with one row's cell texts
///
/// Rows with fewer cells than the header are decorative or continuation rows
/// and yield `None`. Extra trailing cells are ignored.
pub fn zip_row(keys: &[String], values: &[String]) -> Option<Fields> {
    if keys.is_empty() || values.len() < keys.len() {
        return None;
    }
    Some(keys.iter().cloned().zip(values.iter().cloned()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::dom::parse_selector;
    use scraper::Html;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_zip_full_row_keeps_header_order() {
        let keys = strings(&["stat", "value", "stack", "add"]);
        let row = zip_row(&keys, &strings(&["Damage", "+15%", "Linear", "+15%"])).unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["stat", "value", "stack", "add"]);
    }

    #[test]
    fn test_zip_short_row_dropped() {
        let keys = strings(&["stat", "value", "stack", "add"]);
        assert!(zip_row(&keys, &strings(&["Damage", "+15%", "Linear"])).is_none());
    }

    #[test]
    fn test_stat_rows_from_table() {
        let html = r#"
            <table>
              <tr><th class="s">Stat</th><th>Value</th><th>Stack Type</th><th>Add</th></tr>
              <tr><td class="s">Damage</td><td>75%</td><td>Linear</td><td>+75%</td></tr>
              <tr><td class="s">Note</td><td>only</td><td>three</td></tr>
            </table>"#;
        let doc = Html::parse_document(html);
        let rows = stat_rows(doc.root_element(), &parse_selector(".s").unwrap());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("stackType"), Some("Linear"));
        assert_eq!(rows[0].get("add"), Some("+75%"));
    }

    #[test]
    fn test_no_anchor_means_no_stats() {
        let doc = Html::parse_document("<p>No table here</p>");
        assert!(stat_rows(doc.root_element(), &parse_selector(".s").unwrap()).is_empty());
    }
}
