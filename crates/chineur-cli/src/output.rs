//! Plain-text table rendering for search results.

use std::collections::BTreeMap;

use chineur_core::Listing;

const TITLE_WIDTH: usize = 48;

pub(crate) fn print_table(listings: &[Listing], valuated: bool) {
    if listings.is_empty() {
        println!("no listings");
        return;
    }
    for line in render_table(listings, valuated) {
        println!("{line}");
    }
}

/// Builds the aligned table as lines, header first. Columns are sized to
/// their widest cell; the URL column is last and unpadded.
fn render_table(listings: &[Listing], valuated: bool) -> Vec<String> {
    let mut rows = vec![header_cells(valuated)];
    rows.extend(listings.iter().map(|listing| row_cells(listing, valuated)));

    let columns = rows[0].len();
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i + 1 == columns {
                    line.push_str(cell);
                } else {
                    line.push_str(&format!("{cell:<width$}  ", width = widths[i]));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

fn header_cells(valuated: bool) -> Vec<String> {
    let mut cells = vec!["PRICE".to_string()];
    if valuated {
        cells.push("MARGIN".to_string());
    }
    cells.push("TITLE".to_string());
    cells.push("LOCATION".to_string());
    if valuated {
        cells.push("ATTRIBUTES".to_string());
    }
    cells.push("URL".to_string());
    cells
}

fn row_cells(listing: &Listing, valuated: bool) -> Vec<String> {
    let mut cells = vec![money(listing.price)];
    if valuated {
        cells.push(money(listing.estimated_margin));
    }
    cells.push(shorten(&listing.title));
    cells.push(listing.location.clone().unwrap_or_default());
    if valuated {
        cells.push(attributes_cell(&listing.detected_attributes));
    }
    cells.push(listing.url.clone());
    cells
}

fn money(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn attributes_cell(attributes: &BTreeMap<String, u32>) -> String {
    attributes
        .iter()
        .map(|(key, count)| {
            if *count == 1 {
                key.clone()
            } else {
                format!("{key} x{count}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn shorten(text: &str) -> String {
    if text.chars().count() <= TITLE_WIDTH {
        text.to_string()
    } else {
        let kept: String = text.chars().take(TITLE_WIDTH - 3).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, price: Option<f64>) -> Listing {
        let mut listing = Listing::new("https://x.test/ad/1".to_string(), title.to_string());
        listing.price = price;
        listing
    }

    #[test]
    fn renders_header_and_aligned_rows() {
        let mut cheap = listing("Petit prix", Some(12.0));
        cheap.location = Some("Nantes".to_string());
        let unpriced = listing("Sans prix", None);

        let lines = render_table(&[cheap, unpriced], false);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("PRICE"));
        assert!(lines[1].contains("12.00"));
        assert!(lines[1].contains("Nantes"));
        assert!(lines[2].starts_with('-'));
        // All price cells line up: TITLE appears at one column.
        let title_col = lines[0].find("TITLE").unwrap();
        assert_eq!(lines[1].find("Petit prix"), Some(title_col));
        assert_eq!(lines[2].find("Sans prix"), Some(title_col));
    }

    #[test]
    fn valuated_table_adds_margin_and_attribute_columns() {
        let mut valued = listing("PC gamer", Some(400.0));
        valued.estimated_margin = Some(84.0);
        valued.detected_attributes.insert("gpu_rtx_3070".to_string(), 1);
        valued.detected_attributes.insert("ram_16go".to_string(), 2);

        let lines = render_table(&[valued], true);

        assert!(lines[0].contains("MARGIN"));
        assert!(lines[0].contains("ATTRIBUTES"));
        assert!(lines[1].contains("84.00"));
        assert!(lines[1].contains("gpu_rtx_3070, ram_16go x2"));
    }

    #[test]
    fn long_titles_are_shortened() {
        let long = "a".repeat(80);
        let lines = render_table(&[listing(&long, None)], false);

        assert!(lines[1].contains("..."));
        assert!(!lines[1].contains(&long));
    }
}
