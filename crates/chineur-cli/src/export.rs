//! CSV export of the final result set.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use chineur_core::Listing;

const HEADER: [&str; 14] = [
    "source",
    "title",
    "price",
    "negotiated_price",
    "attribute_value_total",
    "estimated_margin",
    "detected_attributes",
    "location",
    "latitude",
    "longitude",
    "published_at",
    "image",
    "description",
    "url",
];

pub(crate) fn write_csv(path: &Path, listings: &[Listing]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_records(&mut writer, listings)?;
    writer.flush()?;
    Ok(())
}

fn write_records<W: Write>(writer: &mut csv::Writer<W>, listings: &[Listing]) -> csv::Result<()> {
    writer.write_record(HEADER)?;
    for listing in listings {
        writer.write_record(&record(listing))?;
    }
    Ok(())
}

fn record(listing: &Listing) -> Vec<String> {
    vec![
        listing.source.clone(),
        listing.title.clone(),
        number(listing.price),
        number(listing.negotiated_price),
        format!("{:.2}", listing.attribute_value_total),
        number(listing.estimated_margin),
        attributes_cell(&listing.detected_attributes),
        listing.location.clone().unwrap_or_default(),
        coordinate(listing.latitude),
        coordinate(listing.longitude),
        listing.published_at.clone().unwrap_or_default(),
        listing.images.first().cloned().unwrap_or_default(),
        listing.description.clone().unwrap_or_default(),
        listing.url.clone(),
    ]
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.2}"))
}

fn coordinate(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

/// `key:count` pairs, stable order, `;`-joined so the cell survives CSV
/// quoting untouched.
fn attributes_cell(attributes: &BTreeMap<String, u32>) -> String {
    attributes
        .iter()
        .map(|(key, count)| format!("{key}:{count}"))
        .collect::<Vec<_>>()
        .join(";")
}
