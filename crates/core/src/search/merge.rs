//! Deduplication of raw records by title.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::{MergedItem, RawRecord};

/// Fold raw records into one [`MergedItem`] per distinct trimmed title.
///
/// Titles are compared case-sensitively after trimming whitespace; records
/// whose title is blank are dropped. The first record seen for a title
/// supplies the item's display fields, later ones only add provenance.
/// Every kept record contributes exactly one provenance entry.
///
/// The returned order is unspecified; ranking decides the final order.
pub fn merge(records: Vec<RawRecord>) -> Vec<MergedItem> {
    let mut by_title: HashMap<String, MergedItem> = HashMap::new();

    for record in records {
        let key = record.title.trim();
        if key.is_empty() {
            continue;
        }

        let provenance = record.provenance();
        match by_title.entry(key.to_string()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().sources.push(provenance);
            }
            Entry::Vacant(slot) => {
                let title = slot.key().clone();
                slot.insert(MergedItem {
                    title,
                    poster_url: record.poster_url,
                    remarks: record.remarks,
                    type_name: record.type_name,
                    sources: vec![provenance],
                });
            }
        }
    }

    by_title.into_values().collect()
}
