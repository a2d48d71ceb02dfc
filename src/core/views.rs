//! Partitioning of normalized records into the exported views.

use crate::core::prize::extract_prize_value;
use crate::domain::model::{Record, Snapshot, View, ViewKind};
use std::cmp::Reverse;

const ONLINE: &str = "online";

/// Records belonging to `kind`. Views are independent: a record can appear in
/// several of them.
pub fn select(kind: ViewKind, records: &[Record]) -> Vec<Record> {
    match kind {
        ViewKind::All => records.to_vec(),
        ViewKind::Online => records
            .iter()
            .filter(|r| r.location() == ONLINE)
            .cloned()
            .collect(),
        ViewKind::Offline => records
            .iter()
            .filter(|r| {
                let location = r.location();
                !location.is_empty() && location != ONLINE
            })
            .cloned()
            .collect(),
        ViewKind::Featured => records.iter().filter(|r| r.is_featured()).cloned().collect(),
        ViewKind::ByPrize => sort_by_prize(records),
    }
}

/// Records with a prize text, highest extracted amount first. Ties keep their
/// input order.
pub fn sort_by_prize(records: &[Record]) -> Vec<Record> {
    let mut keyed: Vec<(u64, &Record)> = records
        .iter()
        .filter_map(|r| r.prize_text().map(|text| (extract_prize_value(Some(text)), r)))
        .collect();

    keyed.sort_by_key(|(value, _)| Reverse(*value));
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

pub fn build_views(records: &[Record], kinds: &[ViewKind], generated_at: &str) -> Vec<View> {
    kinds
        .iter()
        .map(|&kind| {
            let selected = select(kind, records);
            tracing::debug!("View '{}' selected {} records", kind, selected.len());
            View {
                kind,
                snapshot: Snapshot::new(generated_at, selected),
            }
        })
        .collect()
}
