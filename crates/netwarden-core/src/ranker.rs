// ── Top-consumer ranker ──
//
// Collapses the per-domain byte map from a snapshot into a sorted,
// capped, display-ready list. Grouping uses a two-label root heuristic
// (see `normalize_root`) — a deliberate eTLD+1 approximation.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::fmt::format_bytes;
use crate::model::RankedConsumer;

/// Maximum number of consumers shown on the dashboard.
pub const TOP_CONSUMER_LIMIT: usize = 5;

/// Collapse a domain to its grouping root.
///
/// Dotted IPv4 literals pass through unchanged. Anything else keeps
/// only its last two labels (`cdn.static.example.com` → `example.com`).
/// Known limitation: multi-label public suffixes mis-group
/// (`a.example.co.uk` → `co.uk`). This is documented behavior, kept
/// intentionally.
pub fn normalize_root(domain: &str) -> String {
    if domain.parse::<Ipv4Addr>().is_ok() {
        return domain.to_owned();
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        domain.to_owned()
    }
}

/// Rank the snapshot's domain→bytes map into at most
/// [`TOP_CONSUMER_LIMIT`] consumers.
///
/// Bytes for domains sharing a root are summed. Sort key is raw bytes
/// descending with a lexical tie-break on the root, so the output is
/// deterministic for any input map. Raw value and formatted string are
/// produced in the same pass.
pub fn rank_top_consumers(top_domains: &HashMap<String, u64>) -> Vec<RankedConsumer> {
    // BTreeMap keeps grouping iteration deterministic regardless of
    // the hash map's ordering.
    let mut grouped: BTreeMap<String, u64> = BTreeMap::new();
    for (domain, bytes) in top_domains {
        let root = normalize_root(domain);
        *grouped.entry(root).or_insert(0) += bytes;
    }

    let mut ranked: Vec<(String, u64)> = grouped.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_CONSUMER_LIMIT);

    ranked
        .into_iter()
        .map(|(root, bytes)| RankedConsumer {
            formatted: format_bytes(bytes),
            display_domain: root,
            raw_bytes: bytes,
        })
        .collect()
}
