//! Generated identifiers for drafts, filings, payment orders, and
//! stored blobs. All formats embed a millisecond timestamp so IDs sort
//! roughly by creation time and collisions need the same millisecond
//! plus the same random suffix.

use chrono::Utc;
use rand::Rng;

const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| UPPER_ALNUM[rng.gen_range(0..UPPER_ALNUM.len())] as char)
        .collect()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Draft identifier, e.g. `DRAFT1724300000000X4K9QZ`.
pub fn draft_id() -> String {
    format!("DRAFT{}{}", now_millis(), random_suffix(6))
}

/// Filing reference issued at submission, e.g. `FL1724300000000A7PQ`.
pub fn filing_reference() -> String {
    format!("FL{}{}", now_millis(), random_suffix(4))
}

/// Payment order identifier, e.g. `EFILING_1724300000000_K2M8PQ4ZD`.
pub fn order_id() -> String {
    format!("EFILING_{}_{}", now_millis(), random_suffix(9))
}

/// Filing number issued on successful payment, e.g. `EF1724300000000`.
pub fn filing_number() -> String {
    format!("EF{}", now_millis())
}

/// Storage name for an uploaded blob: `files-<millis>-<rand><ext>`.
/// `ext` must already carry its leading dot (or be empty).
pub fn storage_name(ext: &str) -> String {
    let nonce: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("files-{}-{}{}", now_millis(), nonce, ext)
}
