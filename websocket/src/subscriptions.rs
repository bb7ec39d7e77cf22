//! Subscription shapes a real collaborator would exchange with clients.
//!
//! Kept serde-free on purpose: this crate depends on nothing but
//! `procd-types`, so these are plain structs a future implementation can
//! derive `Serialize`/`Deserialize` onto once it pulls in `serde` itself.

use procd_types::Schema;

/// A subscription request from a client, addressed by topic name rather
/// than a fixed enum — topics are this collaborator's concern, not the
/// RPC core's, so nothing here is baked into `procd-types`.
#[derive(Clone, Debug)]
pub struct SubscriptionRequest {
    pub topic: String,
    pub filter: Option<SubscriptionFilter>,
}

/// Optional filter narrowing a subscription to specific keys.
#[derive(Clone, Debug)]
pub struct SubscriptionFilter {
    pub keys: Option<Vec<String>>,
}

/// An event pushed to a subscribed client.
///
/// `schema` documents the shape `data` is expected to satisfy, reusing
/// the same `Schema` tree the RPC core validates request params against,
/// so a client library can share one validator across both paths.
#[derive(Clone, Debug)]
pub struct SubscriptionEvent {
    pub topic: String,
    pub schema: Option<Schema>,
    pub data: String,
    pub timestamp_unix_secs: u64,
}
