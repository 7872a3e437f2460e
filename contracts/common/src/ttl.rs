use soroban_sdk::{Env, IntoVal, Val};

/// Remaining-ledger threshold below which an entry's TTL is bumped.
pub const TTL_THRESHOLD: u32 = 5_184_000;
/// Ledger count an entry's TTL is bumped to.
pub const TTL_EXTEND_TO: u32 = 10_368_000;

/// Extends the TTL of the calling contract's instance storage.
/// Instance storage TTL applies to every key stored there.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extends the TTL of a single persistent entry. The key must exist.
pub fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
