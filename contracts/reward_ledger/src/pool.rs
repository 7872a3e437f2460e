//! Pool and position records.
//!
//! Pools form an append-only array: ids are creation indices, never reused.
//! Positions are keyed by `(pool_id, account)` and read as zero until the
//! first write.

use common::ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const POOL: Symbol = symbol_short!("POOL");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const STAKED_TOKEN_POOL: Symbol = symbol_short!("STK_POOL");
const POSITION: Symbol = symbol_short!("POS");

/// Accounting state of one staking pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    /// Token deposited into this pool; no other pool uses it.
    pub staked_token: Address,
    pub alloc_point: u64,
    pub last_reward_block: u32,
    /// Cumulative reward per staked unit, scaled by `ACC_PRECISION`.
    pub acc_rewards_per_share: i128,
    pub total_staked: i128,
    pub rewarder: Option<Address>,
}

/// A staker's balance in one pool.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    /// Portion of `amount × acc_rewards_per_share` already accounted for.
    /// Goes negative when withdrawn principal carried more entitlement than
    /// the position had been charged for.
    pub reward_debt: i128,
}

// ── Pools ───────────────────────────────────────────────────────────────────

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

pub fn get_pool(env: &Env, pool_id: u32) -> Option<PoolInfo> {
    if pool_id >= pool_count(env) {
        return None;
    }
    env.storage().persistent().get(&(POOL, pool_id))
}

pub fn store_pool(env: &Env, pool_id: u32, pool: &PoolInfo) {
    let key = (POOL, pool_id);
    env.storage().persistent().set(&key, pool);
    ttl::extend_persistent(env, &key);
}

/// Appends `pool` and registers its staked token. Returns the new pool id.
pub fn push_pool(env: &Env, pool: &PoolInfo) -> u32 {
    let pool_id = pool_count(env);
    store_pool(env, pool_id, pool);
    env.storage().instance().set(&POOL_COUNT, &(pool_id + 1));

    let token_key = (STAKED_TOKEN_POOL, pool.staked_token.clone());
    env.storage().persistent().set(&token_key, &pool_id);
    ttl::extend_persistent(env, &token_key);

    pool_id
}

/// Id of the pool staking `token`, if one exists.
pub fn pool_for_token(env: &Env, token: &Address) -> Option<u32> {
    env.storage()
        .persistent()
        .get(&(STAKED_TOKEN_POOL, token.clone()))
}

// ── Positions ───────────────────────────────────────────────────────────────

pub fn get_position(env: &Env, pool_id: u32, account: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&(POSITION, pool_id, account.clone()))
        .unwrap_or_default()
}

pub fn store_position(env: &Env, pool_id: u32, account: &Address, position: &UserPosition) {
    let key = (POSITION, pool_id, account.clone());
    env.storage().persistent().set(&key, position);
    ttl::extend_persistent(env, &key);
}
