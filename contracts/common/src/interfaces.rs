//! Cross-contract interfaces used by the reward ledger.
//!
//! Each trait generates a typed client through `#[contractclient]`. The
//! ledger only ever talks to its schedule provider and rewarder hooks through
//! these clients, so any contract exporting a function with the same name and
//! argument list can be plugged in.

use soroban_sdk::{contractclient, Address, Env};

/// Emission curve queried by the ledger during accrual.
///
/// Implementations must be pure functions of the block range: for any range
/// ending at or below the current ledger sequence the result must never
/// change. Querying with `to_block < from_block` must fail.
#[contractclient(name = "RewardsScheduleClient")]
pub trait RewardsSchedule {
    fn get_rewards_for_block_range(env: Env, from_block: u32, to_block: u32) -> i128;
}

/// Secondary-reward callback attached to a pool.
///
/// Called after the primary reward of a harvest has been transferred. The
/// ledger isolates every failure of this call; implementations cannot make a
/// harvest fail.
#[contractclient(name = "RewarderHookClient")]
pub trait RewarderHook {
    fn on_staking_reward(env: Env, pool_id: u32, account: Address, amount: i128);
}
