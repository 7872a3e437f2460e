use soroban_sdk::{Env, I256};

/// Fixed-point scaling factor for `acc_rewards_per_share`.
///
/// Per-share values are multiplied by this constant before storage so that
/// pools with a large staked supply still accrue sub-unit rewards per block.
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// `a × b / denom`, truncated, with the product held in 256 bits.
///
/// Only the quotient has to fit an `i128`. Returns `None` when it does not,
/// or when `denom` is zero.
pub fn mul_div(env: &Env, a: i128, b: i128, denom: i128) -> Option<i128> {
    if denom == 0 {
        return None;
    }
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, denom))
        .to_i128()
}

/// Share of `scheduled` owed to a pool holding `alloc_point` of
/// `total_alloc_point` weight, truncated.
///
/// A ledger with no weight at all distributes nothing.
pub fn pool_reward(
    env: &Env,
    scheduled: i128,
    alloc_point: u64,
    total_alloc_point: u64,
) -> Option<i128> {
    if total_alloc_point == 0 {
        return Some(0);
    }
    mul_div(
        env,
        scheduled,
        i128::from(alloc_point),
        i128::from(total_alloc_point),
    )
}

/// Advance a pool's per-share accumulator by `reward` spread over
/// `total_staked` units:
///
/// ```text
/// acc' = acc + reward × ACC_PRECISION / total_staked
/// ```
///
/// With nothing staked the accumulator is returned unchanged: the reward for
/// that interval is not carried forward.
pub fn accrue(env: &Env, acc: i128, reward: i128, total_staked: i128) -> Option<i128> {
    if total_staked <= 0 {
        return Some(acc);
    }
    let delta = mul_div(env, reward, ACC_PRECISION, total_staked)?;
    acc.checked_add(delta)
}

/// Reward `amount` staked units are entitled to at accumulator `acc`.
pub fn entitlement(env: &Env, amount: i128, acc: i128) -> Option<i128> {
    mul_div(env, amount, acc, ACC_PRECISION)
}

/// Payable reward for a position: `entitlement − reward_debt`, floored at zero.
///
/// Truncation in `entitlement` can leave the difference at −1 after a partial
/// withdrawal; that is never payable and never owed back.
pub fn pending(env: &Env, amount: i128, acc: i128, reward_debt: i128) -> Option<i128> {
    let accumulated = entitlement(env, amount, acc)?;
    Some(accumulated.checked_sub(reward_debt)?.max(0))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
