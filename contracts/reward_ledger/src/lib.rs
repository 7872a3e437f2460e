#![no_std]

pub mod events;
pub mod pool;
pub mod rewards;

use common::{ownership, ttl, CommonError, RewarderHookClient, RewardsScheduleClient};
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, Env, Symbol, Vec,
};

pub use pool::{PoolInfo, UserPosition};
pub use rewards::ACC_PRECISION;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const SCHEDULE: Symbol = symbol_short!("SCHEDULE");
const TOTAL_ALLOC_POINT: Symbol = symbol_short!("TOT_ALLOC");
const POINTS_ALLOCATOR: Symbol = symbol_short!("ALLOCATOR");
const REWARDS_RECEIVED: Symbol = symbol_short!("RWD_RCVD");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    DuplicatePool = 6,
    InvalidPool = 7,
    TokensIdentical = 8,
    ScheduleFailed = 9,
    ArithmeticOverflow = 10,
    NoPendingAdmin = 11,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::NoPendingAdmin => ContractError::NoPendingAdmin,
        }
    }
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardLedgerContract;

#[contractimpl]
impl RewardLedgerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `reward_token` – SAC address of the token paid out on harvest.
    /// * `schedule`     – contract answering `get_rewards_for_block_range`.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        schedule: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&SCHEDULE, &schedule);
        env.storage().instance().set(&TOTAL_ALLOC_POINT, &0u64);
        ownership::set_admin(&env, &admin);
        ttl::extend_instance(&env);

        events::publish_initialized(&env, admin, reward_token, schedule);

        Ok(())
    }

    // ── Pool configuration ──────────────────────────────────────────────────

    /// Append a pool for `staked_token` and return its id.
    ///
    /// Other pools are not accrued first: call `mass_update_pools` before
    /// changing weights if their pending rewards must be settled at the old
    /// split.
    pub fn add_pool(
        env: Env,
        caller: Address,
        alloc_point: u64,
        staked_token: Address,
        rewarder: Option<Address>,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_pool_manager(&env, &caller)?;

        if staked_token == Self::reward_token(&env)? {
            return Err(ContractError::TokensIdentical);
        }
        if pool::pool_for_token(&env, &staked_token).is_some() {
            return Err(ContractError::DuplicatePool);
        }

        let total_alloc_point = Self::total_alloc_point(env.clone())
            .checked_add(alloc_point)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let pool_id = pool::push_pool(
            &env,
            &PoolInfo {
                staked_token: staked_token.clone(),
                alloc_point,
                last_reward_block: env.ledger().sequence(),
                acc_rewards_per_share: 0,
                total_staked: 0,
                rewarder: rewarder.clone(),
            },
        );
        env.storage()
            .instance()
            .set(&TOTAL_ALLOC_POINT, &total_alloc_point);
        ttl::extend_instance(&env);

        events::publish_pool_added(
            &env,
            pool_id,
            alloc_point,
            staked_token,
            rewarder,
            total_alloc_point,
        );

        Ok(pool_id)
    }

    /// Change a pool's weight and, when `overwrite_rewarder` is set, its
    /// rewarder. With `overwrite_rewarder == false` the `rewarder` argument
    /// is ignored.
    pub fn set_pool(
        env: Env,
        caller: Address,
        pool_id: u32,
        alloc_point: u64,
        rewarder: Option<Address>,
        overwrite_rewarder: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_pool_manager(&env, &caller)?;

        let mut pool = pool::get_pool(&env, pool_id).ok_or(ContractError::InvalidPool)?;

        let total_alloc_point = Self::total_alloc_point(env.clone())
            .checked_sub(pool.alloc_point)
            .and_then(|t| t.checked_add(alloc_point))
            .ok_or(ContractError::ArithmeticOverflow)?;

        pool.alloc_point = alloc_point;
        if overwrite_rewarder {
            pool.rewarder = rewarder;
        }
        pool::store_pool(&env, pool_id, &pool);
        env.storage()
            .instance()
            .set(&TOTAL_ALLOC_POINT, &total_alloc_point);
        ttl::extend_instance(&env);

        events::publish_pool_set(
            &env,
            pool_id,
            alloc_point,
            pool.rewarder,
            overwrite_rewarder,
            total_alloc_point,
        );

        Ok(())
    }

    /// Delegate pool management to `allocator`, or revoke it with `None`.
    ///
    /// Only the owner may call this.
    pub fn set_points_allocator(
        env: Env,
        caller: Address,
        allocator: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        ownership::require_admin(&env, &caller)?;

        match &allocator {
            Some(a) => env.storage().instance().set(&POINTS_ALLOCATOR, a),
            None => env.storage().instance().remove(&POINTS_ALLOCATOR),
        }

        events::publish_points_allocator_set(&env, allocator);

        Ok(())
    }

    // ── Accrual ─────────────────────────────────────────────────────────────

    /// Bring a pool's accumulator up to the current block.
    ///
    /// A second call within the same block changes nothing.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        Self::require_initialized(&env)?;
        Self::accrue_pool(&env, pool_id)
    }

    /// Update every pool in `pool_ids`, in order. All ids are validated
    /// before any pool is touched.
    pub fn mass_update_pools(env: Env, pool_ids: Vec<u32>) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;

        let count = pool::pool_count(&env);
        if pool_ids.iter().any(|id| id >= count) {
            return Err(ContractError::InvalidPool);
        }
        for pool_id in pool_ids.iter() {
            Self::accrue_pool(&env, pool_id)?;
        }
        Ok(())
    }

    /// Reward `account` would receive from `harvest` in the current block.
    pub fn pending_rewards(env: Env, pool_id: u32, account: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let pool = pool::get_pool(&env, pool_id).ok_or(ContractError::InvalidPool)?;
        let acc = Self::projected_acc(&env, &pool)?;
        let position = pool::get_position(&env, pool_id, &account);

        rewards::pending(&env, position.amount, acc, position.reward_debt)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` from `caller` into the position of `beneficiary`.
    ///
    /// The pool is accrued before the position changes, and the new stake is
    /// charged debt at the current accumulator so it earns nothing from
    /// before it existed. A zero amount is accepted.
    pub fn deposit(
        env: Env,
        caller: Address,
        pool_id: u32,
        amount: i128,
        beneficiary: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = Self::accrue_pool(&env, pool_id)?;
        let staked_token = token::Client::new(&env, &pool.staked_token);
        if staked_token.balance(&caller) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let mut position = pool::get_position(&env, pool_id, &beneficiary);
        let debt = Self::entitlement(&env, amount, pool.acc_rewards_per_share)?;
        position.amount = Self::add(position.amount, amount)?;
        position.reward_debt = Self::add(position.reward_debt, debt)?;
        pool.total_staked = Self::add(pool.total_staked, amount)?;

        pool::store_position(&env, pool_id, &beneficiary, &position);
        pool::store_pool(&env, pool_id, &pool);
        ttl::extend_instance(&env);

        staked_token.transfer(&caller, &env.current_contract_address(), &amount);

        events::publish_deposit(&env, caller, pool_id, amount, beneficiary);

        Ok(())
    }

    /// Withdraw `amount` of the caller's stake and send it to `recipient`.
    ///
    /// Unharvested reward stays with the caller's position.
    pub fn withdraw(
        env: Env,
        caller: Address,
        pool_id: u32,
        amount: i128,
        recipient: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = Self::accrue_pool(&env, pool_id)?;
        let mut position = pool::get_position(&env, pool_id, &caller);
        if position.amount < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let released = Self::entitlement(&env, amount, pool.acc_rewards_per_share)?;
        position.reward_debt = Self::sub(position.reward_debt, released)?;
        position.amount = Self::sub(position.amount, amount)?;
        pool.total_staked = Self::sub(pool.total_staked, amount)?;

        pool::store_position(&env, pool_id, &caller, &position);
        pool::store_pool(&env, pool_id, &pool);
        ttl::extend_instance(&env);

        token::Client::new(&env, &pool.staked_token).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );

        events::publish_withdraw(&env, caller, pool_id, amount, recipient);

        Ok(())
    }

    /// Pay the caller's pending reward to `recipient`, then notify the pool's
    /// rewarder.
    ///
    /// Returns whether the rewarder call succeeded (`true` when the pool has
    /// none). A failing rewarder never fails the harvest.
    pub fn harvest(
        env: Env,
        caller: Address,
        pool_id: u32,
        recipient: Address,
    ) -> Result<bool, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let pool = Self::accrue_pool(&env, pool_id)?;
        let mut position = pool::get_position(&env, pool_id, &caller);

        let accumulated = Self::entitlement(&env, position.amount, pool.acc_rewards_per_share)?;
        let pending = Self::sub(accumulated, position.reward_debt)?.max(0);
        let reward_token = Self::require_reward_balance(&env, pending)?;

        position.reward_debt = accumulated;
        pool::store_position(&env, pool_id, &caller, &position);
        ttl::extend_instance(&env);

        reward_token.transfer(&env.current_contract_address(), &recipient, &pending);
        let rewarder_ok = Self::notify_rewarder(&env, &pool, pool_id, &caller, pending);

        events::publish_harvest(&env, caller, pool_id, pending, recipient, rewarder_ok);

        Ok(rewarder_ok)
    }

    /// Withdraw `amount` and harvest in one accrual, sending principal and
    /// reward to `recipient`. Returns the rewarder outcome like `harvest`.
    pub fn withdraw_and_harvest(
        env: Env,
        caller: Address,
        pool_id: u32,
        amount: i128,
        recipient: Address,
    ) -> Result<bool, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let mut pool = Self::accrue_pool(&env, pool_id)?;
        let mut position = pool::get_position(&env, pool_id, &caller);
        if position.amount < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let acc = pool.acc_rewards_per_share;
        let accumulated = Self::entitlement(&env, position.amount, acc)?;
        let pending = Self::sub(accumulated, position.reward_debt)?.max(0);
        let reward_token = Self::require_reward_balance(&env, pending)?;

        position.reward_debt = Self::sub(accumulated, Self::entitlement(&env, amount, acc)?)?;
        position.amount = Self::sub(position.amount, amount)?;
        pool.total_staked = Self::sub(pool.total_staked, amount)?;

        pool::store_position(&env, pool_id, &caller, &position);
        pool::store_pool(&env, pool_id, &pool);
        ttl::extend_instance(&env);

        let this = env.current_contract_address();
        reward_token.transfer(&this, &recipient, &pending);
        token::Client::new(&env, &pool.staked_token).transfer(&this, &recipient, &amount);
        let rewarder_ok = Self::notify_rewarder(&env, &pool, pool_id, &caller, pending);

        events::publish_withdraw(&env, caller.clone(), pool_id, amount, recipient.clone());
        events::publish_harvest(&env, caller, pool_id, pending, recipient, rewarder_ok);

        Ok(rewarder_ok)
    }

    /// Return the caller's whole stake to `recipient`, forfeiting unharvested
    /// reward.
    ///
    /// Never consults the schedule and never accrues, so it keeps working
    /// when the accrual path is broken.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        pool_id: u32,
        recipient: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let mut pool = pool::get_pool(&env, pool_id).ok_or(ContractError::InvalidPool)?;
        let position = pool::get_position(&env, pool_id, &caller);
        let amount = position.amount;

        pool.total_staked = Self::sub(pool.total_staked, amount)?;
        pool::store_position(&env, pool_id, &caller, &UserPosition::default());
        pool::store_pool(&env, pool_id, &pool);
        ttl::extend_instance(&env);

        token::Client::new(&env, &pool.staked_token).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );

        events::publish_emergency_withdraw(&env, caller, pool_id, amount, recipient);

        Ok(())
    }

    // ── Funding ─────────────────────────────────────────────────────────────

    /// Pull `amount` reward tokens from `funder` into the ledger.
    pub fn fund_rewards(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        funder.require_auth();
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let reward_token = token::Client::new(&env, &Self::reward_token(&env)?);
        if reward_token.balance(&funder) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let total_received = Self::add(Self::rewards_received(env.clone()), amount)?;
        env.storage()
            .instance()
            .set(&REWARDS_RECEIVED, &total_received);
        ttl::extend_instance(&env);

        reward_token.transfer(&funder, &env.current_contract_address(), &amount);

        events::publish_rewards_funded(&env, funder, amount, total_received);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn pool_length(env: Env) -> u32 {
        pool::pool_count(&env)
    }

    pub fn get_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        pool::get_pool(&env, pool_id).ok_or(ContractError::InvalidPool)
    }

    pub fn get_position(
        env: Env,
        pool_id: u32,
        account: Address,
    ) -> Result<UserPosition, ContractError> {
        if pool_id >= pool::pool_count(&env) {
            return Err(ContractError::InvalidPool);
        }
        Ok(pool::get_position(&env, pool_id, &account))
    }

    /// Id of the pool staking `staked_token`, if any.
    pub fn pool_id_for_token(env: Env, staked_token: Address) -> Option<u32> {
        pool::pool_for_token(&env, &staked_token)
    }

    pub fn total_alloc_point(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&TOTAL_ALLOC_POINT)
            .unwrap_or(0)
    }

    pub fn get_points_allocator(env: Env) -> Option<Address> {
        env.storage().instance().get(&POINTS_ALLOCATOR)
    }

    /// Running total of reward tokens paid in through `fund_rewards`.
    pub fn rewards_received(env: Env) -> i128 {
        env.storage().instance().get(&REWARDS_RECEIVED).unwrap_or(0)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Self::reward_token(&env)
    }

    pub fn get_schedule(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&SCHEDULE)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        ownership::get_admin(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        ownership::get_pending_admin(&env)
    }

    /// Propose a new owner. The new owner must call `accept_admin` to
    /// complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        ownership::propose(&env, &current_admin, &new_admin)?;

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();
        let old_admin = ownership::accept(&env, &new_admin)?;

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        let cancelled = ownership::cancel(&env, &current_admin)?;

        events::publish_admin_transfer_cancelled(&env, current_admin, cancelled);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: the owner always passes; the points allocator passes while one
    /// is set.
    fn require_pool_manager(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if ownership::is_admin(env, caller) {
            return Ok(());
        }
        match Self::get_points_allocator(env.clone()) {
            Some(allocator) if allocator == *caller => Ok(()),
            _ => Err(ContractError::Unauthorized),
        }
    }

    fn reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Guard: revert if the ledger cannot pay `amount` reward tokens.
    fn require_reward_balance(
        env: &Env,
        amount: i128,
    ) -> Result<token::Client<'_>, ContractError> {
        let reward_token = token::Client::new(env, &Self::reward_token(env)?);
        if reward_token.balance(&env.current_contract_address()) < amount {
            return Err(ContractError::InsufficientBalance);
        }
        Ok(reward_token)
    }

    /// Accumulator value `pool` would have if accrued in the current block.
    ///
    /// Pools with nothing staked skip the schedule entirely: their share of
    /// the interval is forfeited rather than saved for later.
    fn projected_acc(env: &Env, pool: &PoolInfo) -> Result<i128, ContractError> {
        let current = env.ledger().sequence();
        if current <= pool.last_reward_block || pool.total_staked <= 0 {
            return Ok(pool.acc_rewards_per_share);
        }

        let scheduled = Self::scheduled_rewards(env, pool.last_reward_block, current)?;
        let reward = rewards::pool_reward(
            env,
            scheduled,
            pool.alloc_point,
            Self::total_alloc_point(env.clone()),
        )
        .ok_or(ContractError::ArithmeticOverflow)?;

        rewards::accrue(env, pool.acc_rewards_per_share, reward, pool.total_staked)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Accrue `pool_id` up to the current block and persist it.
    fn accrue_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        let mut pool = pool::get_pool(env, pool_id).ok_or(ContractError::InvalidPool)?;
        let current = env.ledger().sequence();
        if current <= pool.last_reward_block {
            return Ok(pool);
        }

        pool.acc_rewards_per_share = Self::projected_acc(env, &pool)?;
        pool.last_reward_block = current;
        pool::store_pool(env, pool_id, &pool);

        events::publish_pool_updated(
            env,
            pool_id,
            pool.last_reward_block,
            pool.total_staked,
            pool.acc_rewards_per_share,
        );

        Ok(pool)
    }

    /// Query the schedule, mapping any failure or negative answer to
    /// `ScheduleFailed`.
    fn scheduled_rewards(env: &Env, from: u32, to: u32) -> Result<i128, ContractError> {
        let schedule = Self::get_schedule(env.clone())?;
        match RewardsScheduleClient::new(env, &schedule).try_get_rewards_for_block_range(&from, &to) {
            Ok(Ok(amount)) if amount >= 0 => Ok(amount),
            _ => {
                log!(env, "schedule query failed", schedule, from, to);
                Err(ContractError::ScheduleFailed)
            }
        }
    }

    /// Invoke the pool's rewarder, isolating every failure it can raise.
    ///
    /// The callee runs inside the host's metered budget and any state it
    /// wrote is rolled back when it fails.
    fn notify_rewarder(
        env: &Env,
        pool: &PoolInfo,
        pool_id: u32,
        account: &Address,
        amount: i128,
    ) -> bool {
        let Some(rewarder) = pool.rewarder.as_ref() else {
            return true;
        };
        let result =
            RewarderHookClient::new(env, rewarder).try_on_staking_reward(&pool_id, account, &amount);
        let ok = matches!(result, Ok(Ok(())));
        if !ok {
            log!(env, "rewarder hook failed", pool_id, rewarder.clone(), amount);
        }
        ok
    }

    fn entitlement(env: &Env, amount: i128, acc: i128) -> Result<i128, ContractError> {
        rewards::entitlement(env, amount, acc).ok_or(ContractError::ArithmeticOverflow)
    }

    fn add(a: i128, b: i128) -> Result<i128, ContractError> {
        a.checked_add(b).ok_or(ContractError::ArithmeticOverflow)
    }

    fn sub(a: i128, b: i128) -> Result<i128, ContractError> {
        a.checked_sub(b).ok_or(ContractError::ArithmeticOverflow)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_rewarder;
