#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub schedule: Address,
    pub ledger: u32,
}

/// Fired when a pool is appended.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub alloc_point: u64,
    pub staked_token: Address,
    pub rewarder: Option<Address>,
    pub total_alloc_point: u64,
    pub ledger: u32,
}

/// Fired when a pool's weight or rewarder changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSetEvent {
    pub pool_id: u32,
    pub alloc_point: u64,
    pub rewarder: Option<Address>,
    pub rewarder_overwritten: bool,
    pub total_alloc_point: u64,
    pub ledger: u32,
}

/// Fired when accrual advances a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pool_id: u32,
    pub last_reward_block: u32,
    pub total_staked: i128,
    pub acc_rewards_per_share: i128,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub caller: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub beneficiary: Address,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub caller: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub recipient: Address,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub caller: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub recipient: Address,
    pub rewarder_ok: bool,
    pub ledger: u32,
}

/// Fired when a staker exits without rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub caller: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub recipient: Address,
    pub ledger: u32,
}

/// Fired when reward tokens are paid into the ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub total_received: i128,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PointsAllocatorSetEvent {
    pub allocator: Option<Address>,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub ledger: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub ledger: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, reward_token: Address, schedule: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            schedule,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    alloc_point: u64,
    staked_token: Address,
    rewarder: Option<Address>,
    total_alloc_point: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool_id),
        PoolAddedEvent {
            pool_id,
            alloc_point,
            staked_token,
            rewarder,
            total_alloc_point,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_set(
    env: &Env,
    pool_id: u32,
    alloc_point: u64,
    rewarder: Option<Address>,
    rewarder_overwritten: bool,
    total_alloc_point: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pool_id),
        PoolSetEvent {
            pool_id,
            alloc_point,
            rewarder,
            rewarder_overwritten,
            total_alloc_point,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_updated(
    env: &Env,
    pool_id: u32,
    last_reward_block: u32,
    total_staked: i128,
    acc_rewards_per_share: i128,
) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pool_id),
        PoolUpdatedEvent {
            pool_id,
            last_reward_block,
            total_staked,
            acc_rewards_per_share,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposit(
    env: &Env,
    caller: Address,
    pool_id: u32,
    amount: i128,
    beneficiary: Address,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), beneficiary.clone(), pool_id),
        DepositEvent {
            caller,
            pool_id,
            amount,
            beneficiary,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(env: &Env, caller: Address, pool_id: u32, amount: i128, recipient: Address) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), caller.clone(), pool_id),
        WithdrawEvent {
            caller,
            pool_id,
            amount,
            recipient,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_harvest(
    env: &Env,
    caller: Address,
    pool_id: u32,
    amount: i128,
    recipient: Address,
    rewarder_ok: bool,
) {
    env.events().publish(
        (symbol_short!("HARVEST"), caller.clone(), pool_id),
        HarvestEvent {
            caller,
            pool_id,
            amount,
            recipient,
            rewarder_ok,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdraw(
    env: &Env,
    caller: Address,
    pool_id: u32,
    amount: i128,
    recipient: Address,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), caller.clone(), pool_id),
        EmergencyWithdrawEvent {
            caller,
            pool_id,
            amount,
            recipient,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, funder: Address, amount: i128, total_received: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        RewardsFundedEvent {
            funder,
            amount,
            total_received,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_points_allocator_set(env: &Env, allocator: Option<Address>) {
    env.events().publish(
        (symbol_short!("ALLOC_SET"),),
        PointsAllocatorSetEvent {
            allocator,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            ledger: env.ledger().sequence(),
        },
    );
}
