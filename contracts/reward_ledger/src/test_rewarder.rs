//! Rewarder hooks and misbehaving schedule providers.

extern crate std;

use soroban_sdk::{symbol_short, testutils::Address as _, Address, IntoVal};

use crate::events::HarvestEvent;
use crate::test::{
    expect_err, last_event, new_env, setup, setup_with_schedule, TestContext, FUNDING, START,
};
use crate::{ContractError, UserPosition};

use self::broken_schedule::BrokenSchedule;
use self::failing::FailingHook;
use self::negative_schedule::NegativeSchedule;
use self::recording::{HookCall, RecordingHook, RecordingHookClient};
use self::reentrant::{ReentrantHook, ReentrantHookClient};

// ── Test contracts ───────────────────────────────────────────────────────────

mod recording {
    use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol};

    const CALLS: Symbol = symbol_short!("CALLS");
    const LAST: Symbol = symbol_short!("LAST");

    #[contracttype]
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct HookCall {
        pub pool_id: u32,
        pub account: Address,
        pub amount: i128,
    }

    #[contract]
    pub struct RecordingHook;

    #[contractimpl]
    impl RecordingHook {
        pub fn on_staking_reward(env: Env, pool_id: u32, account: Address, amount: i128) {
            let calls: u32 = env.storage().instance().get(&CALLS).unwrap_or(0);
            env.storage().instance().set(&CALLS, &(calls + 1));
            env.storage().instance().set(
                &LAST,
                &HookCall {
                    pool_id,
                    account,
                    amount,
                },
            );
        }

        pub fn call_count(env: Env) -> u32 {
            env.storage().instance().get(&CALLS).unwrap_or(0)
        }

        pub fn last_call(env: Env) -> Option<HookCall> {
            env.storage().instance().get(&LAST)
        }
    }
}

mod failing {
    use soroban_sdk::{contract, contractimpl, Address, Env};

    #[contract]
    pub struct FailingHook;

    #[contractimpl]
    impl FailingHook {
        pub fn on_staking_reward(_env: Env, _pool_id: u32, _account: Address, _amount: i128) {
            panic!("hook refuses");
        }
    }
}

mod reentrant {
    use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

    use crate::RewardLedgerContractClient;

    const LEDGER: Symbol = symbol_short!("LEDGER");

    /// Calls back into the ledger from inside the harvest.
    #[contract]
    pub struct ReentrantHook;

    #[contractimpl]
    impl ReentrantHook {
        pub fn set_ledger(env: Env, ledger: Address) {
            env.storage().instance().set(&LEDGER, &ledger);
        }

        pub fn on_staking_reward(env: Env, pool_id: u32, _account: Address, _amount: i128) {
            let ledger: Address = env.storage().instance().get(&LEDGER).unwrap();
            RewardLedgerContractClient::new(&env, &ledger).update_pool(&pool_id);
        }
    }
}

mod broken_schedule {
    use soroban_sdk::{contract, contractimpl, Env};

    #[contract]
    pub struct BrokenSchedule;

    #[contractimpl]
    impl BrokenSchedule {
        pub fn get_rewards_for_block_range(_env: Env, _from_block: u32, _to_block: u32) -> i128 {
            panic!("schedule unavailable");
        }
    }
}

mod negative_schedule {
    use soroban_sdk::{contract, contractimpl, Env};

    #[contract]
    pub struct NegativeSchedule;

    #[contractimpl]
    impl NegativeSchedule {
        pub fn get_rewards_for_block_range(_env: Env, _from_block: u32, _to_block: u32) -> i128 {
            -1
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Pool with `rewarder` attached and `staked` units from a fresh staker,
/// advanced ten blocks at 100 per block.
fn staked_pool(ctx: &TestContext, rewarder: Option<Address>) -> (u32, Address, Address) {
    let lp = ctx
        .env
        .register_stellar_asset_contract_v2(Address::generate(&ctx.env))
        .address();
    let pool_id = ctx.client.add_pool(&ctx.admin, &1, &lp, &rewarder);
    let alice = ctx.staker(&lp, 100);
    ctx.client.deposit(&alice, &pool_id, &100, &alice);
    ctx.advance(10);
    (pool_id, lp, alice)
}

// ── Rewarder hooks ───────────────────────────────────────────────────────────

#[test]
fn test_harvest_notifies_rewarder() {
    let ctx = setup(100);
    let hook = ctx.env.register(RecordingHook, ());
    let hook_client = RecordingHookClient::new(&ctx.env, &hook);
    let (pid, _lp, alice) = staked_pool(&ctx, Some(hook.clone()));

    assert!(ctx.client.harvest(&alice, &pid, &alice));

    assert_eq!(hook_client.call_count(), 1);
    assert_eq!(
        hook_client.last_call(),
        Some(HookCall {
            pool_id: pid,
            account: alice.clone(),
            amount: 1_000,
        })
    );

    // A zero harvest still reaches the hook.
    assert!(ctx.client.harvest(&alice, &pid, &alice));
    assert_eq!(hook_client.call_count(), 2);
    assert_eq!(hook_client.last_call().map(|c| c.amount), Some(0));
}

#[test]
fn test_rewarder_sees_caller_not_recipient() {
    let ctx = setup(100);
    let hook = ctx.env.register(RecordingHook, ());
    let hook_client = RecordingHookClient::new(&ctx.env, &hook);
    let (pid, _lp, alice) = staked_pool(&ctx, Some(hook));
    let carol = Address::generate(&ctx.env);

    ctx.client.harvest(&alice, &pid, &carol);

    assert_eq!(hook_client.last_call().map(|c| c.account), Some(alice));
    assert_eq!(ctx.balance(&ctx.reward_token, &carol), 1_000);
}

#[test]
fn test_failing_rewarder_does_not_block_harvest() {
    let ctx = setup(100);
    let hook = ctx.env.register(FailingHook, ());
    let (pid, _lp, alice) = staked_pool(&ctx, Some(hook));

    assert!(!ctx.client.harvest(&alice, &pid, &alice));

    let (topics, payload): (_, HarvestEvent) =
        last_event(&ctx.env, symbol_short!("HARVEST")).unwrap();
    assert_eq!(
        topics,
        (symbol_short!("HARVEST"), alice.clone(), pid).into_val(&ctx.env)
    );
    assert_eq!(
        payload,
        HarvestEvent {
            caller: alice.clone(),
            pool_id: pid,
            amount: 1_000,
            recipient: alice.clone(),
            rewarder_ok: false,
            ledger: START + 10,
        }
    );

    assert_eq!(ctx.balance(&ctx.reward_token, &alice), 1_000);
    assert_eq!(ctx.client.get_position(&pid, &alice).reward_debt, 1_000);
    assert_eq!(ctx.client.pending_rewards(&pid, &alice), 0);
}

#[test]
fn test_failing_rewarder_on_withdraw_and_harvest() {
    let ctx = setup(100);
    let hook = ctx.env.register(FailingHook, ());
    let (pid, lp, alice) = staked_pool(&ctx, Some(hook));

    assert!(!ctx.client.withdraw_and_harvest(&alice, &pid, &100, &alice));

    assert_eq!(ctx.balance(&ctx.reward_token, &alice), 1_000);
    assert_eq!(ctx.balance(&lp, &alice), 100);
    assert_eq!(ctx.client.get_position(&pid, &alice), UserPosition::default());
}

#[test]
fn test_reentrant_rewarder_is_rejected() {
    let ctx = setup(100);
    let hook = ctx.env.register(ReentrantHook, ());
    ReentrantHookClient::new(&ctx.env, &hook).set_ledger(&ctx.client.address);
    let (pid, _lp, alice) = staked_pool(&ctx, Some(hook));

    assert!(!ctx.client.harvest(&alice, &pid, &alice));

    assert_eq!(ctx.balance(&ctx.reward_token, &alice), 1_000);
    assert_eq!(ctx.client.get_pool(&pid).last_reward_block, ctx.env.ledger().sequence());
}

#[test]
fn test_set_pool_rewarder_only_with_overwrite() {
    let ctx = setup(100);
    let recording = ctx.env.register(RecordingHook, ());
    let failing = ctx.env.register(FailingHook, ());
    let (pid, _lp, alice) = staked_pool(&ctx, Some(recording.clone()));

    ctx.client
        .set_pool(&ctx.admin, &pid, &1, &Some(failing.clone()), &false);
    assert_eq!(ctx.client.get_pool(&pid).rewarder, Some(recording));
    assert!(ctx.client.harvest(&alice, &pid, &alice));

    ctx.client
        .set_pool(&ctx.admin, &pid, &1, &Some(failing.clone()), &true);
    assert_eq!(ctx.client.get_pool(&pid).rewarder, Some(failing));
    assert!(!ctx.client.harvest(&alice, &pid, &alice));

    ctx.client.set_pool(&ctx.admin, &pid, &1, &None, &true);
    assert_eq!(ctx.client.get_pool(&pid).rewarder, None);
    assert!(ctx.client.harvest(&alice, &pid, &alice));
}

// ── Schedule failures ────────────────────────────────────────────────────────

#[test]
fn test_broken_schedule_blocks_accrual_but_not_emergency_exit() {
    let env = new_env();
    let admin = Address::generate(&env);
    let schedule = env.register(BrokenSchedule, ());
    let ctx = setup_with_schedule(env, admin, schedule, FUNDING);

    // First deposit into an empty pool in its creation block never queries
    // the schedule.
    let (pid, lp, alice) = staked_pool(&ctx, None);

    expect_err(ctx.client.try_update_pool(&pid), ContractError::ScheduleFailed);
    expect_err(
        ctx.client.try_pending_rewards(&pid, &alice),
        ContractError::ScheduleFailed,
    );
    expect_err(
        ctx.client.try_harvest(&alice, &pid, &alice),
        ContractError::ScheduleFailed,
    );
    expect_err(
        ctx.client.try_withdraw(&alice, &pid, &100, &alice),
        ContractError::ScheduleFailed,
    );

    ctx.client.emergency_withdraw(&alice, &pid, &alice);

    assert_eq!(ctx.balance(&lp, &alice), 100);
    assert_eq!(ctx.client.get_position(&pid, &alice), UserPosition::default());
    assert_eq!(ctx.client.get_pool(&pid).total_staked, 0);
}

#[test]
fn test_negative_schedule_answer_is_rejected() {
    let env = new_env();
    let admin = Address::generate(&env);
    let schedule = env.register(NegativeSchedule, ());
    let ctx = setup_with_schedule(env, admin, schedule, FUNDING);
    let (pid, _lp, _alice) = staked_pool(&ctx, None);

    expect_err(ctx.client.try_update_pool(&pid), ContractError::ScheduleFailed);
}

#[test]
fn test_empty_pool_never_queries_schedule() {
    let env = new_env();
    let admin = Address::generate(&env);
    let schedule = env.register(BrokenSchedule, ());
    let ctx = setup_with_schedule(env, admin, schedule, FUNDING);
    let (pid, _lp) = ctx.add_pool(1);

    ctx.advance(10);
    let pool = ctx.client.update_pool(&pid);

    assert_eq!(pool.last_reward_block, ctx.env.ledger().sequence());
    assert_eq!(pool.acc_rewards_per_share, 0);
}
