//! Single-owner storage with a two-step transfer.
//!
//! The owner lives in instance storage of the calling contract. Callers must
//! have authenticated the relevant address with `require_auth()` before
//! calling any mutating helper here.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::CommonError;

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

// ── Core Functions ───────────────────────────────────────────────────────────

/// Stores `admin` as owner. Only callable internally during initialisation.
pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

/// Returns true if `caller` is the stored owner.
pub fn is_admin(env: &Env, caller: &Address) -> bool {
    get_admin(env).map_or(false, |admin| admin == *caller)
}

/// Guard: reverts if `caller` is not the stored owner.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), CommonError> {
    let admin = get_admin(env).ok_or(CommonError::NotInitialized)?;
    if admin != *caller {
        return Err(CommonError::AccessDenied);
    }
    Ok(())
}

pub fn get_pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

// ── Two-step transfer ────────────────────────────────────────────────────────

/// Records `new_admin` as the proposed owner. A later proposal replaces an
/// earlier one.
pub fn propose(env: &Env, current_admin: &Address, new_admin: &Address) -> Result<(), CommonError> {
    require_admin(env, current_admin)?;
    env.storage().instance().set(&PENDING_ADMIN, new_admin);
    Ok(())
}

/// Completes a pending transfer and returns the previous owner.
pub fn accept(env: &Env, new_admin: &Address) -> Result<Address, CommonError> {
    let pending = get_pending_admin(env).ok_or(CommonError::NoPendingAdmin)?;
    if pending != *new_admin {
        return Err(CommonError::AccessDenied);
    }
    let old_admin = get_admin(env).ok_or(CommonError::NotInitialized)?;

    env.storage().instance().set(&ADMIN, new_admin);
    env.storage().instance().remove(&PENDING_ADMIN);

    Ok(old_admin)
}

/// Drops a pending transfer and returns the address that had been proposed.
pub fn cancel(env: &Env, current_admin: &Address) -> Result<Address, CommonError> {
    require_admin(env, current_admin)?;
    let pending = get_pending_admin(env).ok_or(CommonError::NoPendingAdmin)?;
    env.storage().instance().remove(&PENDING_ADMIN);
    Ok(pending)
}
