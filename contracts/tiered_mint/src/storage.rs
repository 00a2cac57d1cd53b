use crate::types::{AllowlistRoots, DataKey, MintConfig, MintTier, PriceSchedule};
use soroban_sdk::{Address, BytesN, Env, String};

// Ownership records live in persistent storage and are bumped on every write
pub(crate) const PERSISTENT_TTL_THRESHOLD: u32 = 100_000;
pub(crate) const PERSISTENT_TTL_EXTEND_TO: u32 = 500_000;

/// Check whether `initialize` has run
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_treasury(env: &Env, treasury: &Address) {
    env.storage().instance().set(&DataKey::Treasury, treasury);
}

pub fn get_treasury(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Treasury)
}

/// Store collection configuration
pub fn set_config(env: &Env, config: &MintConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/// Get collection configuration
pub fn get_config(env: &Env) -> Option<MintConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_prices(env: &Env, prices: &PriceSchedule) {
    env.storage().instance().set(&DataKey::Prices, prices);
}

pub fn get_prices(env: &Env) -> Option<PriceSchedule> {
    env.storage().instance().get(&DataKey::Prices)
}

pub fn set_discount_root(env: &Env, root: &BytesN<32>) {
    env.storage().instance().set(&DataKey::DiscountRoot, root);
}

pub fn set_early_access_root(env: &Env, root: &BytesN<32>) {
    env.storage().instance().set(&DataKey::EarlyAccessRoot, root);
}

/// Snapshot of both allowlist roots; unset roots read as all zeroes
pub fn get_roots(env: &Env) -> AllowlistRoots {
    let zero = BytesN::from_array(env, &[0u8; 32]);
    let storage = env.storage().instance();
    AllowlistRoots {
        discount_root: storage
            .get(&DataKey::DiscountRoot)
            .unwrap_or_else(|| zero.clone()),
        early_access_root: storage.get(&DataKey::EarlyAccessRoot).unwrap_or(zero),
    }
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

pub fn set_launched(env: &Env, launched: bool) {
    env.storage().instance().set(&DataKey::Launched, &launched);
}

pub fn is_launched(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Launched).unwrap_or(false)
}

pub fn set_revealed(env: &Env, revealed: bool) {
    env.storage().instance().set(&DataKey::Revealed, &revealed);
}

pub fn is_revealed(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Revealed).unwrap_or(false)
}

pub fn set_base_uri(env: &Env, uri: &String) {
    env.storage().instance().set(&DataKey::BaseUri, uri);
}

pub fn get_base_uri(env: &Env) -> String {
    env.storage()
        .instance()
        .get(&DataKey::BaseUri)
        .unwrap_or_else(|| String::from_str(env, ""))
}

pub fn set_unrevealed_uri(env: &Env, uri: &String) {
    env.storage().instance().set(&DataKey::UnrevealedUri, uri);
}

pub fn get_unrevealed_uri(env: &Env) -> String {
    env.storage()
        .instance()
        .get(&DataKey::UnrevealedUri)
        .unwrap_or_else(|| String::from_str(env, ""))
}

pub fn get_total_supply(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: u32) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND_TO);
}

pub fn set_owner(env: &Env, token_id: u32, owner: &Address) {
    let key = DataKey::Owner(token_id);
    env.storage().persistent().set(&key, owner);
    extend_persistent(env, &key);
}

pub fn get_owner(env: &Env, token_id: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::Owner(token_id))
}

pub fn get_balance(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(owner.clone()))
        .unwrap_or(0)
}

pub fn set_balance(env: &Env, owner: &Address, balance: u32) {
    let key = DataKey::Balance(owner.clone());
    env.storage().persistent().set(&key, &balance);
    extend_persistent(env, &key);
}

/// Tokens `buyer` has minted at `tier`
pub fn get_minted_by(env: &Env, buyer: &Address, tier: MintTier) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::MintedBy(buyer.clone(), tier))
        .unwrap_or(0)
}

pub fn set_minted_by(env: &Env, buyer: &Address, tier: MintTier, count: u32) {
    let key = DataKey::MintedBy(buyer.clone(), tier);
    env.storage().persistent().set(&key, &count);
    extend_persistent(env, &key);
}
