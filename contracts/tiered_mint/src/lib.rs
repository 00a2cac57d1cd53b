#![no_std]
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, token, Address, BytesN, Env, String, Symbol,
};

pub mod authorizer;
pub mod merkle;
mod storage;
pub mod types;


use crate::types::*;

// Event symbols
const MINTED: Symbol = symbol_short!("mint");
const ROOT_UPDATED: Symbol = symbol_short!("root");
const DISCOUNT: Symbol = symbol_short!("discount");
const EARLY_ACCESS: Symbol = symbol_short!("early");
const PAUSED: Symbol = symbol_short!("paused");
const LAUNCH: Symbol = symbol_short!("launch");
const REVEAL: Symbol = symbol_short!("reveal");
const PRICES: Symbol = symbol_short!("prices");
const WITHDRAWN: Symbol = symbol_short!("withdraw");

/// NFT collection sold in price tiers, where the discounted and early-access
/// tiers are gated by merkle allowlists.
#[contract]
pub struct TieredMint;

#[contractimpl]
impl TieredMint {
    // ==================== INITIALIZATION ====================

    /// Set up the collection. Minting starts unpaused but not launched, so only
    /// early-access holders can mint until the admin calls `toggle_launch`.
    pub fn initialize(
        env: Env,
        admin: Address,
        treasury: Address,
        config: MintConfig,
    ) -> Result<(), MintError> {
        if storage::is_initialized(&env) {
            return Err(MintError::AlreadyInitialized);
        }

        admin.require_auth();

        if config.max_supply == 0 {
            return Err(MintError::InvalidConfig);
        }
        if !config.prices.is_valid() {
            return Err(MintError::InvalidPrice);
        }

        storage::set_admin(&env, &admin);
        storage::set_treasury(&env, &treasury);
        storage::set_prices(&env, &config.prices);
        storage::set_config(&env, &config);
        storage::set_paused(&env, false);
        storage::set_launched(&env, false);
        storage::set_revealed(&env, false);
        storage::set_total_supply(&env, 0);

        log!(
            &env,
            "collection initialized, admin: {}, max supply: {}",
            admin,
            config.max_supply
        );
        Ok(())
    }

    // ==================== ALLOWLIST ROOTS ====================

    pub fn update_discount_root(
        env: Env,
        caller: Address,
        root: BytesN<32>,
    ) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        storage::set_discount_root(&env, &root);
        env.events().publish((ROOT_UPDATED, DISCOUNT), root.clone());
        log!(&env, "discount root updated: {:?}", root);
        Ok(())
    }

    pub fn update_early_access_root(
        env: Env,
        caller: Address,
        root: BytesN<32>,
    ) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        storage::set_early_access_root(&env, &root);
        env.events().publish((ROOT_UPDATED, EARLY_ACCESS), root.clone());
        log!(&env, "early access root updated: {:?}", root);
        Ok(())
    }

    pub fn get_roots(env: Env) -> AllowlistRoots {
        storage::get_roots(&env)
    }

    pub fn discount_root(env: Env) -> BytesN<32> {
        storage::get_roots(&env).discount_root
    }

    pub fn early_access_root(env: Env) -> BytesN<32> {
        storage::get_roots(&env).early_access_root
    }

    // ==================== SALE STATE ====================

    /// Halt or resume all minting, early access included
    pub fn set_paused(env: Env, caller: Address, paused: bool) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        storage::set_paused(&env, paused);
        env.events().publish((PAUSED,), paused);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// Open or close public minting; returns the new state
    pub fn toggle_launch(env: Env, caller: Address) -> Result<bool, MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let launched = !storage::is_launched(&env);
        storage::set_launched(&env, launched);
        env.events().publish((LAUNCH,), launched);
        log!(&env, "public launch open: {}", launched);
        Ok(launched)
    }

    pub fn is_launched(env: Env) -> bool {
        storage::is_launched(&env)
    }

    pub fn set_prices(env: Env, caller: Address, prices: PriceSchedule) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if !prices.is_valid() {
            return Err(MintError::InvalidPrice);
        }
        storage::set_prices(&env, &prices);
        env.events().publish((PRICES,), prices);
        Ok(())
    }

    pub fn get_prices(env: Env) -> Result<PriceSchedule, MintError> {
        storage::get_prices(&env).ok_or(MintError::NotInitialized)
    }

    // ==================== MINTING ====================

    /// Price a request against the current roots and sale state without minting
    pub fn quote(env: Env, request: MintRequest) -> Result<Authorization, MintError> {
        let prices = storage::get_prices(&env).ok_or(MintError::NotInitialized)?;
        authorizer::authorize(
            &env,
            &request,
            &storage::get_roots(&env),
            &prices,
            storage::is_launched(&env),
            storage::is_paused(&env),
        )
    }

    /// Authorize the request, take the attached payment and assign the tokens.
    /// Any failure rejects the whole request.
    pub fn mint(env: Env, request: MintRequest) -> Result<MintReceipt, MintError> {
        request.buyer.require_auth();

        let config = storage::get_config(&env).ok_or(MintError::NotInitialized)?;
        let prices = storage::get_prices(&env).ok_or(MintError::NotInitialized)?;

        let authorization = authorizer::authorize(
            &env,
            &request,
            &storage::get_roots(&env),
            &prices,
            storage::is_launched(&env),
            storage::is_paused(&env),
        )?;

        let supply = storage::get_total_supply(&env);
        let new_supply = supply
            .checked_add(authorization.total_quantity)
            .ok_or(MintError::ArithmeticOverflow)?;
        if new_supply > config.max_supply {
            return Err(MintError::ExceedsMaxSupply);
        }

        let buyer = request.buyer.clone();
        if request.payment > 0 {
            let payment_token = token::Client::new(&env, &config.payment_token);
            payment_token.transfer(&buyer, &env.current_contract_address(), &request.payment);
        }

        let first_token_id = supply + 1;
        for token_id in first_token_id..=new_supply {
            storage::set_owner(&env, token_id, &buyer);
        }
        storage::set_total_supply(&env, new_supply);

        let balance = storage::get_balance(&env, &buyer);
        storage::set_balance(&env, &buyer, balance + authorization.total_quantity);

        for tier in MintTier::ALL.iter() {
            let quantity = authorization.breakdown.get(*tier);
            if quantity > 0 {
                let minted = storage::get_minted_by(&env, &buyer, *tier);
                storage::set_minted_by(&env, &buyer, *tier, minted + quantity);
            }
        }

        env.events().publish(
            (MINTED, buyer.clone()),
            (first_token_id, authorization.total_quantity, request.payment),
        );
        log!(
            &env,
            "minted {} tokens from id {} for {}",
            authorization.total_quantity,
            first_token_id,
            buyer
        );

        Ok(MintReceipt {
            buyer,
            first_token_id,
            total_quantity: authorization.total_quantity,
            required_payment: authorization.required_payment,
            paid: request.payment,
        })
    }

    // ==================== TOKEN QUERIES ====================

    pub fn balance_of(env: Env, owner: Address) -> u32 {
        storage::get_balance(&env, &owner)
    }

    pub fn owner_of(env: Env, token_id: u32) -> Result<Address, MintError> {
        storage::get_owner(&env, token_id).ok_or(MintError::TokenNotFound)
    }

    pub fn total_supply(env: Env) -> u32 {
        storage::get_total_supply(&env)
    }

    pub fn max_supply(env: Env) -> Result<u32, MintError> {
        storage::get_config(&env)
            .map(|config| config.max_supply)
            .ok_or(MintError::NotInitialized)
    }

    /// Tokens `buyer` has minted at `tier`
    pub fn minted_by(env: Env, buyer: Address, tier: MintTier) -> u32 {
        storage::get_minted_by(&env, &buyer, tier)
    }

    pub fn name(env: Env) -> Result<String, MintError> {
        storage::get_config(&env)
            .map(|config| config.name)
            .ok_or(MintError::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, MintError> {
        storage::get_config(&env)
            .map(|config| config.symbol)
            .ok_or(MintError::NotInitialized)
    }

    // ==================== METADATA ====================

    pub fn set_unrevealed_uri(env: Env, caller: Address, uri: String) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        Self::check_uri(&uri)?;

        storage::set_unrevealed_uri(&env, &uri);
        Ok(())
    }

    pub fn unrevealed_uri(env: Env) -> String {
        storage::get_unrevealed_uri(&env)
    }

    /// Set the revealed base URI and the reveal flag in one step
    pub fn set_base_uri(
        env: Env,
        caller: Address,
        revealed: bool,
        uri: String,
    ) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        Self::check_uri(&uri)?;

        storage::set_base_uri(&env, &uri);
        storage::set_revealed(&env, revealed);
        env.events().publish((REVEAL,), revealed);
        Ok(())
    }

    pub fn base_uri(env: Env) -> String {
        storage::get_base_uri(&env)
    }

    /// Flip the reveal flag, e.g. to roll back to unrevealed artwork
    pub fn toggle_revealed(env: Env, caller: Address) -> Result<bool, MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let revealed = !storage::is_revealed(&env);
        storage::set_revealed(&env, revealed);
        env.events().publish((REVEAL,), revealed);
        Ok(revealed)
    }

    pub fn is_revealed(env: Env) -> bool {
        storage::is_revealed(&env)
    }

    /// `{base_uri}{token_id}.json` once revealed, the unrevealed URI before
    pub fn token_uri(env: Env, token_id: u32) -> Result<String, MintError> {
        if storage::get_owner(&env, token_id).is_none() {
            return Err(MintError::TokenNotFound);
        }
        if !storage::is_revealed(&env) {
            return Ok(storage::get_unrevealed_uri(&env));
        }
        Ok(Self::revealed_uri(&env, &storage::get_base_uri(&env), token_id))
    }

    // ==================== TREASURY ====================

    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        storage::set_treasury(&env, &treasury);
        Ok(())
    }

    pub fn treasury(env: Env) -> Result<Address, MintError> {
        storage::get_treasury(&env).ok_or(MintError::NotInitialized)
    }

    pub fn admin(env: Env) -> Result<Address, MintError> {
        storage::get_admin(&env).ok_or(MintError::NotInitialized)
    }

    /// Send every collected payment to the treasury; returns the amount moved
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, MintError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let config = storage::get_config(&env).ok_or(MintError::NotInitialized)?;
        let treasury = storage::get_treasury(&env).ok_or(MintError::NotInitialized)?;
        let payment_token = token::Client::new(&env, &config.payment_token);

        let amount = payment_token.balance(&env.current_contract_address());
        if amount > 0 {
            payment_token.transfer(&env.current_contract_address(), &treasury, &amount);
        }

        env.events().publish((WITHDRAWN, treasury.clone()), amount);
        log!(&env, "withdrew {} to {}", amount, treasury);
        Ok(amount)
    }

    // ==================== Internal Helpers ====================

    fn require_admin(env: &Env, caller: &Address) -> Result<(), MintError> {
        let admin = storage::get_admin(env).ok_or(MintError::NotInitialized)?;
        if *caller != admin {
            return Err(MintError::NotAdmin);
        }
        Ok(())
    }

    fn check_uri(uri: &String) -> Result<(), MintError> {
        if uri.len() > MAX_URI_LEN {
            return Err(MintError::UriTooLong);
        }
        Ok(())
    }

    fn revealed_uri(env: &Env, base: &String, token_id: u32) -> String {
        const SUFFIX: &[u8] = b".json";
        // base is capped at MAX_URI_LEN, u32 has at most 10 digits
        let mut buf = [0u8; MAX_URI_LEN as usize + 16];

        let mut len = base.len() as usize;
        base.copy_into_slice(&mut buf[..len]);

        let mut digits = [0u8; 10];
        let mut count = 0;
        let mut n = token_id;
        loop {
            digits[count] = b'0' + (n % 10) as u8;
            count += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for digit in digits[..count].iter().rev() {
            buf[len] = *digit;
            len += 1;
        }

        buf[len..len + SUFFIX.len()].copy_from_slice(SUFFIX);
        len += SUFFIX.len();

        String::from_bytes(env, &buf[..len])
    }
}
