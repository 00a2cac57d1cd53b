//! Decides whether a mint request may proceed and what it costs.
//!
//! `authorize` reads nothing from storage: roots, prices and the pause/launch
//! flags are snapshots handed in by the caller.

use soroban_sdk::{BytesN, Env, Vec};

use crate::merkle;
use crate::types::{
    AllowlistRoots, Authorization, MintError, MintRequest, MintTier, PriceSchedule,
    MAX_DISCOUNT_BPS, MAX_PROOF_DEPTH,
};

/// Result of checking one proof, computed at most once per request
struct LazyProof<'a> {
    leaf: BytesN<32>,
    proof: &'a Vec<BytesN<32>>,
    root: &'a BytesN<32>,
    verified: Option<bool>,
}

impl<'a> LazyProof<'a> {
    fn new(leaf: BytesN<32>, proof: &'a Vec<BytesN<32>>, root: &'a BytesN<32>) -> Self {
        LazyProof {
            leaf,
            proof,
            root,
            verified: None,
        }
    }

    fn is_valid(&mut self, env: &Env) -> bool {
        match self.verified {
            Some(valid) => valid,
            None => {
                let valid = merkle::verify(env, &self.leaf, self.proof, self.root);
                self.verified = Some(valid);
                valid
            }
        }
    }
}

pub fn authorize(
    env: &Env,
    request: &MintRequest,
    roots: &AllowlistRoots,
    prices: &PriceSchedule,
    launch_open: bool,
    paused: bool,
) -> Result<Authorization, MintError> {
    // Pause wins over everything, including early access.
    if paused {
        return Err(MintError::MintPaused);
    }

    let total_quantity = request
        .quantities
        .total()
        .ok_or(MintError::ArithmeticOverflow)?;
    if total_quantity == 0 {
        return Err(MintError::NothingToMint);
    }

    if request.discount_proof.len() > MAX_PROOF_DEPTH
        || request.early_access_proof.len() > MAX_PROOF_DEPTH
    {
        return Err(MintError::ProofTooLong);
    }
    if request.discount_bps > MAX_DISCOUNT_BPS {
        return Err(MintError::InvalidDiscount);
    }

    let mut discount = LazyProof::new(
        merkle::discount_leaf(env, &request.buyer, request.discount_bps),
        &request.discount_proof,
        &roots.discount_root,
    );
    let mut early_access = LazyProof::new(
        merkle::leaf(env, &request.buyer),
        &request.early_access_proof,
        &roots.early_access_root,
    );

    if !launch_open && !early_access.is_valid(env) {
        return Err(MintError::LaunchNotOpen);
    }

    let mut required_payment: i128 = 0;
    for tier in MintTier::ALL.iter() {
        let quantity = request.quantities.get(*tier);
        if quantity == 0 {
            continue;
        }

        if tier.requires_discount_proof() && !discount.is_valid(env) {
            return Err(MintError::InvalidDiscountProof);
        }
        if tier.requires_early_access_proof() && !early_access.is_valid(env) {
            return Err(MintError::InvalidEarlyAccessProof);
        }

        let cost = prices
            .discounted_price(*tier, request.discount_bps)
            .and_then(|unit| unit.checked_mul(quantity as i128))
            .ok_or(MintError::ArithmeticOverflow)?;
        required_payment = required_payment
            .checked_add(cost)
            .ok_or(MintError::ArithmeticOverflow)?;
    }

    if request.payment < required_payment {
        return Err(MintError::InsufficientPayment);
    }

    Ok(Authorization {
        total_quantity,
        required_payment,
        breakdown: request.quantities.clone(),
    })
}
