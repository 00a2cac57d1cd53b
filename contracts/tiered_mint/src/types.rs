use soroban_sdk::{contracterror, contracttype, Address, BytesN, String, Vec};

/// Longest sibling path accepted for a membership proof (trees of up to 2^32 leaves)
pub const MAX_PROOF_DEPTH: u32 = 32;

/// Longest metadata URI the contract stores
pub const MAX_URI_LEN: u32 = 192;

/// A discount of 10_000 basis points makes the discount tiers free
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Minting category; each tier has its own unit price and proof requirement
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MintTier {
    /// Public price, no proof needed
    Standard = 0,
    /// Requires a discount allowlist proof
    Discounted = 1,
    /// Requires an early-access allowlist proof
    EarlyAccess = 2,
    /// Requires both proofs
    EarlyAccessWithDiscount = 3,
}

impl MintTier {
    /// Every tier, in the order a request is evaluated
    pub const ALL: [MintTier; 4] = [
        MintTier::Standard,
        MintTier::Discounted,
        MintTier::EarlyAccess,
        MintTier::EarlyAccessWithDiscount,
    ];

    pub fn requires_discount_proof(&self) -> bool {
        match self {
            MintTier::Standard | MintTier::EarlyAccess => false,
            MintTier::Discounted | MintTier::EarlyAccessWithDiscount => true,
        }
    }

    pub fn requires_early_access_proof(&self) -> bool {
        match self {
            MintTier::Standard | MintTier::Discounted => false,
            MintTier::EarlyAccess | MintTier::EarlyAccessWithDiscount => true,
        }
    }
}

/// Unit price per tier, in base units of the payment token. The discount
/// tiers hold list prices, reduced per buyer by `discounted_price`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceSchedule {
    pub standard: i128,
    pub discounted: i128,
    pub early_access: i128,
    pub early_access_discounted: i128,
}

impl PriceSchedule {
    pub fn unit_price(&self, tier: MintTier) -> i128 {
        match tier {
            MintTier::Standard => self.standard,
            MintTier::Discounted => self.discounted,
            MintTier::EarlyAccess => self.early_access,
            MintTier::EarlyAccessWithDiscount => self.early_access_discounted,
        }
    }

    /// Unit price after a buyer's discount. Only the discount tiers are
    /// reduced; `None` if `discount_bps` is out of range or the price overflows.
    pub fn discounted_price(&self, tier: MintTier, discount_bps: u32) -> Option<i128> {
        let price = self.unit_price(tier);
        if !tier.requires_discount_proof() {
            return Some(price);
        }
        let kept = MAX_DISCOUNT_BPS.checked_sub(discount_bps)?;
        price
            .checked_mul(kept as i128)
            .map(|scaled| scaled / MAX_DISCOUNT_BPS as i128)
    }

    pub fn is_valid(&self) -> bool {
        MintTier::ALL.iter().all(|tier| self.unit_price(*tier) >= 0)
    }
}

/// Requested number of tokens per tier
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TierQuantities {
    pub standard: u32,
    pub discounted: u32,
    pub early_access: u32,
    pub early_access_discounted: u32,
}

impl TierQuantities {
    pub fn get(&self, tier: MintTier) -> u32 {
        match tier {
            MintTier::Standard => self.standard,
            MintTier::Discounted => self.discounted,
            MintTier::EarlyAccess => self.early_access,
            MintTier::EarlyAccessWithDiscount => self.early_access_discounted,
        }
    }

    /// Sum over all tiers, `None` on overflow
    pub fn total(&self) -> Option<u32> {
        MintTier::ALL
            .iter()
            .try_fold(0u32, |acc, tier| acc.checked_add(self.get(*tier)))
    }
}

/// Committed allowlist digests, one per proof type
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowlistRoots {
    pub discount_root: BytesN<32>,
    pub early_access_root: BytesN<32>,
}

/// A buyer's mint request as submitted to `quote` or `mint`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintRequest {
    pub buyer: Address,
    pub quantities: TierQuantities,
    /// Discount the buyer's discount leaf commits to, in basis points
    pub discount_bps: u32,
    /// Sibling path for the buyer's discount leaf under the discount root
    pub discount_proof: Vec<BytesN<32>>,
    /// Sibling path for the buyer's leaf under the early-access root
    pub early_access_proof: Vec<BytesN<32>>,
    /// Amount of the payment token the buyer attaches
    pub payment: i128,
}

/// Outcome of a successful authorization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Authorization {
    pub total_quantity: u32,
    pub required_payment: i128,
    pub breakdown: TierQuantities,
}

/// Returned by `mint` once tokens have been assigned
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintReceipt {
    pub buyer: Address,
    /// Token ids `first_token_id..first_token_id + total_quantity` belong to the buyer
    pub first_token_id: u32,
    pub total_quantity: u32,
    pub required_payment: i128,
    pub paid: i128,
}

/// Collection settings supplied at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintConfig {
    pub name: String,
    pub symbol: String,
    pub max_supply: u32,
    /// Token contract buyers pay in
    pub payment_token: Address,
    pub prices: PriceSchedule,
}

/// Data keys for storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Contract administrator
    Admin,
    /// Withdrawal recipient
    Treasury,
    /// Collection configuration
    Config,
    /// Current unit prices
    Prices,
    /// Discount allowlist root
    DiscountRoot,
    /// Early-access allowlist root
    EarlyAccessRoot,
    /// Global mint halt
    Paused,
    /// Public minting open
    Launched,
    /// Metadata revealed
    Revealed,
    /// Base URI used once revealed
    BaseUri,
    /// URI served before reveal
    UnrevealedUri,
    /// Number of tokens minted so far
    TotalSupply,
    /// Owner of a token id
    Owner(u32),
    /// Token count held by an address
    Balance(Address),
    /// Tokens an address minted at a tier
    MintedBy(Address, MintTier),
}

/// Errors that can occur in the contract
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MintError {
    /// Minting is globally halted
    MintPaused = 1,
    /// Public minting has not launched and no valid early-access proof was given
    LaunchNotOpen = 2,
    /// Discount proof does not verify against the current root
    InvalidDiscountProof = 3,
    /// Early-access proof does not verify against the current root
    InvalidEarlyAccessProof = 4,
    /// Attached payment is below the required amount
    InsufficientPayment = 5,
    /// Contract not initialized
    NotInitialized = 6,
    /// Already initialized
    AlreadyInitialized = 7,
    /// Caller is not the admin
    NotAdmin = 8,
    /// Request asks for zero tokens
    NothingToMint = 9,
    /// Request would exceed the collection's max supply
    ExceedsMaxSupply = 10,
    /// Quantity or price arithmetic overflowed
    ArithmeticOverflow = 11,
    /// Negative unit price
    InvalidPrice = 12,
    /// Proof deeper than `MAX_PROOF_DEPTH`
    ProofTooLong = 13,
    /// Token id has not been minted
    TokenNotFound = 14,
    /// URI longer than `MAX_URI_LEN`
    UriTooLong = 15,
    /// Invalid initialization parameters
    InvalidConfig = 16,
    /// Discount above `MAX_DISCOUNT_BPS`
    InvalidDiscount = 17,
}
