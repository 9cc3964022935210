//! The connected signing identity.

/// A wallet connection: the account address and the signer used for writes.
#[derive(Debug, Clone)]
pub struct Wallet<Sg> {
    pub address: String,
    pub signer: Sg,
}

impl<Sg> Wallet<Sg> {
    pub fn new(address: impl Into<String>, signer: Sg) -> Self {
        Self {
            address: address.into(),
            signer,
        }
    }

    /// Whether `address` is this wallet's account (case-insensitive, as
    /// checksummed and lowercase hex addresses are the same account).
    pub fn is_owner(&self, address: &str) -> bool {
        addresses_match(&self.address, address)
    }
}

/// Case-insensitive address comparison.
pub fn addresses_match(a: &str, b: &str) -> bool {
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}
