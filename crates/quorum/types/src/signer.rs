use serde::{Deserialize, Serialize};

/// Opaque identity of an authorized wallet signer.
///
/// Not an account reference and not the raw key: a stable 32-byte pattern
/// derived from signer material. Two ids compare equal iff their identity
/// hashes match; the label is display-only and carries no authority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignerId {
    /// Identity hash derived from signer material, not the raw key.
    identity_hash: [u8; 32],
    /// Human-readable label (optional, non-authoritative).
    label: Option<String>,
}

impl SignerId {
    /// Derive a SignerId from signer material.
    pub fn derive(material: &SignerMaterial) -> Self {
        let hash = material.compute_hash();
        Self {
            identity_hash: *hash.as_bytes(),
            label: None,
        }
    }

    /// Derive with a human-readable label attached.
    pub fn derive_with_label(material: &SignerMaterial, label: impl Into<String>) -> Self {
        let mut id = Self::derive(material);
        id.label = Some(label.into());
        id
    }

    /// The all-zero placeholder identity. Never a valid owner; registry
    /// mutations reject it the way ledger substrates reject a null address.
    pub fn zero() -> Self {
        Self {
            identity_hash: [0u8; 32],
            label: None,
        }
    }

    /// True for the all-zero placeholder identity.
    pub fn is_zero(&self) -> bool {
        self.identity_hash == [0u8; 32]
    }

    /// Create a SignerId for testing purposes. Each call produces a unique
    /// random identity.
    pub fn ephemeral() -> Self {
        let mut seed = [0u8; 32];
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();
        seed[..16].copy_from_slice(a.as_bytes());
        seed[16..].copy_from_slice(b.as_bytes());
        Self {
            identity_hash: *blake3::hash(&seed).as_bytes(),
            label: Some("ephemeral".to_string()),
        }
    }

    /// Verify that a piece of signer material matches this identity.
    pub fn verify_material(&self, material: &SignerMaterial) -> bool {
        self.identity_hash == *material.compute_hash().as_bytes()
    }

    /// Short display form (first 8 bytes hex).
    pub fn short_id(&self) -> String {
        hex::encode(&self.identity_hash[..8])
    }

    /// Access the raw identity hash bytes.
    pub fn identity_hash(&self) -> &[u8; 32] {
        &self.identity_hash
    }

    /// Access the label if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

// Identity is the hash alone; labels are cosmetic and must not split
// or merge signer identities.
impl PartialEq for SignerId {
    fn eq(&self, other: &Self) -> bool {
        self.identity_hash == other.identity_hash
    }
}

impl Eq for SignerId {}

impl std::hash::Hash for SignerId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity_hash.hash(state);
    }
}

impl std::fmt::Display for SignerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref label) = self.label {
            write!(f, "{}({})", label, self.short_id())
        } else {
            write!(f, "sgn:{}", self.short_id())
        }
    }
}

/// Material a signer identity is derived from. Not the identity itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SignerMaterial {
    /// Ed25519 public key of an externally-held signing key.
    PublicKey([u8; 32]),
    /// Custodial account reference plus derivation salt.
    Custodial { account: String, salt: [u8; 16] },
    /// Genesis event hash for programmatically-created signers.
    GenesisHash([u8; 32]),
}

impl SignerMaterial {
    /// Compute the blake3 hash of this material for identity derivation.
    pub fn compute_hash(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        // Domain separation tag
        hasher.update(b"quorum-signer-v1:");
        match self {
            SignerMaterial::PublicKey(key) => {
                hasher.update(b"pk:");
                hasher.update(key);
            }
            SignerMaterial::Custodial { account, salt } => {
                hasher.update(b"custodial:");
                hasher.update(account.as_bytes());
                hasher.update(b":");
                hasher.update(salt);
            }
            SignerMaterial::GenesisHash(hash) => {
                hasher.update(b"genesis:");
                hasher.update(hash);
            }
        }
        hasher.finalize()
    }
}

/// Hex encoding helpers (small enough to not warrant a dependency).
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: &[u8]) -> String {
        let mut s = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            s.push(HEX_CHARS[(b >> 4) as usize] as char);
            s.push(HEX_CHARS[(b & 0xf) as usize] as char);
        }
        s
    }
}
