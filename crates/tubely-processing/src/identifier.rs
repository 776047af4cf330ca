//! Asset identifiers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tubely_core::{AppError, AssetId};

/// Number of random bytes behind every asset identifier.
pub const ASSET_ID_BYTES: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    #[error("Failed to read OS randomness: {0}")]
    Randomness(String),
}

impl From<IdentifierError> for AppError {
    fn from(err: IdentifierError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Source of asset identifiers.
pub trait AssetIdGenerator: Send + Sync {
    fn generate(&self) -> Result<AssetId, IdentifierError>;
}

/// Identifiers drawn from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomIds;

impl AssetIdGenerator for OsRandomIds {
    fn generate(&self) -> Result<AssetId, IdentifierError> {
        let mut bytes = [0u8; ASSET_ID_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| IdentifierError::Randomness(e.to_string()))?;
        Ok(AssetId::new(URL_SAFE_NO_PAD.encode(bytes)))
    }
}
