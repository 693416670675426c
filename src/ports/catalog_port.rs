//! Instrument catalog source port trait.
//!
//! Implementations hand back raw scrip-master rows; parsing and
//! normalization belong to `Catalog::load`, so every source gets the same
//! validation.

use crate::domain::catalog::RawContractRow;
use crate::domain::error::FnosignalError;

pub trait CatalogPort {
    fn fetch_rows(&self) -> Result<Vec<RawContractRow>, FnosignalError>;
}
