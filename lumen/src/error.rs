use crate::path::Side;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A slice or truncation would leave a side empty or reach past the chain.
    #[error("invalid slice [{from}, {to}) of a path with {len} vertices")]
    InvalidSlice { from: usize, to: usize, len: usize },
    /// The subpaths given to a join don't start from the light and the eye.
    #[error("can't join a {light:?} subpath to a {eye:?} subpath")]
    InvalidJoin { light: Side, eye: Side },
    /// Truncation would remove every vertex of a side.
    #[error("can't remove {removed} vertices from a subpath of {length}")]
    InvalidTruncation { removed: usize, length: usize },
    /// A collaborator returned a value outside its contract, e.g. a negative pdf.
    #[error("collaborator contract violated: {0}")]
    CollaboratorContract(String),
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks a density reported by a collaborator.
///
/// Zero is a valid density. Negative and non-finite values are defects in the
/// collaborator and are surfaced instead of clamped.
pub fn check_pdf(pdf: f64, what: &str) -> Result<f64> {
    if pdf >= 0.0 && pdf.is_finite() {
        Ok(pdf)
    } else {
        crate::lumen_error!("{} returned pdf {}", what, pdf);
        Err(Error::CollaboratorContract(format!(
            "{} returned pdf {}",
            what, pdf
        )))
    }
}
