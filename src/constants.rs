//! Hard-coded constants for gravkd and its dependents.

/// Default number of points below which a node becomes a leaf.
pub const DEFAULT_LEAF_SIZE: usize = 16;

/// Default opening angle used by the default ([`crate::OpeningCriterion::PKDGRAV3`])
/// criterion.
pub const DEFAULT_THETA: f64 = 0.7;

/// Gravitational constant in the units [`crate::binding`] assumes for its
/// inputs: kiloparsecs, solar masses, kilometers per second. Not a
/// universal constant — must not be reused for computations in other
/// unit systems.
pub const GRAVITATIONAL_CONSTANT_KPC_MSUN_KMS: f64 = 4.301e-6;
