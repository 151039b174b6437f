// core.rs splits chain responsibilities into submodules: the block value
// type, chain management, and opt-in verification.
pub mod block;
pub mod chain;
pub mod validation;

pub use block::*;
pub use chain::*;
pub use validation::*;
