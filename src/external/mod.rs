pub mod beehiiv;
pub mod pap;
pub mod relay;

pub use beehiiv::*;
pub use pap::*;
pub use relay::*;
