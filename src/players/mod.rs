pub mod base;
pub mod random;
pub mod suspicion;

pub use base::BaseSeat;
pub use random::RandomSeat;
pub use suspicion::SuspicionSeat;
