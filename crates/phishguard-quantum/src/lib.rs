pub mod circuit;
pub mod random;
pub mod simulator;

pub use circuit::{Circuit, Gate};
pub use random::verified_random_bit;
pub use simulator::{Counts, QuantumBackend, StatevectorSimulator};
