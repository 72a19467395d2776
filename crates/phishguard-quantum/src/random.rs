use crate::circuit::Circuit;
use crate::simulator::QuantumBackend;
use phishguard_core::AppResult;

/// Samples one fair bit from an equal superposition: Hadamard on a single
/// qubit, one projective measurement, one shot. Backend failures propagate
/// to the caller untouched.
pub fn verified_random_bit(backend: &dyn QuantumBackend) -> AppResult<bool> {
    let mut circuit = Circuit::new(1, 1);
    circuit.h(0)?;
    circuit.measure(0, 0)?;
    let counts = backend.run(&circuit, 1)?;
    Ok(counts.contains_key("1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{Counts, StatevectorSimulator};
    use phishguard_core::AppError;

    struct FixedBackend {
        outcome: &'static str,
    }

    impl QuantumBackend for FixedBackend {
        fn run(&self, _circuit: &Circuit, shots: u32) -> AppResult<Counts> {
            let mut counts = Counts::new();
            counts.insert(self.outcome.to_string(), shots as u64);
            Ok(counts)
        }
    }

    struct BrokenBackend;

    impl QuantumBackend for BrokenBackend {
        fn run(&self, _circuit: &Circuit, _shots: u32) -> AppResult<Counts> {
            Err(AppError::internal("backend offline"))
        }
    }

    #[test]
    fn outcome_one_is_true() {
        let backend = FixedBackend { outcome: "1" };
        assert!(verified_random_bit(&backend).unwrap());
    }

    #[test]
    fn outcome_zero_is_false() {
        let backend = FixedBackend { outcome: "0" };
        assert!(!verified_random_bit(&backend).unwrap());
    }

    #[test]
    fn backend_errors_propagate() {
        let err = verified_random_bit(&BrokenBackend).unwrap_err();
        assert_eq!(err.message(), "backend offline");
    }

    #[test]
    fn seeded_simulator_is_deterministic() {
        let backend = StatevectorSimulator::with_seed(11);
        let first = verified_random_bit(&backend).unwrap();
        let second = verified_random_bit(&backend).unwrap();
        assert_eq!(first, second);
    }
}
