use crate::circuit::{Circuit, Gate};
use phishguard_core::{AppError, AppResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Outcome bitstrings mapped to how often they were observed.
pub type Counts = BTreeMap<String, u64>;

pub trait QuantumBackend {
    fn run(&self, circuit: &Circuit, shots: u32) -> AppResult<Counts>;
}

/// Dense statevector simulator. Each `run` builds a fresh statevector and
/// RNG, so a single instance is safe to share across concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatevectorSimulator {
    seed: Option<u64>,
}

impl StatevectorSimulator {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl QuantumBackend for StatevectorSimulator {
    fn run(&self, circuit: &Circuit, shots: u32) -> AppResult<Counts> {
        if circuit.qubits() == 0 {
            return Err(AppError::validation("circuit has no qubits"));
        }
        if shots == 0 {
            return Err(AppError::validation("shots must be > 0"));
        }

        let mut rng = self.rng();
        let mut counts = Counts::new();
        for _ in 0..shots {
            let outcome = run_shot(circuit, &mut rng)?;
            *counts.entry(outcome).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

fn run_shot(circuit: &Circuit, rng: &mut StdRng) -> AppResult<String> {
    let mut state = vec![Amplitude::ZERO; 1 << circuit.qubits()];
    state[0] = Amplitude::ONE;
    let mut bits = vec![false; circuit.bits()];

    for gate in circuit.gates() {
        match *gate {
            Gate::Hadamard(qubit) => apply_hadamard(&mut state, qubit),
            Gate::Measure { qubit, bit } => {
                bits[bit] = measure_qubit(&mut state, qubit, rng)?;
            }
        }
    }

    Ok(render_bits(&bits))
}

fn apply_hadamard(state: &mut [Amplitude], qubit: usize) {
    let mask = 1 << qubit;
    let norm = std::f64::consts::FRAC_1_SQRT_2;
    for index in 0..state.len() {
        if index & mask != 0 {
            continue;
        }
        let low = state[index];
        let high = state[index | mask];
        state[index] = low.add(high).scale(norm);
        state[index | mask] = low.sub(high).scale(norm);
    }
}

fn measure_qubit(state: &mut [Amplitude], qubit: usize, rng: &mut StdRng) -> AppResult<bool> {
    let mask = 1 << qubit;
    let p_one: f64 = state
        .iter()
        .enumerate()
        .filter(|(index, _)| index & mask != 0)
        .map(|(_, amp)| amp.norm_sqr())
        .sum();

    let outcome = rng.gen::<f64>() < p_one;
    let p_outcome = if outcome { p_one } else { 1.0 - p_one };
    if p_outcome <= 0.0 {
        return Err(AppError::internal(
            "measurement collapsed onto a zero-probability outcome",
        ));
    }

    let norm = p_outcome.sqrt();
    for (index, amp) in state.iter_mut().enumerate() {
        if (index & mask != 0) == outcome {
            *amp = amp.scale(1.0 / norm);
        } else {
            *amp = Amplitude::ZERO;
        }
    }
    Ok(outcome)
}

/// Classical bit 0 renders rightmost.
fn render_bits(bits: &[bool]) -> String {
    bits.iter()
        .rev()
        .map(|bit| if *bit { '1' } else { '0' })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Amplitude {
    re: f64,
    im: f64,
}

impl Amplitude {
    const ZERO: Self = Self { re: 0.0, im: 0.0 };
    const ONE: Self = Self { re: 1.0, im: 0.0 };

    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }

    fn scale(self, factor: f64) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hadamard_circuit() -> Circuit {
        let mut circuit = Circuit::new(1, 1);
        circuit.h(0).unwrap();
        circuit.measure(0, 0).unwrap();
        circuit
    }

    #[test]
    fn measure_without_gates_is_always_zero() {
        let mut circuit = Circuit::new(1, 1);
        circuit.measure(0, 0).unwrap();
        let counts = StatevectorSimulator::new().run(&circuit, 64).unwrap();
        assert_eq!(counts.get("0"), Some(&64));
        assert_eq!(counts.get("1"), None);
    }

    #[test]
    fn double_hadamard_restores_the_zero_state() {
        let mut circuit = Circuit::new(1, 1);
        circuit.h(0).unwrap();
        circuit.h(0).unwrap();
        circuit.measure(0, 0).unwrap();
        let counts = StatevectorSimulator::new().run(&circuit, 64).unwrap();
        assert_eq!(counts.get("0"), Some(&64));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let circuit = hadamard_circuit();
        let first = StatevectorSimulator::with_seed(7).run(&circuit, 100).unwrap();
        let second = StatevectorSimulator::with_seed(7).run(&circuit, 100).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn counts_sum_to_shots() {
        let circuit = hadamard_circuit();
        let counts = StatevectorSimulator::with_seed(42).run(&circuit, 1000).unwrap();
        let total: u64 = counts.values().sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn superposition_yields_both_outcomes_over_many_shots() {
        let circuit = hadamard_circuit();
        let counts = StatevectorSimulator::with_seed(1).run(&circuit, 1000).unwrap();
        assert!(counts.contains_key("0"));
        assert!(counts.contains_key("1"));
    }

    #[test]
    fn zero_shots_is_rejected() {
        let circuit = hadamard_circuit();
        let err = StatevectorSimulator::new().run(&circuit, 0).unwrap_err();
        assert_eq!(err.kind(), phishguard_core::ErrorKind::Validation);
    }

    #[test]
    fn single_shot_yields_one_outcome() {
        let circuit = hadamard_circuit();
        let counts = StatevectorSimulator::with_seed(3).run(&circuit, 1).unwrap();
        assert_eq!(counts.len(), 1);
        let total: u64 = counts.values().sum();
        assert_eq!(total, 1);
    }
}
