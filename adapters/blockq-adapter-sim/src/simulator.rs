//! Simulator backend implementation.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::{Span, debug, instrument};
use uuid::Uuid;

use blockq_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult, Job,
    JobId, JobStatus,
};
use blockq_ir::{Circuit, Instruction};

use crate::statevector::Statevector;

/// Default register ceiling; 2^20 amplitudes is ~16 MB.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Job record kept by the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Each job runs on tokio's blocking pool and is terminal by the time
/// [`Backend::submit`] returns. Every job samples from its own generator,
/// seeded from the backend's, so concurrent jobs never contend on it.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    jobs: Mutex<FxHashMap<String, SimJob>>,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a simulator whose sampling is reproducible.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    fn next_job_seed(&self) -> u64 {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).r#gen()
    }
}

/// Run a circuit for `shots` shots.
#[instrument(skip(circuit), fields(qubits = circuit.num_qubits()))]
fn run_simulation(circuit: &Circuit, shots: u32, seed: u64) -> HalResult<ExecutionResult> {
    if !circuit.has_measurements() {
        return Err(HalError::InvalidCircuit(
            "circuit contains no measurements".into(),
        ));
    }

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed);
    let instructions = circuit.instructions();
    let registers = circuit.clbit_registers();
    let mut counts = Counts::new();

    // Gates before the first measurement are shared by every shot.
    let first_measure = instructions
        .iter()
        .position(Instruction::is_measure)
        .unwrap_or(instructions.len());
    let mut prefix = Statevector::new(circuit.num_qubits());
    for inst in &instructions[..first_measure] {
        prefix.apply(inst);
    }
    let tail = &instructions[first_measure..];

    if circuit.measurements_are_terminal() {
        debug!("sampling {} shots from final state", shots);
        for _ in 0..shots {
            let outcome = prefix.sample(&mut rng);
            let mut bits = vec![false; circuit.num_clbits()];
            for inst in tail {
                for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                    bits[c.index()] = outcome & (1 << q.index()) != 0;
                }
            }
            counts.insert(bitstring(&bits, registers), 1);
        }
    } else {
        debug!("replaying mid-circuit measurements for {} shots", shots);
        for _ in 0..shots {
            let mut sv = prefix.clone();
            let mut bits = vec![false; circuit.num_clbits()];
            for inst in tail {
                if inst.is_measure() {
                    for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                        bits[c.index()] = sv.measure_qubit(q.index(), &mut rng);
                    }
                } else {
                    sv.apply(inst);
                }
            }
            counts.insert(bitstring(&bits, registers), 1);
        }
    }

    let elapsed = start.elapsed();
    debug!("simulation completed in {:?}", elapsed);

    Ok(ExecutionResult::new(counts, shots)
        .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)))
}

/// Render classical bits one register per word, bit 0 rightmost.
///
/// The last register allocated is written first, so two measure-alls over
/// two qubits read `"<second> <first>"`.
fn bitstring(bits: &[bool], registers: &[u32]) -> String {
    let mut words = Vec::with_capacity(registers.len());
    let mut offset = 0;
    for &size in registers {
        let end = offset + size as usize;
        words.push(
            bits[offset..end]
                .iter()
                .rev()
                .map(|&b| if b { '1' } else { '0' })
                .collect::<String>(),
        );
        offset = end;
    }
    words.reverse();
    words.join(" ")
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} is outside 1..={}",
                self.capabilities.max_shots
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), shots).with_backend(self.name());
        debug!("submitted job {}", job_id);

        job.transition(JobStatus::Running);
        let circuit = circuit.clone();
        let seed = self.next_job_seed();
        let span = Span::current();
        let outcome = tokio::task::spawn_blocking(move || {
            span.in_scope(|| run_simulation(&circuit, shots, seed))
        })
        .await
        .unwrap_or_else(|e| Err(HalError::Backend(format!("simulation task failed: {e}"))));

        let result = match outcome {
            Ok(result) => {
                job.transition(JobStatus::Completed);
                Some(result)
            }
            Err(e) => {
                job.transition(JobStatus::Failed(e.to_string()));
                None
            }
        };

        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.0.clone(), SimJob { job, result });

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        // Results are handed out once; the service never re-reads a job.
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .remove(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (sim_job.job.status, sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg)),
            (status, _) => Err(HalError::Backend(format!(
                "job {job_id} has no result (status: {status})"
            ))),
        }
    }

    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        // Jobs are terminal on submit, so there is nothing to poll.
        self.result(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockq_ir::QubitId;
    use std::time::Duration;

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure_all()
            .unwrap();
        circuit
    }

    fn ghz(n: u32) -> Circuit {
        let mut circuit = Circuit::with_size("ghz", n, 0);
        circuit.h(QubitId(0)).unwrap();
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
        }
        circuit.measure_all().unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert_eq!(caps.num_qubits, 20);
        assert_eq!(backend.name(), "simulator");
        assert!(backend.availability().await.unwrap().is_available);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(1);

        let job_id = backend.submit(&bell(), 1000).await.unwrap();

        let status = backend.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);
        assert!(result.execution_time_ms.is_some());

        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        assert!(counts.get("00") > 0 && counts.get("11") > 0);
    }

    #[tokio::test]
    async fn test_simulator_ghz_state() {
        let backend = SimulatorBackend::new();

        let job_id = backend.submit(&ghz(3), 1000).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        let counts = &result.counts;
        assert_eq!(counts.get("000") + counts.get("111"), 1000);
    }

    #[tokio::test]
    async fn test_bitstring_is_little_endian() {
        let backend = SimulatorBackend::new();

        let mut circuit = Circuit::with_size("x0", 3, 0);
        circuit.x(QubitId(0)).unwrap().measure_all().unwrap();
        let job_id = backend.submit(&circuit, 50).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        assert_eq!(result.counts.get("001"), 50);
        assert_eq!(result.counts.len(), 1);
    }

    #[tokio::test]
    async fn test_gates_after_measurement_are_replayed() {
        let backend = SimulatorBackend::new().with_seed(3);

        // Measure |+⟩, flip, measure again into a second register: the second
        // reading is always the inverse of the first.
        let mut circuit = Circuit::with_size("mid", 1, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .measure_all()
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .measure_all()
            .unwrap();
        assert!(!circuit.measurements_are_terminal());

        let job_id = backend.submit(&circuit, 400).await.unwrap();
        let counts = backend.wait(&job_id).await.unwrap().counts;
        assert_eq!(counts.total_shots(), 400);
        assert_eq!(counts.get("1 0") + counts.get("0 1"), 400);
        assert!(counts.get("1 0") > 0 && counts.get("0 1") > 0);
    }

    #[tokio::test]
    async fn test_repeated_terminal_measurements_agree() {
        let backend = SimulatorBackend::new().with_seed(9);

        let mut circuit = bell();
        circuit.measure_all().unwrap();
        assert!(circuit.measurements_are_terminal());

        let job_id = backend.submit(&circuit, 300).await.unwrap();
        let counts = backend.wait(&job_id).await.unwrap().counts;
        assert_eq!(counts.get("00 00") + counts.get("11 11"), 300);
    }

    #[test]
    fn test_bitstring_orders_registers_last_first() {
        let bits = [true, false, false, false, true];
        assert_eq!(bitstring(&bits, &[2, 3]), "100 01");
        assert_eq!(bitstring(&bits, &[5]), "10001");
        assert_eq!(bitstring(&[], &[]), "");
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let circuit = ghz(4);

        let a = SimulatorBackend::new().with_seed(42);
        let b = SimulatorBackend::new().with_seed(42);
        let ra = a.wait(&a.submit(&circuit, 256).await.unwrap()).await.unwrap();
        let rb = b.wait(&b.submit(&circuit, 256).await.unwrap()).await.unwrap();

        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_simulation_leaves_runtime_free() {
        let backend = SimulatorBackend::new().with_seed(5);

        // Ten qubits with a mid-circuit measurement forces per-shot replay.
        let mut circuit = Circuit::with_size("busy", 10, 0);
        circuit.measure_all().unwrap();
        for q in 0..10 {
            circuit.h(QubitId(q)).unwrap();
        }
        circuit.measure_all().unwrap();

        let ticker = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Instant::now()
        });
        let job_id = backend.submit(&circuit, 10_000).await.unwrap();
        let submitted = Instant::now();

        let ticked = ticker.await.unwrap();
        assert!(ticked < submitted, "timer starved while the simulation ran");
        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.counts.total_shots(), 10_000);
    }

    #[tokio::test]
    async fn test_unmeasured_circuit_fails_job() {
        let backend = SimulatorBackend::new();

        let mut circuit = Circuit::with_size("bare", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let job_id = backend.submit(&circuit, 10).await.unwrap();

        assert!(matches!(
            backend.status(&job_id).await.unwrap(),
            JobStatus::Failed(_)
        ));
        let err = backend.wait(&job_id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Job failed: Invalid circuit: circuit contains no measurements"
        );
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let backend = SimulatorBackend::new();
        assert!(matches!(
            backend.submit(&bell(), 0).await,
            Err(HalError::InvalidShots(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("missing");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.result(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }
}
