//! Parser regression vectors (C8): golden headers that must parse cleanly
//! and mutated variants that must produce a specific, named outcome.
//! Mirrors the original tooling's golden/mutation vector harness, including
//! its on-disk `.bin`/`.json` vector format.

pub mod golden;
pub mod mutate;
pub mod vector;

pub use golden::{golden_vectors, GoldenVector};
pub use mutate::{mutation_vectors, MutationVector};
pub use vector::{
  load_vector, log_results, summarise_results, validate_vector, write_vector, write_vectors,
  ExpectedOutcome, Vector, VectorCategory, ValidationResult,
};

/// Build the full corpus of [`Vector`] records from [`golden_vectors`] and
/// [`mutation_vectors`], ready for [`validate_vector`] or serialization.
pub fn default_vector_set() -> Vec<Vector> {
  let mut vectors: Vec<Vector> = golden_vectors()
    .into_iter()
    .map(|g| Vector {
      name: g.name.to_string(),
      category: VectorCategory::Golden,
      payload: g.bytes,
      manifest: serde_json::json!({}),
      expected_outcome: ExpectedOutcome::Pass,
      description: format!("golden header vector {}", g.name),
      tags: vec!["golden".to_string()],
    })
    .collect();

  vectors.extend(mutation_vectors().into_iter().map(|m| Vector {
    name: m.name.to_string(),
    category: VectorCategory::Mutation,
    payload: m.bytes,
    manifest: serde_json::json!({}),
    expected_outcome: m.expected,
    description: format!("mutated header vector {}", m.name),
    tags: vec!["mutation".to_string()],
  }));

  vectors
}

/// Run every vector in [`default_vector_set`], logging and collecting the
/// names of any that failed to produce their expected outcome.
pub fn run_all() -> Vec<String> {
  let results: Vec<ValidationResult> = default_vector_set().iter().map(validate_vector).collect();
  log_results(&results);
  results.into_iter().filter(|r| !r.passed).map(|r| r.name).collect()
}
