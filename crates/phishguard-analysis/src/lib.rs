pub mod ai;
pub mod analysis;
pub mod snapshot;
pub mod verdict;

pub use ai::{AiProvider, GeminiProvider, MockProvider};
pub use analysis::{analyze, build_prompt, AnalysisResult};
pub use snapshot::PageSnapshot;
pub use verdict::{Status, VerdictEnvelope};
