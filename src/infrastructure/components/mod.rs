//! Node components executed by the workflow engine

mod generation;
mod input;
mod output;
mod output_summary;
mod retrieval;

pub use generation::GenerationComponent;
pub use input::InputComponent;
pub use output::OutputComponent;
pub use output_summary::NodeOutput;
pub use retrieval::RetrievalComponent;
