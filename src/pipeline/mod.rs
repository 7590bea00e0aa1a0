// Pipeline — chunk, normalize, fit, assign.

pub mod assign;
pub mod orchestrator;

use std::fmt;

/// Where a pipeline run is. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Chunking,
    Normalizing,
    Fitting,
    Assigning,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Chunking => "chunking",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Fitting => "fitting",
            PipelineStage::Assigning => "assigning",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}
