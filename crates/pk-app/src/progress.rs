#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    GeneratingLayout,
    Relaxing,
    WritingGeometry,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::GeneratingLayout => "layout",
            RunStage::Relaxing => "relax",
            RunStage::WritingGeometry => "geometry",
            RunStage::SavingResults => "save",
            RunStage::Completed => "done",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelaxProgress {
    pub step: usize,
    pub max_steps: usize,
    pub max_overlap: f64,
    pub eps: f64,
    pub kinetic_energy: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub relax: Option<RelaxProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            relax: None,
        }
    }
}
