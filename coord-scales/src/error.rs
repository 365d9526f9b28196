#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordScaleError {
    #[error("Factor not found in range: {0}")]
    UnknownFactor(String),

    #[error("Duplicate factor: {0}")]
    DuplicateFactor(String),

    #[error("Degenerate interval: ({start}, {end})")]
    DegenerateInterval { start: f64, end: f64 },
}
