use super::Stage;

/// Setup-time shader failures.
///
/// All variants are fatal for the renderer that produced them: the owning
/// lifecycle goes inert until the host creates a fresh surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {message}")]
    Compile { stage: Stage, message: String },

    #[error("program link failed: {0}")]
    Link(String),

    #[error("symbol `{name}` not found in program")]
    MissingSymbol { name: String },
}
