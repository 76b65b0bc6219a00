//! Generic LLM client trait for provider abstraction.

use crate::types::Result;
use async_trait::async_trait;

/// A generation model the pipeline can invoke.
///
/// Implementations own their model identity and sampling parameters;
/// the pipeline only supplies the system prompt and the user prompt.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion for `prompt` under `system` instructions.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// The model name/identifier this client invokes.
    fn model_name(&self) -> &str;
}

/// Which of the two configured generation models to use.
///
/// Selected explicitly by the caller when constructing the engine; the
/// query path never switches models mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelTier {
    /// Full-quality model, the default.
    #[default]
    Quality,
    /// Cheaper, lower-latency model.
    Fast,
}

impl ModelTier {
    /// Map the CLI's `--fast` flag onto a tier.
    pub fn from_fast_flag(fast: bool) -> Self {
        if fast {
            Self::Fast
        } else {
            Self::Quality
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Quality => "quality",
            Self::Fast => "fast",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_flag() {
        assert_eq!(ModelTier::from_fast_flag(true), ModelTier::Fast);
        assert_eq!(ModelTier::from_fast_flag(false), ModelTier::Quality);
        assert_eq!(ModelTier::default(), ModelTier::Quality);
    }
}
