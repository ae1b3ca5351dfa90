use async_trait::async_trait;

use super::{CommentaryError, CommentaryResult, CommentaryService, EvolutionProfile};

/// Backend for running without network access.
///
/// Every call reports [`CommentaryError::Unavailable`], so the broker shows the
/// canned fallback text.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineCommentary;

#[async_trait]
impl CommentaryService for OfflineCommentary {
    fn name(&self) -> &str {
        "offline"
    }

    async fn evolution_profile(
        &self,
        _length_stat: u32,
        _score: u32,
    ) -> CommentaryResult<EvolutionProfile> {
        Err(CommentaryError::Unavailable)
    }

    async fn obituary(&self, _score: u32, _length_stat: u32) -> CommentaryResult<String> {
        Err(CommentaryError::Unavailable)
    }
}
