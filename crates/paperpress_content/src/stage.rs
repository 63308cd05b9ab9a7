use crate::{ContentDraft, StageKind};

/// One step of the content pipeline: takes the previous stage's draft and
/// hands back the next one.
pub trait ContentStage: Send + Sync {
    fn kind(&self) -> StageKind;
    fn apply(&self, draft: ContentDraft) -> ContentDraft;
}
