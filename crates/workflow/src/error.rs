use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The document's type has no configured stages, or the document has no
    /// active chain to act on.
    #[error("document type has no configured stages")]
    ConfigurationMissing,
    #[error("acting user is not allowed to act on the current stage")]
    NotAuthorized,
    #[error("document is already finished")]
    AlreadyFinished,
    /// The acting role is not the one configured at the document's current
    /// position.
    #[error("no stage is configured for this role at the current position")]
    StageNotConfigured,
    #[error("a verified confirmation code is required for this stage")]
    CodeRequired,
    #[error("document is past stage 1 and can no longer be edited")]
    NotDraft,
    #[error("document not found")]
    NotFound,
    /// A concurrent operation won the compare-and-swap; the caller may retry.
    #[error("concurrent update detected")]
    Conflict,
    #[error("persistence error: {0}")]
    Db(#[from] DbErr),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
