use entity::stage_config;

use crate::error::WorkflowError;

/// Per-stage options recognized by the gate. A closed set: a flag column
/// that is not mapped here cannot silently match nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StageOption {
    /// Reassign ownership to the acting user's superior after this stage.
    AttachedHead,
    /// Require a verified one-time code before the transition commits.
    SmsConfirm,
    /// Reserved domain hook.
    CheckProduct,
    /// Reserved domain hook.
    CheckMain,
}

/// Facts the gate evaluates against, supplied by the caller.
#[derive(Clone, Copy, Debug)]
pub struct GateContext {
    /// Whether a one-time code was verified for this document and operation.
    pub code_verified: bool,
}

/// Side effects the commit step must apply once the gate passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct GateOutcome {
    pub reassign_to_chief: bool,
}

impl StageOption {
    pub fn evaluate(
        self,
        ctx: &GateContext,
        outcome: &mut GateOutcome,
    ) -> Result<(), WorkflowError> {
        match self {
            StageOption::AttachedHead => {
                outcome.reassign_to_chief = true;
                Ok(())
            }
            StageOption::SmsConfirm => {
                if ctx.code_verified {
                    Ok(())
                } else {
                    Err(WorkflowError::CodeRequired)
                }
            }
            // Hooks for future domain rules; they always pass today.
            StageOption::CheckProduct | StageOption::CheckMain => Ok(()),
        }
    }
}

/// Options enabled on a stage template row, in evaluation order.
pub fn options_of(config: &stage_config::Model) -> Vec<StageOption> {
    let mut options = Vec::new();
    if config.attached_head {
        options.push(StageOption::AttachedHead);
    }
    if config.sms_confirm {
        options.push(StageOption::SmsConfirm);
    }
    if config.check_product {
        options.push(StageOption::CheckProduct);
    }
    if config.check_main {
        options.push(StageOption::CheckMain);
    }
    options
}

/// Run every enabled option; the first blocking option aborts the
/// transition before anything is written.
pub fn evaluate_gate(
    config: &stage_config::Model,
    ctx: &GateContext,
) -> Result<GateOutcome, WorkflowError> {
    let mut outcome = GateOutcome::default();
    for option in options_of(config) {
        option.evaluate(ctx, &mut outcome)?;
    }
    Ok(outcome)
}
