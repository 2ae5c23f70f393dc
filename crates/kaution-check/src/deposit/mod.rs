//! Mietkaution rule evaluation.
//!
//! [`evaluate`] maps a [`DepositInput`] to an [`Assessment`]: the statutory cap,
//! detected problems, recommendations, the return deadline and the expected
//! refund. [`intake`] turns raw form entries into a validated input and
//! [`report`] derives display views from the result.

pub mod calendar;
pub mod domain;
mod evaluation;
pub mod intake;
pub mod money;
pub mod report;

pub use domain::{
    Assessment, DepositInput, Problem, ProblemKind, Severity, Situation, Verdict,
};
pub use evaluation::{evaluate, evaluate_on};
pub use intake::{DepositForm, IntakeError};
pub use report::{AssessmentSummary, ProblemView, RefundBreakdown};
