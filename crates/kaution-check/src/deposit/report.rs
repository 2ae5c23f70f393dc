use serde::Serialize;

use super::domain::{Assessment, ProblemKind, Severity, Situation, Verdict};
use super::money::format_euro;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemView {
    pub kind: ProblemKind,
    pub text: String,
    pub severity: Severity,
    pub severity_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclaimable_amount: Option<f64>,
}

/// What the tenant gets back after moving out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundBreakdown {
    pub deposit_paid: f64,
    pub landlord_withholds: f64,
    pub estimated_interest: f64,
    pub total_refund_due: f64,
    pub return_due_date: Option<String>,
    pub period_months: u32,
}

/// Display-ready view of an [`Assessment`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub headline: String,
    pub situation: Situation,
    pub situation_label: &'static str,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund: Option<RefundBreakdown>,
    pub problems: Vec<ProblemView>,
    pub recommendations: Vec<String>,
}

impl Assessment {
    pub fn headline(&self) -> String {
        if self.deposit_exceeds_max {
            format!("Kaution {} zu hoch!", format_euro(self.overpayment))
        } else if self.verdict == Verdict::Ok {
            "Kaution korrekt".to_string()
        } else {
            "Probleme festgestellt".to_string()
        }
    }

    pub fn refund_breakdown(&self) -> Option<RefundBreakdown> {
        match self.situation {
            Situation::MovingOut => Some(RefundBreakdown {
                deposit_paid: self.deposit_paid,
                landlord_withholds: self.landlord_withholds,
                estimated_interest: self.estimated_interest,
                total_refund_due: self.total_refund_due,
                return_due_date: self.return_due_date.clone(),
                period_months: self.reasonable_return_period_months,
            }),
            Situation::MovingIn | Situation::DuringTenancy => None,
        }
    }

    pub fn summary(&self) -> AssessmentSummary {
        let problems = self
            .problems
            .iter()
            .map(|problem| ProblemView {
                kind: problem.kind,
                text: problem.text.clone(),
                severity: problem.severity,
                severity_label: problem.severity.label(),
                reclaimable_amount: problem.reclaimable_amount,
            })
            .collect();

        AssessmentSummary {
            headline: self.headline(),
            situation: self.situation,
            situation_label: self.situation.label(),
            verdict: self.verdict,
            refund: self.refund_breakdown(),
            problems,
            recommendations: self.recommendations.clone(),
        }
    }
}
