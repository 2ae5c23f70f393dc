use chrono::NaiveDate;

use super::super::calendar::{add_months, format_german_date};
use super::super::domain::{DepositInput, Problem, ProblemKind, Severity, Situation};
use super::super::money::format_euro;

/// Statutory cap in months of cold rent (§551 Abs. 1 BGB).
pub(crate) const DEPOSIT_CAP_MONTHS: f64 = 3.0;
pub(crate) const STANDARD_RETURN_PERIOD_MONTHS: u32 = 3;
pub(crate) const EXTENDED_RETURN_PERIOD_MONTHS: u32 = 6;
/// Flat estimate: 0.5% p.a. over three years.
pub(crate) const ESTIMATED_INTEREST_RATE: f64 = 0.005;
pub(crate) const ESTIMATED_INTEREST_YEARS: f64 = 3.0;

/// Problems and recommendations in the order the checks emitted them.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub problems: Vec<Problem>,
    pub recommendations: Vec<String>,
}

impl Findings {
    fn problem(&mut self, kind: ProblemKind, severity: Severity, text: String) {
        self.problems.push(Problem {
            kind,
            text,
            severity,
            reclaimable_amount: None,
        });
    }

    fn recommend(&mut self, text: impl Into<String>) {
        self.recommendations.push(text.into());
    }
}

pub(crate) struct CapCheck {
    pub max_deposit: f64,
    pub exceeds_max: bool,
    pub overpayment: f64,
}

pub(crate) struct ReturnTimeline {
    pub period_months: u32,
    pub due_date: Option<NaiveDate>,
}

impl Default for ReturnTimeline {
    fn default() -> Self {
        Self {
            period_months: STANDARD_RETURN_PERIOD_MONTHS,
            due_date: None,
        }
    }
}

pub(crate) fn check_cap(input: &DepositInput, findings: &mut Findings) -> CapCheck {
    let max_deposit = input.cold_rent * DEPOSIT_CAP_MONTHS;
    let exceeds_max = input.deposit_paid > max_deposit;
    let overpayment = (input.deposit_paid - max_deposit).max(0.0);

    if exceeds_max {
        findings.problems.push(Problem {
            kind: ProblemKind::CapExceeded,
            text: format!(
                "Kaution zu hoch! Maximal erlaubt: {}",
                format_euro(max_deposit)
            ),
            severity: Severity::Critical,
            reclaimable_amount: Some(overpayment),
        });
        findings.recommend(format!(
            "Sie können {} sofort zurückfordern",
            format_euro(overpayment)
        ));
    }

    CapCheck {
        max_deposit,
        exceeds_max,
        overpayment,
    }
}

pub(crate) fn check_separate_account(input: &DepositInput, findings: &mut Findings) {
    if input.deposit_in_separate_account {
        return;
    }

    findings.problem(
        ProblemKind::SeparateAccount,
        Severity::Medium,
        "Kaution muss auf separatem Konto angelegt werden (§551 Abs. 3 BGB)".to_string(),
    );
    findings.recommend("Fordern Sie einen Nachweis über das Kautionskonto an");
}

/// Advisory checks that only apply when the tenant is moving out.
pub(crate) fn check_move_out_paperwork(input: &DepositInput, findings: &mut Findings) {
    match input.situation {
        Situation::MovingOut => {}
        Situation::MovingIn | Situation::DuringTenancy => return,
    }

    if !input.interest_received {
        findings.recommend("Sie haben Anspruch auf die aufgelaufenen Zinsen");
    }
    if !input.handover_protocol_exists {
        findings.recommend("Fordern Sie ein Übergabeprotokoll an – wichtig für Streitfälle");
    }
}

pub(crate) fn check_return_deadline(
    input: &DepositInput,
    today: NaiveDate,
    findings: &mut Findings,
) -> ReturnTimeline {
    let mut timeline = ReturnTimeline::default();

    let move_out_date = match (input.situation, input.move_out_date) {
        (Situation::MovingOut, Some(date)) => date,
        _ => return timeline,
    };

    if input.utility_statement_pending {
        timeline.period_months = EXTENDED_RETURN_PERIOD_MONTHS;
        findings
            .recommend("Offene NK-Abrechnung kann Rückgabe auf bis zu 6 Monate verzögern");
    }
    if input.defects_found {
        findings.recommend(
            "Bei Mängeln kann der Vermieter einen Teil einbehalten – nur für nachgewiesene Schäden",
        );
    }

    timeline.due_date = add_months(move_out_date, timeline.period_months);

    if let Some(due_date) = timeline.due_date {
        if today >= due_date {
            findings.problem(
                ProblemKind::ReturnOverdue,
                Severity::Critical,
                format!(
                    "Rückgabefrist überschritten seit {}",
                    format_german_date(due_date)
                ),
            );
            findings.recommend(
                "Senden Sie dem Vermieter eine schriftliche Mahnung mit Fristsetzung",
            );
        }
    }

    timeline
}

pub(crate) fn estimate_interest(input: &DepositInput) -> f64 {
    match input.situation {
        Situation::MovingOut => {
            input.deposit_paid * ESTIMATED_INTEREST_RATE * ESTIMATED_INTEREST_YEARS
        }
        Situation::MovingIn | Situation::DuringTenancy => 0.0,
    }
}

/// Not floored at zero: over-withholding shows up as a negative refund.
pub(crate) fn refund_total(input: &DepositInput, estimated_interest: f64) -> f64 {
    input.deposit_paid - input.landlord_withholds + estimated_interest
}

pub(crate) fn check_withholding(input: &DepositInput, findings: &mut Findings) {
    if input.landlord_withholds > 0.0 && input.withhold_reason.is_empty() {
        findings.problem(
            ProblemKind::UnjustifiedWithholding,
            Severity::Medium,
            "Einbehalt ohne Begründung ist nicht zulässig".to_string(),
        );
    }
}
