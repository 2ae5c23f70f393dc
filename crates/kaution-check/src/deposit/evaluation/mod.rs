mod rules;

use chrono::{Local, NaiveDate};
use tracing::debug;

use super::calendar::format_german_date;
use super::domain::{Assessment, DepositInput, Verdict};
use super::money::round_cents;
use rules::Findings;

/// Assess a deposit against today's local date.
pub fn evaluate(input: &DepositInput) -> Assessment {
    evaluate_on(input, Local::now().date_naive())
}

/// Assess a deposit as of `today`. Deterministic for a fixed date; never fails.
pub fn evaluate_on(input: &DepositInput, today: NaiveDate) -> Assessment {
    let mut findings = Findings::default();

    let cap = rules::check_cap(input, &mut findings);
    rules::check_separate_account(input, &mut findings);
    rules::check_move_out_paperwork(input, &mut findings);
    let timeline = rules::check_return_deadline(input, today, &mut findings);
    let estimated_interest = rules::estimate_interest(input);
    let total_refund_due = rules::refund_total(input, estimated_interest);
    rules::check_withholding(input, &mut findings);

    let verdict = Verdict::from_problems(&findings.problems);

    debug!(
        situation = input.situation.slug(),
        ?verdict,
        problems = findings.problems.len(),
        recommendations = findings.recommendations.len(),
        "deposit evaluated"
    );

    Assessment {
        situation: input.situation,
        cold_rent: input.cold_rent,
        deposit_paid: input.deposit_paid,
        max_deposit: round_cents(cap.max_deposit),
        deposit_exceeds_max: cap.exceeds_max,
        overpayment: round_cents(cap.overpayment),
        problems: findings.problems,
        recommendations: findings.recommendations,
        reasonable_return_period_months: timeline.period_months,
        return_due_date: timeline.due_date.map(format_german_date),
        landlord_withholds: input.landlord_withholds,
        estimated_interest: round_cents(estimated_interest),
        total_refund_due: round_cents(total_refund_due),
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposit::domain::{ProblemKind, Severity, Situation};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    fn moving_out(move_out_date: NaiveDate) -> DepositInput {
        DepositInput {
            situation: Situation::MovingOut,
            cold_rent: 800.0,
            deposit_paid: 2400.0,
            deposit_in_separate_account: true,
            interest_received: true,
            move_out_date: Some(move_out_date),
            handover_protocol_exists: true,
            ..DepositInput::default()
        }
    }

    #[test]
    fn compliant_move_in_has_no_findings() {
        let input = DepositInput {
            situation: Situation::MovingIn,
            cold_rent: 800.0,
            deposit_paid: 2400.0,
            deposit_in_separate_account: true,
            ..DepositInput::default()
        };

        let assessment = evaluate_on(&input, today());

        assert_eq!(assessment.max_deposit, 2400.0);
        assert!(!assessment.deposit_exceeds_max);
        assert_eq!(assessment.overpayment, 0.0);
        assert!(assessment.problems.is_empty());
        assert!(assessment.recommendations.is_empty());
        assert_eq!(assessment.verdict, Verdict::Ok);
        assert_eq!(assessment.return_due_date, None);
        assert_eq!(assessment.reasonable_return_period_months, 3);
    }

    #[test]
    fn cap_and_account_problems_keep_check_order() {
        let input = DepositInput {
            situation: Situation::DuringTenancy,
            cold_rent: 800.0,
            deposit_paid: 3000.0,
            ..DepositInput::default()
        };

        let assessment = evaluate_on(&input, today());

        let kinds: Vec<_> = assessment.problems.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ProblemKind::CapExceeded, ProblemKind::SeparateAccount]
        );
        assert_eq!(assessment.problems[0].severity, Severity::Critical);
        assert_eq!(
            assessment.problems[0].text,
            "Kaution zu hoch! Maximal erlaubt: 2400.00 €"
        );
        assert_eq!(assessment.problems[0].reclaimable_amount, Some(600.0));
        assert_eq!(assessment.problems[1].severity, Severity::Medium);
        assert_eq!(assessment.problems[1].reclaimable_amount, None);
        assert_eq!(
            assessment.recommendations,
            vec![
                "Sie können 600.00 € sofort zurückfordern".to_string(),
                "Fordern Sie einen Nachweis über das Kautionskonto an".to_string(),
            ]
        );
        assert_eq!(assessment.overpayment, 600.0);
        assert_eq!(assessment.verdict, Verdict::Problematic);
    }

    #[test]
    fn return_due_date_uses_three_months_by_default() {
        let move_out = NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date");
        let assessment = evaluate_on(&moving_out(move_out), today());

        assert_eq!(assessment.reasonable_return_period_months, 3);
        assert_eq!(assessment.return_due_date.as_deref(), Some("01.07.2025"));
        assert!(assessment.problems.is_empty());
        assert_eq!(assessment.verdict, Verdict::Ok);
    }

    #[test]
    fn pending_utility_statement_extends_period() {
        let move_out = NaiveDate::from_ymd_opt(2024, 11, 30).expect("valid date");
        let mut input = moving_out(move_out);
        input.utility_statement_pending = true;

        let assessment = evaluate_on(&input, today());

        assert_eq!(assessment.reasonable_return_period_months, 6);
        assert_eq!(assessment.return_due_date.as_deref(), Some("30.05.2025"));
        assert_eq!(
            assessment.recommendations[0],
            "Offene NK-Abrechnung kann Rückgabe auf bis zu 6 Monate verzögern"
        );
        assert!(assessment
            .problems
            .iter()
            .any(|p| p.kind == ProblemKind::ReturnOverdue
                && p.text == "Rückgabefrist überschritten seit 30.05.2025"));
    }

    #[test]
    fn deadline_is_exceeded_on_the_due_date() {
        let move_out = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date");
        let assessment = evaluate_on(&moving_out(move_out), today());

        assert_eq!(assessment.return_due_date.as_deref(), Some("15.06.2025"));
        assert_eq!(assessment.verdict, Verdict::Problematic);
        assert_eq!(assessment.problems.len(), 1);
        assert_eq!(assessment.problems[0].kind, ProblemKind::ReturnOverdue);
        assert_eq!(
            assessment.problems[0].text,
            "Rückgabefrist überschritten seit 15.06.2025"
        );
        assert_eq!(
            assessment.recommendations.last().map(String::as_str),
            Some("Senden Sie dem Vermieter eine schriftliche Mahnung mit Fristsetzung")
        );

        let day_before = today().pred_opt().expect("valid date");
        let assessment = evaluate_on(&moving_out(move_out), day_before);
        assert_eq!(assessment.verdict, Verdict::Ok);
        assert!(assessment.problems.is_empty());
        assert!(!assessment
            .recommendations
            .iter()
            .any(|text| text.contains("Mahnung")));
    }

    #[test]
    fn month_end_move_out_clamps_due_date() {
        let move_out = NaiveDate::from_ymd_opt(2023, 11, 30).expect("valid date");
        let assessment = evaluate_on(&moving_out(move_out), today());

        assert_eq!(assessment.return_due_date.as_deref(), Some("29.02.2024"));
    }

    #[test]
    fn move_out_advisories_in_order() {
        let input = DepositInput {
            situation: Situation::MovingOut,
            cold_rent: 700.0,
            deposit_paid: 2100.0,
            deposit_in_separate_account: true,
            move_out_date: Some(today()),
            defects_found: true,
            utility_statement_pending: true,
            ..DepositInput::default()
        };

        let assessment = evaluate_on(&input, today());

        assert_eq!(
            assessment.recommendations,
            vec![
                "Sie haben Anspruch auf die aufgelaufenen Zinsen".to_string(),
                "Fordern Sie ein Übergabeprotokoll an – wichtig für Streitfälle".to_string(),
                "Offene NK-Abrechnung kann Rückgabe auf bis zu 6 Monate verzögern".to_string(),
                "Bei Mängeln kann der Vermieter einen Teil einbehalten – nur für nachgewiesene Schäden"
                    .to_string(),
            ]
        );
        assert!(assessment.problems.is_empty());
    }

    #[test]
    fn move_out_checks_skipped_for_other_situations() {
        for situation in [Situation::MovingIn, Situation::DuringTenancy] {
            let input = DepositInput {
                situation,
                cold_rent: 800.0,
                deposit_paid: 2400.0,
                deposit_in_separate_account: true,
                move_out_date: NaiveDate::from_ymd_opt(2020, 1, 1),
                utility_statement_pending: true,
                defects_found: true,
                ..DepositInput::default()
            };

            let assessment = evaluate_on(&input, today());

            assert!(assessment.recommendations.is_empty(), "{situation:?}");
            assert!(assessment.problems.is_empty(), "{situation:?}");
            assert_eq!(assessment.return_due_date, None);
            assert_eq!(assessment.reasonable_return_period_months, 3);
            assert_eq!(assessment.estimated_interest, 0.0);
            assert_eq!(assessment.total_refund_due, 2400.0);
        }
    }

    #[test]
    fn moving_out_without_date_skips_deadline() {
        let mut input = moving_out(today());
        input.move_out_date = None;
        input.utility_statement_pending = true;

        let assessment = evaluate_on(&input, today());

        assert_eq!(assessment.return_due_date, None);
        assert_eq!(assessment.reasonable_return_period_months, 3);
        assert!(assessment.recommendations.is_empty());
        assert_eq!(assessment.estimated_interest, 36.0);
    }

    #[test]
    fn withholding_without_reason_is_flagged() {
        let mut input = moving_out(today());
        input.landlord_withholds = 200.0;

        let assessment = evaluate_on(&input, today());
        assert_eq!(assessment.problems.len(), 1);
        assert_eq!(
            assessment.problems[0].kind,
            ProblemKind::UnjustifiedWithholding
        );
        assert_eq!(assessment.problems[0].severity, Severity::Medium);
        assert_eq!(assessment.verdict, Verdict::Ok);
        assert_eq!(assessment.total_refund_due, 2236.0);

        input.withhold_reason = "Wandschaden im Flur".to_string();
        let assessment = evaluate_on(&input, today());
        assert!(assessment.problems.is_empty());
    }

    #[test]
    fn over_withholding_produces_negative_refund() {
        let mut input = moving_out(today());
        input.deposit_paid = 1000.0;
        input.landlord_withholds = 1200.0;
        input.withhold_reason = "Renovierung".to_string();

        let assessment = evaluate_on(&input, today());

        assert_eq!(assessment.estimated_interest, 15.0);
        assert_eq!(assessment.total_refund_due, -185.0);
        assert!(assessment.problems.is_empty());
    }

    #[test]
    fn zero_rent_flags_any_positive_deposit() {
        let input = DepositInput {
            situation: Situation::MovingIn,
            deposit_paid: 50.0,
            deposit_in_separate_account: true,
            ..DepositInput::default()
        };

        let assessment = evaluate_on(&input, today());

        assert_eq!(assessment.max_deposit, 0.0);
        assert!(assessment.deposit_exceeds_max);
        assert_eq!(assessment.overpayment, 50.0);
        assert_eq!(assessment.verdict, Verdict::Problematic);
    }

    #[test]
    fn monetary_outputs_are_rounded_but_inputs_pass_through() {
        let input = DepositInput {
            situation: Situation::MovingOut,
            cold_rent: 333.333,
            deposit_paid: 1234.567,
            deposit_in_separate_account: true,
            interest_received: true,
            handover_protocol_exists: true,
            landlord_withholds: 10.005,
            withhold_reason: "Schlüssel".to_string(),
            ..DepositInput::default()
        };

        let assessment = evaluate_on(&input, today());

        assert_eq!(assessment.cold_rent, 333.333);
        assert_eq!(assessment.deposit_paid, 1234.567);
        assert_eq!(assessment.landlord_withholds, 10.005);
        assert_eq!(assessment.max_deposit, 1000.0);
        assert_eq!(assessment.overpayment, 234.57);
        assert_eq!(assessment.estimated_interest, 18.52);
        assert_eq!(assessment.total_refund_due, 1243.08);
    }

    #[test]
    fn evaluation_is_idempotent_for_fixed_date() {
        let mut input = moving_out(NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date"));
        input.landlord_withholds = 99.99;

        assert_eq!(evaluate_on(&input, today()), evaluate_on(&input, today()));
    }
}
