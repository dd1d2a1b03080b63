//! Property tests for the intake/output Totals Calculator.

use hospital_forms::{calculate_totals, IntakeOutputEntry, INTAKE_FIELDS, OUTPUT_FIELDS};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..2000).prop_map(|n| n.to_string()),
        Just(String::new()),
        Just("n/a".to_string()),
    ]
}

fn arb_entry() -> impl Strategy<Value = IntakeOutputEntry> {
    let fields: Vec<&'static str> = INTAKE_FIELDS.iter().chain(OUTPUT_FIELDS).copied().collect();
    prop::collection::vec((prop::sample::select(fields), arb_value()), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .fold(IntakeOutputEntry::new("08:00"), |entry, (field, value)| {
                entry.with(field, &value)
            })
    })
}

proptest! {
    #[test]
    fn balance_is_intake_minus_output(entries in prop::collection::vec(arb_entry(), 0..12)) {
        let totals = calculate_totals(&entries);
        prop_assert_eq!(totals.balance, totals.total_intake - totals.total_output);
        prop_assert!(totals.total_intake >= 0.0);
        prop_assert!(totals.total_output >= 0.0);
    }

    #[test]
    fn row_order_does_not_matter(entries in prop::collection::vec(arb_entry(), 0..12)) {
        let forward = calculate_totals(&entries);
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(calculate_totals(&reversed), forward);
    }

    #[test]
    fn totals_are_sum_of_rows(entries in prop::collection::vec(arb_entry(), 0..12)) {
        let totals = calculate_totals(&entries);
        let intake: f64 = entries.iter().map(IntakeOutputEntry::intake).sum();
        let output: f64 = entries.iter().map(IntakeOutputEntry::output).sum();
        prop_assert_eq!(totals.total_intake, intake);
        prop_assert_eq!(totals.total_output, output);
    }
}
