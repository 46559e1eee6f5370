use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn new_tx(kind: TransactionKind, to: Option<&str>, category: Option<&str>) -> NewTransaction {
    NewTransaction {
        id: None,
        account_id: "a".to_string(),
        to_account_id: to.map(str::to_string),
        category_id: category.map(str::to_string),
        partner_id: None,
        kind,
        amount: dec!(25),
        description: None,
        transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    }
}

fn effect(account_id: &str, delta: rust_decimal::Decimal) -> BalanceEffect {
    BalanceEffect {
        account_id: account_id.to_string(),
        delta,
    }
}

#[test]
fn test_balance_effects_by_kind() {
    assert_eq!(
        new_tx(TransactionKind::Income, None, None).balance_effects(),
        vec![effect("a", dec!(25))]
    );
    assert_eq!(
        new_tx(TransactionKind::Expense, None, None).balance_effects(),
        vec![effect("a", dec!(-25))]
    );
    assert_eq!(
        new_tx(TransactionKind::Transfer, Some("b"), None).balance_effects(),
        vec![effect("a", dec!(-25)), effect("b", dec!(25))]
    );
}

#[test]
fn test_net_effects_revert_and_apply() {
    let previous = vec![effect("a", dec!(-25))];
    let next = vec![effect("a", dec!(-40)), effect("b", dec!(40))];
    assert_eq!(
        net_balance_effects(&previous, &next),
        vec![effect("a", dec!(-15)), effect("b", dec!(40))]
    );

    // Unchanged transaction moves nothing.
    assert!(net_balance_effects(&previous, &previous).is_empty());
    // Deleting reverts.
    assert_eq!(
        net_balance_effects(&previous, &[]),
        vec![effect("a", dec!(25))]
    );
}

#[test]
fn test_validation_rules() {
    assert!(new_tx(TransactionKind::Expense, None, Some("food")).validate().is_ok());
    assert!(new_tx(TransactionKind::Transfer, Some("b"), None).validate().is_ok());

    assert!(new_tx(TransactionKind::Transfer, None, None).validate().is_err());
    assert!(new_tx(TransactionKind::Transfer, Some("a"), None).validate().is_err());
    assert!(new_tx(TransactionKind::Transfer, Some("b"), Some("food")).validate().is_err());
    assert!(new_tx(TransactionKind::Income, Some("b"), None).validate().is_err());

    let mut zero = new_tx(TransactionKind::Expense, None, None);
    zero.amount = dec!(0);
    assert!(zero.validate().is_err());
    zero.amount = dec!(-3);
    assert!(zero.validate().is_err());
}

#[test]
fn test_filter_json_defaults() {
    let filter: TransactionFilter =
        serde_json::from_str(r#"{"kind":"EXPENSE","startDate":"2024-01-01"}"#).unwrap();
    assert_eq!(filter.kind, Some(TransactionKind::Expense));
    assert_eq!(filter.sort_by, TransactionSortField::TransactionDate);
    assert_eq!(filter.sort_direction, SortDirection::Desc);
    assert_eq!(filter.page_request().page, 1);
}

#[test]
fn test_filter_rejects_inverted_dates() {
    let filter = TransactionFilter {
        start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..Default::default()
    };
    assert!(filter.validate().is_err());
}
