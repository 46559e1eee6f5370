//! Tests for account domain models.

use super::*;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn account(id: &str, parent: Option<&str>, balance: Decimal) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Account {}", id),
        account_type: AccountType::Checking,
        parent_id: parent.map(str::to_string),
        currency: "USD".to_string(),
        balance,
        credit_limit: None,
        is_active: true,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

fn new_account(balance: Decimal, credit_limit: Option<Decimal>) -> NewAccount {
    NewAccount {
        id: None,
        name: "Visa".to_string(),
        account_type: AccountType::CreditCard,
        parent_id: None,
        currency: "USD".to_string(),
        balance,
        credit_limit,
        is_active: true,
    }
}

// ==================== Credit limit ====================

#[test]
fn test_balance_after_within_limit() {
    let mut acc = account("a", None, dec!(100));
    acc.credit_limit = Some(dec!(500));
    assert_eq!(acc.balance_after(dec!(-600)).unwrap(), dec!(-500));
    assert_eq!(acc.balance_floor(), dec!(-500));
}

#[test]
fn test_balance_after_exceeding_limit() {
    let mut acc = account("a", None, dec!(100));
    acc.credit_limit = Some(dec!(500));
    let err = acc.balance_after(dec!(-600.01)).unwrap_err();
    assert!(matches!(err, crate::Error::ConstraintViolation(_)));
}

#[test]
fn test_no_credit_limit_means_zero_floor() {
    let acc = account("a", None, dec!(10));
    assert!(acc.balance_after(dec!(-10)).is_ok());
    assert!(acc.balance_after(dec!(-10.5)).is_err());
}

// ==================== Validation ====================

#[test]
fn test_new_account_validation() {
    assert!(new_account(dec!(0), None).validate().is_ok());
    assert!(new_account(dec!(-200), Some(dec!(1000))).validate().is_ok());
    assert!(new_account(dec!(-200), None).validate().is_err());
    assert!(new_account(dec!(0), Some(dec!(-1))).validate().is_err());

    let mut unnamed = new_account(dec!(0), None);
    unnamed.name = "   ".to_string();
    assert!(unnamed.validate().is_err());
}

#[test]
fn test_update_cannot_be_own_parent() {
    let update = AccountUpdate {
        id: Some("a".to_string()),
        name: "A".to_string(),
        account_type: AccountType::Savings,
        parent_id: Some("a".to_string()),
        credit_limit: None,
        is_active: true,
    };
    assert!(update.validate().is_err());
}

#[test]
fn test_new_account_defaults_from_json() {
    let parsed: NewAccount =
        serde_json::from_str(r#"{"name":"Wallet","currency":"EUR"}"#).unwrap();
    assert_eq!(parsed.account_type, AccountType::Checking);
    assert!(parsed.is_active);
    assert_eq!(parsed.balance, Decimal::ZERO);
}

#[test]
fn test_account_type_uses_screaming_snake_case() {
    let parsed: NewAccount = serde_json::from_str(
        r#"{"name":"Visa","currency":"USD","accountType":"CREDIT_CARD"}"#,
    )
    .unwrap();
    assert_eq!(parsed.account_type, AccountType::CreditCard);
    assert_eq!(
        serde_json::to_string(&AccountType::CreditCard).unwrap(),
        r#""CREDIT_CARD""#
    );
    assert_eq!("loan".parse::<AccountType>().unwrap(), AccountType::Loan);

    let unknown = serde_json::from_str::<NewAccount>(
        r#"{"name":"X","currency":"USD","accountType":"BROKERAGE"}"#,
    );
    assert!(unknown.is_err());
    assert!("BROKERAGE".parse::<AccountType>().is_err());
}

// ==================== Tree ====================

#[test]
fn test_build_account_tree_nests_and_sums() {
    let accounts = vec![
        account("root", None, dec!(10)),
        account("child", Some("root"), dec!(5)),
        account("grandchild", Some("child"), dec!(-2)),
        account("other", None, dec!(1)),
    ];
    let tree = build_account_tree(accounts);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].account.id, "root");
    assert_eq!(tree[0].total_balance, dec!(13));
    assert_eq!(tree[0].children[0].account.id, "child");
    assert_eq!(tree[0].children[0].children[0].account.id, "grandchild");
    assert_eq!(tree[1].account.id, "other");
}

#[test]
fn test_build_account_tree_orphan_becomes_root() {
    let tree = build_account_tree(vec![account("orphan", Some("missing"), dec!(3))]);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].account.id, "orphan");
    assert!(tree[0].children.is_empty());
}
