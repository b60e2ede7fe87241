//! Tests for account balance arithmetic and cash movements.

#[cfg(test)]
mod tests {
    use crate::accounts::{Account, AccountType, Balances, CashMovement, NewAccount};
    use crate::errors::{ConflictError, Error, ErrorKind};
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn create_test_account(balance: rust_decimal::Decimal) -> Account {
        Account {
            id: 1,
            client_id: 10,
            account_number: "ACC0000000001".to_string(),
            balance,
            available_balance: balance,
            currency: "TRY".to_string(),
            account_type: AccountType::Settlement,
            is_primary_settlement: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    // ==================== debit / credit ====================

    #[test]
    fn test_debit_moves_both_balances() {
        let account = create_test_account(dec!(5000.00));
        let after = account.debit(dec!(1002.10)).unwrap();
        assert_eq!(
            after,
            Balances {
                balance: dec!(3997.90),
                available_balance: dec!(3997.90),
            }
        );
    }

    #[test]
    fn test_debit_exact_balance_reaches_zero() {
        let account = create_test_account(dec!(1002.10));
        let after = account.debit(dec!(1002.10)).unwrap();
        assert_eq!(after.balance, dec!(0));
    }

    #[test]
    fn test_debit_beyond_available_is_conflict() {
        let mut account = create_test_account(dec!(1000));
        account.available_balance = dec!(400);

        let err = account.debit(dec!(500)).unwrap_err();
        match err {
            Error::StateConflict(ConflictError::InsufficientBalance {
                required,
                available,
            }) => {
                assert_eq!(required, dec!(500));
                assert_eq!(available, dec!(400));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_credit_rounds_to_cents() {
        let account = create_test_account(dec!(10));
        let after = account.credit(dec!(997.895)).unwrap();
        assert_eq!(after.balance, dec!(1007.90));
        assert_eq!(after.available_balance, dec!(1007.90));
    }

    // ==================== CashMovement ====================

    #[test]
    fn test_cash_movement_rejects_non_positive_amounts() {
        let account = create_test_account(dec!(100));
        for movement in [
            CashMovement::Deposit(dec!(0)),
            CashMovement::Withdrawal(dec!(-5)),
        ] {
            let err = movement.apply_to(&account).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_withdrawal_requires_available_balance() {
        let account = create_test_account(dec!(100));
        let err = CashMovement::Withdrawal(dec!(100.01))
            .apply_to(&account)
            .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_BALANCE");
    }

    #[test]
    fn test_blocked_account_rejects_movements() {
        let mut account = create_test_account(dec!(100));
        account.account_type = AccountType::Blocked;
        assert!(CashMovement::Deposit(dec!(1)).apply_to(&account).is_err());
    }

    #[test]
    fn test_cash_movement_deserialization() {
        let movement: CashMovement =
            serde_json::from_str(r#"{"kind":"WITHDRAWAL","amount":12.5}"#).unwrap();
        assert_eq!(movement, CashMovement::Withdrawal(dec!(12.5)));
    }

    // ==================== NewAccount ====================

    #[test]
    fn test_new_account_validation() {
        let valid = NewAccount {
            client_id: 3,
            account_number: None,
            account_type: AccountType::Settlement,
            currency: Some("TRY".to_string()),
            is_primary_settlement: true,
            opening_balance: dec!(0),
        };
        assert!(valid.validate().is_ok());

        let deposit_primary = NewAccount {
            account_type: AccountType::Deposit,
            ..valid.clone()
        };
        assert!(deposit_primary.validate().is_err());

        let negative = NewAccount {
            opening_balance: dec!(-1),
            ..valid.clone()
        };
        assert!(negative.validate().is_err());

        let bad_currency = NewAccount {
            currency: Some("LIRA".to_string()),
            ..valid
        };
        assert!(bad_currency.validate().is_err());
    }
}
