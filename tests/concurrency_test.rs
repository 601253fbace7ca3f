mod common;

use contractor_ledger::error::LedgerError;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_double_pay_settles_once() {
    let service = Arc::new(common::fixture_service().await);
    let caller = service.resolve_caller(1).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let caller = caller.clone();
        handles.push(tokio::spawn(async move { service.pay_job(2, &caller).await }));
    }

    let mut paid = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(receipt) => {
                paid += 1;
                assert_eq!(receipt.job_id, 2);
            }
            Err(LedgerError::JobNotFound(2)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(paid, 1);
    assert_eq!(common::balance_of(&service, 1).await, dec!(949));
    assert_eq!(common::balance_of(&service, 6).await, dec!(1415));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_payments_sharing_a_contractor() {
    let service = Arc::new(common::fixture_service().await);
    let harry = service.resolve_caller(1).await.unwrap();
    let robot = service.resolve_caller(2).await.unwrap();

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.pay_job(2, &harry).await })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.pay_job(3, &robot).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    assert_eq!(common::balance_of(&service, 1).await, dec!(949));
    assert_eq!(common::balance_of(&service, 2).await, dec!(29.11));
    // Linus is paid by both.
    assert_eq!(common::balance_of(&service, 6).await, dec!(1617));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_deposit_racing_a_payment_sees_one_order() {
    // Client 2 owes 402 (jobs 3 and 4); paying job 3 drops the cap to 50.
    for _ in 0..20 {
        let service = Arc::new(common::fixture_service().await);
        let robot = service.resolve_caller(2).await.unwrap();

        let pay = {
            let service = service.clone();
            tokio::spawn(async move { service.pay_job(3, &robot).await })
        };
        let deposit = {
            let service = service.clone();
            tokio::spawn(async move { service.deposit(2, dec!(100.5)).await })
        };

        pay.await.unwrap().unwrap();
        match deposit.await.unwrap() {
            Ok(_) => assert_eq!(common::balance_of(&service, 2).await, dec!(129.61)),
            Err(LedgerError::DepositExceedsLimit { limit, .. }) => {
                assert_eq!(limit.0, dec!(50));
                assert_eq!(common::balance_of(&service, 2).await, dec!(29.11));
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deposits_each_checked_against_cap() {
    // Client 2 may deposit at most 100.5 per request; all four fit.
    let service = Arc::new(common::fixture_service().await);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.deposit(2, dec!(100)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(common::balance_of(&service, 2).await, dec!(631.11));
}
