#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::assets::{AssetRepositoryTrait, AssetService, NewAsset};
    use crate::errors::Error;
    use crate::events::{DomainEvent, MockDomainEventSink};
    use crate::memory::{InMemoryAssetRepository, InMemoryTransactionRepository};
    use crate::portfolio::valuation::{ValuationService, ValuationServiceTrait};
    use crate::transactions::{
        NewTransaction, TransactionError, TransactionFilters, TransactionService,
        TransactionServiceTrait, TransactionType,
    };

    struct Fixture {
        assets: Arc<InMemoryAssetRepository>,
        transactions: Arc<InMemoryTransactionRepository>,
        sink: Arc<MockDomainEventSink>,
        service: Arc<TransactionService>,
        valuation: ValuationService,
    }

    fn fixture() -> Fixture {
        let assets = Arc::new(InMemoryAssetRepository::with_assets(vec![
            NewAsset::new("BTC", "Bitcoin", dec!(50000)),
            NewAsset::new("ETH", "Ethereum", dec!(3000)),
        ]));
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let sink = Arc::new(MockDomainEventSink::new());
        let asset_service = Arc::new(AssetService::new(assets.clone()));
        let service = Arc::new(TransactionService::new(
            transactions.clone(),
            asset_service.clone(),
            sink.clone(),
        ));
        let valuation = ValuationService::new(transactions.clone(), asset_service);
        Fixture {
            assets,
            transactions,
            sink,
            service,
            valuation,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn is_insufficient_funds<T>(result: &Result<T, Error>) -> bool {
        matches!(
            result,
            Err(Error::Transaction(TransactionError::InsufficientFunds { .. }))
        )
    }

    #[tokio::test]
    async fn test_buy_then_partial_sell_then_oversell() {
        let f = fixture();
        let buy = f
            .service
            .record_buy("u1", "btc", dec!(1.0), dec!(50000), day(1))
            .await
            .unwrap();
        assert_eq!(buy.asset_symbol, "BTC");
        assert_eq!(buy.asset_name, "Bitcoin");

        f.assets
            .upsert(NewAsset::new("BTC", "Bitcoin", dec!(60000)))
            .await
            .unwrap();
        f.service
            .record_sell("u1", "BTC", dec!(0.5), dec!(60000), day(2))
            .await
            .unwrap();

        let result = f
            .service
            .record_sell("u1", "BTC", dec!(0.6), dec!(60000), day(3))
            .await;
        match result {
            Err(Error::Transaction(TransactionError::InsufficientFunds {
                symbol,
                requested,
                available,
            })) => {
                assert_eq!(symbol, "BTC");
                assert_eq!(requested, dec!(0.6));
                assert_eq!(available, dec!(0.5));
            }
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }

        assert_eq!(f.transactions.count().unwrap(), 2);
        assert_eq!(f.service.get_balance("u1", "BTC").unwrap(), dec!(0.5));

        let position = f.valuation.get_position("u1", "BTC").unwrap().unwrap();
        assert_eq!(position.position.quantity, dec!(0.5));
        assert_eq!(position.position.cost_basis, dec!(25000));
        assert_eq!(position.position.average_cost, dec!(50000));
    }

    #[tokio::test]
    async fn test_sell_without_prior_buys_rejected() {
        let f = fixture();
        let result = f
            .service
            .record_sell("u1", "BTC", dec!(0.1), dec!(50000), day(1))
            .await;
        assert!(is_insufficient_funds(&result));
        assert_eq!(f.transactions.count().unwrap(), 0);
        assert!(f.sink.is_empty());
    }

    #[tokio::test]
    async fn test_sell_of_exact_balance_accepted() {
        let f = fixture();
        f.service
            .record_buy("u1", "ETH", dec!(0.1), dec!(3000), day(1))
            .await
            .unwrap();
        f.service
            .record_buy("u1", "ETH", dec!(0.2), dec!(3100), day(2))
            .await
            .unwrap();
        f.service
            .record_sell("u1", "ETH", dec!(0.3), dec!(3200), day(3))
            .await
            .unwrap();

        assert!(f.service.get_balance("u1", "ETH").unwrap().is_zero());
        assert!(f.valuation.valuate("u1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_balances_are_per_user() {
        let f = fixture();
        f.service
            .record_buy("u1", "BTC", dec!(2), dec!(50000), day(1))
            .await
            .unwrap();

        let result = f
            .service
            .record_sell("u2", "BTC", dec!(1), dec!(50000), day(2))
            .await;
        assert!(is_insufficient_funds(&result));
        assert_eq!(f.service.get_balance("u2", "BTC").unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_asset_rejected_without_write() {
        let f = fixture();
        let result = f
            .service
            .record_buy("u1", "DOGE", dec!(100), dec!(0.1), day(1))
            .await;
        assert!(matches!(
            result,
            Err(Error::Transaction(TransactionError::AssetNotFound(ref s))) if s == "DOGE"
        ));
        assert_eq!(f.transactions.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_payload_rejected() {
        let f = fixture();
        let result = f
            .service
            .record_buy("u1", "BTC", dec!(0), dec!(50000), day(1))
            .await;
        let err = result.unwrap_err();
        assert!(err.is_user_error());
        assert!(matches!(
            err,
            Error::Transaction(TransactionError::InvalidData(_))
        ));
        assert_eq!(f.transactions.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_caller_supplied_name_is_overwritten() {
        let f = fixture();
        let mut new = NewTransaction::buy("u1", "ETH", dec!(1), dec!(3000), day(1));
        new.asset_name = "Not Ethereum".to_string();
        let created = f.service.record_transaction(new).await.unwrap();
        assert_eq!(created.asset_name, "Ethereum");
    }

    #[tokio::test]
    async fn test_delete_buy_after_full_sell_drops_position() {
        let f = fixture();
        let buy = f
            .service
            .record_buy("u1", "BTC", dec!(1.0), dec!(50000), day(1))
            .await
            .unwrap();
        f.service
            .record_sell("u1", "BTC", dec!(1.0), dec!(60000), day(2))
            .await
            .unwrap();

        let deleted = f.service.delete_transaction("u1", &buy.id).await.unwrap();
        assert_eq!(deleted.id, buy.id);

        assert_eq!(f.service.get_balance("u1", "BTC").unwrap(), dec!(-1.0));
        assert!(f.valuation.valuate("u1").unwrap().is_empty());
        assert!(f.valuation.get_position("u1", "BTC").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let f = fixture();
        let buy = f
            .service
            .record_buy("u1", "BTC", dec!(1), dec!(50000), day(1))
            .await
            .unwrap();

        let result = f.service.delete_transaction("u2", &buy.id).await;
        assert!(matches!(
            result,
            Err(Error::Transaction(TransactionError::NotFound(_)))
        ));
        let missing = f.service.delete_transaction("u1", "no-such-id").await;
        assert!(matches!(
            missing,
            Err(Error::Transaction(TransactionError::NotFound(_)))
        ));
        assert_eq!(f.transactions.count().unwrap(), 1);
        assert!(f.service.get_transaction("u1", &buy.id).is_ok());
        assert!(f.service.get_transaction("u2", &buy.id).is_err());
    }

    #[tokio::test]
    async fn test_list_transactions_filters_and_orders() {
        let f = fixture();
        f.service
            .record_buy("u1", "BTC", dec!(1), dec!(40000), day(1))
            .await
            .unwrap();
        f.service
            .record_buy("u1", "ETH", dec!(2), dec!(2000), day(5))
            .await
            .unwrap();
        f.service
            .record_sell("u1", "BTC", dec!(0.5), dec!(45000), day(10))
            .await
            .unwrap();
        f.service
            .record_buy("u2", "BTC", dec!(3), dec!(41000), day(6))
            .await
            .unwrap();

        let all = f.service.list_transactions("u1", None).unwrap();
        let dates: Vec<DateTime<Utc>> = all.iter().map(|t| t.transaction_date).collect();
        assert_eq!(dates, vec![day(10), day(5), day(1)]);
        assert!(all.iter().all(|t| t.user_id == "u1"));

        let btc = f
            .service
            .list_transactions("u1", Some(TransactionFilters::for_symbol("btc")))
            .unwrap();
        assert_eq!(btc.len(), 2);

        let btc_sells = f
            .service
            .list_transactions(
                "u1",
                Some(TransactionFilters::for_symbol("BTC").with_type(TransactionType::Sell)),
            )
            .unwrap();
        assert_eq!(btc_sells.len(), 1);
        assert_eq!(btc_sells[0].quantity, dec!(0.5));

        let early_january = f
            .service
            .list_transactions(
                "u1",
                Some(TransactionFilters::default().with_date_range(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                )),
            )
            .unwrap();
        assert_eq!(early_january.len(), 2);

        let nothing = f
            .service
            .list_transactions("u1", Some(TransactionFilters::for_symbol("SOL")))
            .unwrap();
        assert!(nothing.is_empty());
    }

    #[tokio::test]
    async fn test_events_emitted_after_writes() {
        let f = fixture();
        let buy = f
            .service
            .record_buy("u1", "ETH", dec!(1), dec!(3000), day(1))
            .await
            .unwrap();
        let _ = f
            .service
            .record_sell("u1", "ETH", dec!(5), dec!(3000), day(2))
            .await;
        f.service.delete_transaction("u1", &buy.id).await.unwrap();

        let expected = DomainEvent::transactions_changed("u1".to_string(), vec!["ETH".to_string()]);
        assert_eq!(f.sink.events(), vec![expected.clone(), expected]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sells_cannot_oversell() {
        let f = fixture();
        f.service
            .record_buy("u1", "BTC", dec!(1), dec!(50000), day(1))
            .await
            .unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = Arc::clone(&f.service);
                tokio::spawn(async move {
                    service
                        .record_sell("u1", "BTC", dec!(0.3), dec!(50000), day(2))
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(Error::Transaction(TransactionError::InsufficientFunds { .. })) => {
                    rejected += 1
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(accepted, 3);
        assert_eq!(rejected, 7);
        assert_eq!(f.service.get_balance("u1", "BTC").unwrap(), dec!(0.1));
    }

    #[tokio::test]
    async fn test_large_holding_values_without_overflow() {
        let f = fixture();
        f.assets
            .upsert(NewAsset::new("MEME", "Meme Coin", dec!(0.1)))
            .await
            .unwrap();
        f.service
            .record_buy("u1", "MEME", dec!(1000000000000000), dec!(0.1), day(1))
            .await
            .unwrap();
        f.service
            .record_sell("u1", "MEME", dec!(1), dec!(0.1), day(2))
            .await
            .unwrap();

        let valuations = f.valuation.valuate("u1").unwrap();
        assert_eq!(valuations.len(), 1);
        let position = &valuations[0].position;
        assert_eq!(position.quantity, dec!(999999999999999));
        assert_eq!(position.cost_basis, dec!(99999999999999.9));
        assert_eq!(position.average_cost, dec!(0.1));
        assert_eq!(position.unrealized_pnl, Decimal::ZERO);

        let portfolio = f.valuation.get_portfolio("u1").unwrap();
        assert_eq!(portfolio.summary.total_invested, dec!(99999999999999.9));
    }

    #[tokio::test]
    async fn test_out_of_range_amount_is_rejected_before_write() {
        let f = fixture();
        let result = f
            .service
            .record_buy(
                "u1",
                "BTC",
                dec!(1000000000000000),
                dec!(100000000000000),
                day(1),
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Transaction(TransactionError::InvalidData(_)))
        ));
        assert_eq!(f.transactions.count().unwrap(), 0);
        assert!(f.valuation.valuate("u1").unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delete_is_serialized_with_concurrent_sells() {
        for _ in 0..20 {
            let f = fixture();
            f.service
                .record_buy("u1", "BTC", dec!(1), dec!(50000), day(1))
                .await
                .unwrap();
            let extra = f
                .service
                .record_buy("u1", "BTC", dec!(1), dec!(50000), day(2))
                .await
                .unwrap();

            let delete = {
                let service = Arc::clone(&f.service);
                tokio::spawn(async move { service.delete_transaction("u1", &extra.id).await })
            };
            let sells: Vec<_> = (0..4)
                .map(|_| {
                    let service = Arc::clone(&f.service);
                    tokio::spawn(async move {
                        service
                            .record_sell("u1", "BTC", dec!(0.5), dec!(50000), day(3))
                            .await
                    })
                })
                .collect();

            delete.await.unwrap().unwrap();
            let mut accepted = 0;
            for handle in sells {
                match handle.await.unwrap() {
                    Ok(_) => accepted += 1,
                    Err(Error::Transaction(TransactionError::InsufficientFunds { .. })) => {}
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }

            // Sells that ran before the delete saw a balance of 2, later ones a
            // balance of 2 minus the deleted buy. Every serial order accepts 2 to 4.
            assert!((2..=4).contains(&accepted), "accepted {} sells", accepted);
            let balance = f.service.get_balance("u1", "BTC").unwrap();
            assert_eq!(balance, dec!(1) - dec!(0.5) * Decimal::from(accepted));
            assert_eq!(f.transactions.count().unwrap(), 1 + accepted as usize);
        }
    }
}
