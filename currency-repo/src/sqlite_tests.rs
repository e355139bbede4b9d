//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use currency_types::{
        ConversionId, CurrencyCode, DomainError, HistoryRepository, HistorySession,
        NewConversion, RepoError,
    };
    use rust_decimal_macros::dec;

    use crate::{Repo, SqliteRepo, build_repo};

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn usd_to_eur(amount: rust_decimal::Decimal) -> NewConversion {
        NewConversion::new(
            CurrencyCode::USD,
            CurrencyCode::EUR,
            amount,
            (amount * dec!(0.85)).round_dp(2),
            dec!(0.85),
            Some("203.0.113.7".to_string()),
        )
    }

    async fn add_committed(repo: &SqliteRepo, record: NewConversion) -> ConversionId {
        let mut session = repo.begin().await.unwrap();
        let stored = session.add(record).await.unwrap();
        session.commit().await.unwrap();
        stored.id
    }

    #[tokio::test]
    async fn test_add_and_commit() {
        let repo = setup_repo().await;

        let mut session = repo.begin().await.unwrap();
        let stored = session.add(usd_to_eur(dec!(100))).await.unwrap();
        let written = session.commit().await.unwrap();

        assert_eq!(written, 1);
        assert!(stored.id.value() > 0);
        assert_eq!(stored.converted_amount, dec!(85.00));
        assert_eq!(stored.client_ip.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn test_get_by_id_round_trips_values() {
        let repo = setup_repo().await;
        let new = usd_to_eur(dec!(12.34));
        let expected_date = new.conversion_date;

        let id = add_committed(&repo, new).await;
        let fetched = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(fetched.id, id);
        assert_eq!(fetched.from_currency, CurrencyCode::USD);
        assert_eq!(fetched.to_currency, CurrencyCode::EUR);
        assert_eq!(fetched.amount, dec!(12.34));
        assert_eq!(fetched.converted_amount, dec!(10.49));
        assert_eq!(fetched.exchange_rate, dec!(0.85));
        assert_eq!(
            fetched.conversion_date.timestamp_micros(),
            expected_date.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_added_record_matches_stored_record() {
        let repo = setup_repo().await;
        let rate = dec!(1) / dec!(0.85);
        let new = NewConversion::new(
            CurrencyCode::EUR,
            CurrencyCode::USD,
            dec!(100.005),
            (dec!(100.005) * rate).round_dp(2),
            rate,
            None,
        );

        let mut session = repo.begin().await.unwrap();
        let stored = session.add(new.clone()).await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(stored.amount, new.amount);
        assert_eq!(stored.exchange_rate, rate);
        assert_eq!(stored.conversion_date, new.conversion_date);

        let fetched = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let repo = setup_repo().await;

        let result = repo.get_by_id(ConversionId::new(999)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = setup_repo().await;

        let first = add_committed(&repo, usd_to_eur(dec!(1))).await;
        let second = add_committed(&repo, usd_to_eur(dec!(2))).await;

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_uncommitted_session_is_discarded() {
        let repo = setup_repo().await;

        {
            let mut session = repo.begin().await.unwrap();
            session.add(usd_to_eur(dec!(100))).await.unwrap();
            // dropped without commit
        }

        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_commits_several_rows() {
        let repo = setup_repo().await;

        let mut session = repo.begin().await.unwrap();
        session.add(usd_to_eur(dec!(1))).await.unwrap();
        session.add(usd_to_eur(dec!(2))).await.unwrap();
        session.add(usd_to_eur(dec!(3))).await.unwrap();

        assert_eq!(session.commit().await.unwrap(), 3);
        assert_eq!(repo.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_all_newest_first() {
        let repo = setup_repo().await;
        let now = Utc::now();

        let mut oldest = usd_to_eur(dec!(1));
        oldest.conversion_date = now - Duration::hours(2);
        let mut newest = usd_to_eur(dec!(2));
        newest.conversion_date = now;
        let mut middle = usd_to_eur(dec!(3));
        middle.conversion_date = now - Duration::hours(1);

        add_committed(&repo, oldest).await;
        add_committed(&repo, newest).await;
        add_committed(&repo, middle).await;

        let amounts: Vec<_> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.amount)
            .collect();

        assert_eq!(amounts, vec![dec!(2), dec!(3), dec!(1)]);
    }

    #[tokio::test]
    async fn test_same_timestamp_ordered_by_id_desc() {
        let repo = setup_repo().await;
        let now = Utc::now();

        let mut a = usd_to_eur(dec!(1));
        a.conversion_date = now;
        let mut b = usd_to_eur(dec!(2));
        b.conversion_date = now;

        let first = add_committed(&repo, a).await;
        let second = add_committed(&repo, b).await;

        let all = repo.get_all().await.unwrap();
        assert_eq!(all[0].id, second);
        assert_eq!(all[1].id, first);
    }

    #[tokio::test]
    async fn test_get_recent_limits_results() {
        let repo = setup_repo().await;
        for i in 1..=5 {
            add_committed(&repo, usd_to_eur(rust_decimal::Decimal::from(i))).await;
        }

        let recent = repo.get_recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].amount, dec!(5));

        let more_than_stored = repo.get_recent(50).await.unwrap();
        assert_eq!(more_than_stored.len(), 5);
    }

    #[tokio::test]
    async fn test_get_recent_rejects_non_positive_count() {
        let repo = setup_repo().await;

        for count in [0, -1] {
            let result = repo.get_recent(count).await;
            assert!(matches!(
                result,
                Err(RepoError::Domain(DomainError::InvalidArgument(_)))
            ));
        }
    }

    #[tokio::test]
    async fn test_build_repo_selects_sqlite() {
        let repo = build_repo("sqlite::memory:").await.unwrap();
        assert!(matches!(repo, Repo::Sqlite(_)));

        let mut session = repo.begin().await.unwrap();
        session.add(usd_to_eur(dec!(10))).await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(repo.get_recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_build_repo_rejects_unknown_scheme() {
        let err = build_repo("mysql://localhost/currency").await.err().unwrap();
        assert!(err.to_string().contains("mysql"));
    }
}
