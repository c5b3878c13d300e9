use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::Database;

use engine::{
    Address, AddressState, Balance, Credit, Debit, EngineError, FeeSide, HotWalletBalance,
    LimitOrder, OrderSide, Quantity, Record, Store, Ticker, Trade, TradeSide, TransferState,
};
use migration::MigratorTrait;

async fn store_with_db() -> Store {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Store::builder().database(db).build()
}

fn time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 7, 10, 4, 56, 21).unwrap()
}

fn trade(trade_id: &str, time: DateTime<Utc>) -> Trade {
    Trade::new(
        trade_id,
        "helper",
        "btc_usd",
        TradeSide::Sell,
        dec!(1.1),
        dec!(770),
        dec!(1),
        FeeSide::Quote,
        time,
    )
}

fn credit(ref_id: &str, time: DateTime<Utc>) -> Credit {
    Credit::new(
        dec!(0.5),
        "1PkzTWAyfR9yoFw2jptKQ3g6E5nKXPsy8r",
        "BTC",
        "Bitcoin",
        TransferState::Complete,
        Some("invoice#1"),
        ref_id,
        7,
        time,
    )
}

#[tokio::test]
async fn trades_come_back_normalized() {
    let store = store_with_db().await;
    store.insert_trade(&trade("1", time())).await.unwrap();

    let trades = store.trades().await.unwrap();
    assert_eq!(trades.len(), 1);
    let stored = &trades[0];
    assert_eq!(stored.trade_id, "helper|1");
    assert_eq!(stored.market, "BTC_USD");
    assert!(matches!(stored.amount, Quantity::Tagged(_)));
    assert_eq!(stored.amount.to_string(), "1.10000000 BTC");
    assert_eq!(stored.price.to_string(), "770.00000000 USD");
    assert_eq!(stored.fee.to_string(), "1.00000000 USD");
    assert_eq!(stored.time, time());
}

#[tokio::test]
async fn latest_balance_is_the_newest_snapshot() {
    let store = store_with_db().await;
    let old = Balance::new(dec!(1), dec!(1), "BTC", None, 7, time());
    let new = Balance::new(
        dec!(2.5),
        dec!(2),
        "btc",
        Some("after deposit"),
        7,
        time() + Duration::hours(1),
    );
    let other_user = Balance::new(dec!(9), dec!(9), "BTC", None, 8, time() + Duration::hours(2));

    store.insert_balance(&new).await.unwrap();
    store.insert_balance(&old).await.unwrap();
    store.insert_balance(&other_user).await.unwrap();

    let latest = store.latest_balance(7, "btc").await.unwrap();
    assert_eq!(latest.total.to_string(), "2.50000000 BTC");
    assert_eq!(latest.available.to_string(), "2.00000000 BTC");
    assert_eq!(latest.reference.as_deref(), Some("after deposit"));

    assert!(matches!(
        store.latest_balance(7, "USD").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn same_time_balances_resolve_by_insertion_order() {
    let store = store_with_db().await;
    store
        .insert_balance(&Balance::new(dec!(1), dec!(1), "USD", None, 7, time()))
        .await
        .unwrap();
    store
        .insert_balance(&Balance::new(dec!(3), dec!(2), "USD", None, 7, time()))
        .await
        .unwrap();

    let latest = store.latest_balance(7, "USD").await.unwrap();
    assert_eq!(latest.total.to_string(), "3.00000000 USD");
}

#[tokio::test]
async fn journal_is_ordered_by_time() {
    let store = store_with_db().await;
    store
        .insert_trade(&trade("late", time() + Duration::minutes(10)))
        .await
        .unwrap();
    store.insert_credit(&credit("txid:0", time())).await.unwrap();
    store
        .insert_debit(&Debit::new(
            dec!(0.5),
            dec!(0),
            "addr",
            "BTC",
            "Bitcoin",
            TransferState::Complete,
            None,
            "txid:1",
            7,
            time() + Duration::minutes(5),
        ))
        .await
        .unwrap();

    let journal = store.journal().await.unwrap();
    assert_eq!(journal.len(), 3);

    let text = journal.to_string();
    let credit_at = text.find(" credit BTC").unwrap();
    let debit_at = text.find(" debit BTC").unwrap();
    let trade_at = text.find("helper BTC_USD sell").unwrap();
    assert!(credit_at < debit_at && debit_at < trade_at);
}

#[tokio::test]
async fn import_is_all_or_nothing() {
    let store = store_with_db().await;
    let records = vec![
        Record::Credit(credit("txid:0", time())),
        Record::Trade(trade("dup", time())),
        Record::Trade(trade("dup", time())),
    ];

    assert!(matches!(
        store.import(&records).await,
        Err(EngineError::Database(_))
    ));
    assert!(store.trades().await.unwrap().is_empty());
    assert!(store.credits().await.unwrap().is_empty());

    let imported = store.import(&records[..2]).await.unwrap();
    assert_eq!(imported, 2);
    assert_eq!(store.trades().await.unwrap().len(), 1);
    assert_eq!(store.credits().await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_records_are_not_stored() {
    let store = store_with_db().await;
    let mut bad = trade("1", time());
    bad.market = "BTCUSD".to_string();

    assert_eq!(
        store.insert_trade(&bad).await,
        Err(EngineError::MalformedMarket("BTCUSD".to_string()))
    );
    assert!(store.trades().await.unwrap().is_empty());
}

#[tokio::test]
async fn import_reads_tagged_json() {
    let store = store_with_db().await;
    let records: Vec<Record> = serde_json::from_str(
        r#"[
            {"kind": "trade", "trade_id": "42", "exchange": "helper", "market": "DASH_BTC",
             "side": "buy", "amount": 3, "price": "0.0125", "fee": 0.01, "fee_side": "base",
             "time": "2016-07-10T04:56:21Z"},
            {"kind": "ticker", "bid": 770, "ask": 772, "high": 790, "low": 760,
             "volume": 120.5, "last": 771, "market": "BTC_USD", "exchange": "helper",
             "time": "2016-07-10T04:56:21Z"},
            {"kind": "limit_order", "price": 770, "amount": 0.5, "market": "BTC_USD",
             "side": "bid", "exchange": "helper", "order_id": "17",
             "create_time": "2016-07-10T04:56:21Z"}
        ]"#,
    )
    .unwrap();
    assert_eq!(store.import(&records).await.unwrap(), 3);

    let trades = store.trades().await.unwrap();
    assert_eq!(trades[0].trade_id, "helper|42");
    assert_eq!(trades[0].fee.to_string(), "0.01000000 DASH");

    let ticker = store.latest_ticker("helper", "btc_usd").await.unwrap();
    assert_eq!(ticker.volume.to_string(), "120.50000000 BTC");

    let order = store.limit_order("helper|17").await.unwrap();
    assert_eq!(order.side, OrderSide::Bid);
    assert_eq!(order.price.to_string(), "770.00000000 USD");
    assert_eq!(order.exec_amount.to_string(), "0.00000000 BTC");
}

#[tokio::test]
async fn composite_tickers_can_be_stored() {
    let store = store_with_db().await;
    let ticker = |market: &str, price: Decimal| {
        Ticker::new(price, price, price, price, dec!(1), price, market, "helper", time())
    };
    store.insert_ticker(&ticker("DASH_BTC", dec!(0.0125))).await.unwrap();
    store.insert_ticker(&ticker("BTC_USD", dec!(770))).await.unwrap();

    let first = store.latest_ticker("helper", "DASH_BTC").await.unwrap();
    let second = store.latest_ticker("helper", "BTC_USD").await.unwrap();
    let composed = first.compose(&second).unwrap();
    store.insert_ticker(&composed).await.unwrap();

    let stored = store
        .latest_ticker(engine::COMPOSITE_EXCHANGE, "DASH_USD")
        .await
        .unwrap();
    assert_eq!(stored, composed);
    assert!(stored.is_composite());
}

#[tokio::test]
async fn temporary_limit_orders_round_trip() {
    let store = store_with_db().await;
    let order = LimitOrder::new(
        dec!(0.0125),
        dec!(3),
        "DASH_BTC",
        OrderSide::Ask,
        "helper",
        None,
        time(),
    );
    store.insert_limit_order(&order).await.unwrap();

    let stored = store.limit_order(&order.order_id).await.unwrap();
    assert!(stored.is_temporary());
    assert_eq!(stored.amount.to_string(), "3.00000000 DASH");
}

#[tokio::test]
async fn latest_hot_wallet_balance_per_network() {
    let store = store_with_db().await;
    let old = HotWalletBalance::new(dec!(1), dec!(2), "BTC", "Bitcoin", time());
    let new = HotWalletBalance::new(
        dec!(0.5),
        dec!(2.5),
        "btc",
        "Bitcoin",
        time() + Duration::hours(1),
    );
    let other = HotWalletBalance::new(
        dec!(9),
        dec!(9),
        "BTC",
        "Lightning",
        time() + Duration::hours(2),
    );
    store.insert_hot_wallet_balance(&new).await.unwrap();
    store.insert_hot_wallet_balance(&old).await.unwrap();
    store.insert_hot_wallet_balance(&other).await.unwrap();

    let latest = store
        .latest_hot_wallet_balance("BTC", "Bitcoin")
        .await
        .unwrap();
    assert_eq!(latest.available.to_string(), "0.50000000 BTC");
    assert_eq!(latest.total.to_string(), "2.50000000 BTC");
    assert_eq!(latest.currency, "BTC");

    assert!(matches!(
        store.latest_hot_wallet_balance("DASH", "Dash").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn addresses_are_listed_per_user() {
    let store = store_with_db().await;
    let records: Vec<Record> = serde_json::from_str(
        r#"[
            {"kind": "address", "address": "1PkzTWAyfR9yoFw2jptKQ3g6E5nKXPsy8r",
             "currency": "btc", "network": "Bitcoin", "user_id": 7},
            {"kind": "address", "address": "XhwWxABXPVG5Z3ePyLVA3VixPRkARK6FKy",
             "currency": "DASH", "network": "Dash", "state": "active", "user_id": 7},
            {"kind": "hot_wallet_balance", "available": 3, "total": "4",
             "currency": "dash", "network": "Dash", "time": "2016-07-10T04:56:21Z"}
        ]"#,
    )
    .unwrap();
    assert_eq!(store.import(&records).await.unwrap(), 3);
    store
        .insert_address(&Address::new(
            "addr",
            "BTC",
            "Bitcoin",
            AddressState::Blocked,
            8,
        ))
        .await
        .unwrap();

    let addresses = store.addresses(7).await.unwrap();
    assert_eq!(addresses.len(), 2);
    assert_eq!(addresses[0].currency, "BTC");
    assert_eq!(addresses[0].state, AddressState::Pending);
    assert_eq!(addresses[1].state, AddressState::Active);

    let hot = store.latest_hot_wallet_balance("DASH", "Dash").await.unwrap();
    assert_eq!(hot.total.to_string(), "4.00000000 DASH");
}
