use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use engine::{
    Amount, Credit, Debit, FeeSide, Journal, Ticker, Trade, TradeSide, TransferState,
    render_ledger,
};

fn time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 7, 10, 4, 56, 21).unwrap()
}

/// Sum the amounts of every posting line, per commodity.
fn posting_totals(ledger: &str) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for line in ledger.lines().filter(|l| l.starts_with("    ") && !l.contains(';')) {
        let amount = line
            .split("   ")
            .nth(2)
            .map(|s| s.split(" @ ").next().unwrap_or(s).trim())
            .unwrap();
        let amount: Amount = amount.parse().unwrap();
        let code = amount.commodity().to_string();
        match totals.iter_mut().find(|(c, _)| *c == code) {
            Some((_, total)) => *total += amount.number(),
            None => totals.push((code, amount.number())),
        }
    }
    totals
}

#[test]
fn sell_with_quote_fee_renders_full_fragment() {
    let trade = Trade::new(
        "id",
        "helper",
        "BTC_USD",
        TradeSide::Sell,
        dec!(1.1),
        dec!(770),
        dec!(1),
        FeeSide::Quote,
        time(),
    );

    assert_eq!(
        render_ledger(&trade).unwrap(),
        "P 2016/07/10 04:56:21 BTC 770.00000000 USD\n\
         P 2016/07/10 04:56:21 USD 0.00129870 BTC\n\
         2016/07/10 04:56:21 helper BTC_USD sell\n\
         \x20   ;<Trade(trade_id='helper|id', side='sell', amount=1.10000000 BTC, \
         price=770.00000000 USD, fee=1.00000000 USD, fee_side='quote', market='BTC_USD', \
         exchange='helper', time=2016/07/10 04:56:21)>\n\
         \x20   Assets:helper:USD    846.00000000 USD @ 0.00129870 BTC\n\
         \x20   FX:BTC_USD:sell   -847.00000000 USD @ 0.00129870 BTC\n\
         \x20   Assets:helper:BTC    -1.10000000 BTC @ 770.00000000 USD\n\
         \x20   FX:BTC_USD:sell   1.10000000 BTC @ 770.00000000 USD\n\
         \x20   Expenses:TradeFee    1.00000000 USD @ 0.00129870 BTC\n"
    );
}

#[test]
fn lowercase_market_renders_like_canonical_one() {
    let trade = |market: &str| {
        Trade::new(
            "id",
            "helper",
            market,
            TradeSide::Buy,
            dec!(2),
            dec!(0.0125),
            dec!(0),
            FeeSide::Base,
            time(),
        )
    };
    assert_eq!(
        render_ledger(&trade("dash_btc")).unwrap(),
        render_ledger(&trade("DASH_BTC")).unwrap()
    );
}

#[test]
fn credit_and_zero_fee_debit_net_to_zero() {
    let credit = Credit::new(
        dec!(0.75),
        "XhwWxABXPVG5Z3ePyLVA3VixPRkARK6FKy",
        "DASH",
        "Dash",
        TransferState::Complete,
        Some("deposit"),
        "txid:in",
        3,
        time(),
    );
    let debit = Debit::new(
        dec!(0.75),
        dec!(0),
        "XhwWxABXPVG5Z3ePyLVA3VixPRkARK6FKy",
        "DASH",
        "Dash",
        TransferState::Complete,
        Some("deposit"),
        "txid:out",
        3,
        time(),
    );

    let mut journal = Journal::new();
    journal.push(&credit).unwrap();
    journal.push(&debit).unwrap();

    assert_eq!(
        posting_totals(&journal.to_string()),
        vec![("DASH".to_string(), Decimal::ZERO)]
    );
}

#[test]
fn debit_fee_is_booked_as_expense() {
    let debit = Debit::new(
        dec!(-1.5),
        dec!(-0.0001),
        "addr",
        "btc",
        "Bitcoin",
        TransferState::Complete,
        None,
        "txid:out",
        3,
        time(),
    );
    let entry = render_ledger(&debit).unwrap();

    // Negative inputs are stored as magnitudes; the missing reference falls
    // back to the network name.
    assert!(entry.starts_with("2016/07/10 04:56:21 Bitcoin debit BTC\n"));
    assert!(entry.contains("    Expenses:MinerFee   0.00010000 BTC\n"));
    assert_eq!(
        posting_totals(&entry),
        vec![("BTC".to_string(), Decimal::ZERO)]
    );
}

#[test]
fn composed_ticker_from_json_records() {
    let dash_btc: Ticker = serde_json::from_str(
        r#"{"bid": 0.0125, "ask": 0.013, "high": 0.014, "low": 0.012, "volume": 5000,
            "last": 0.0128, "market": "dash_btc", "exchange": "helper",
            "time": "2016-07-10T04:56:21Z"}"#,
    )
    .unwrap();
    let btc_usd: Ticker = serde_json::from_str(
        r#"{"bid": "770", "ask": "772 USD", "high": 790, "low": 760, "volume": 120.5,
            "last": 771, "market": "BTC_USD", "exchange": "helper",
            "time": "2016-07-10T04:57:00Z"}"#,
    )
    .unwrap();

    let dash_usd = dash_btc.compose(&btc_usd).unwrap();
    assert_eq!(dash_usd.market, "DASH_USD");
    assert_eq!(dash_usd.bid.to_string(), "9.62500000 USD");
    assert_eq!(dash_usd.high.to_string(), "11.06000000 USD");
    assert_eq!(dash_usd.time, btc_usd.time);
}
