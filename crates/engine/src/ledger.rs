//! Ledger rendering.
//!
//! Trades, credits and debits are rendered as plain-text double-entry
//! transactions in `ledger` syntax. Every record is normalized first, so the
//! output only depends on the record's numbers, market and currency.
//!
//! A sell of `1.1 BTC` at `770 USD` with a `1 USD` fee renders as:
//!
//! ```text
//! P 2016/07/10 04:56:21 BTC 770.00000000 USD
//! P 2016/07/10 04:56:21 USD 0.00129870 BTC
//! 2016/07/10 04:56:21 helper BTC_USD sell
//!     ;<Trade(trade_id='helper|id', side='sell', amount=1.10000000 BTC, ...)>
//!     Assets:helper:USD    846.00000000 USD @ 0.00129870 BTC
//!     FX:BTC_USD:sell   -847.00000000 USD @ 0.00129870 BTC
//!     Assets:helper:BTC    -1.10000000 BTC @ 770.00000000 USD
//!     FX:BTC_USD:sell   1.10000000 BTC @ 770.00000000 USD
//!     Expenses:TradeFee    1.00000000 USD @ 0.00129870 BTC
//! ```

use std::{fmt, io};

use chrono::{DateTime, Utc};

use crate::{
    Amount, Credit, Debit, EngineError, FeeSide, Normalize, Quantity, ResultEngine, Trade,
    TradeSide, trades::TradeAmounts,
};

/// Timestamp format used in ledger lines and record representations.
pub const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Records that can be written to a ledger file.
pub trait LedgerEntry {
    /// When the entry happened; used to order a [`Journal`].
    fn ledger_time(&self) -> DateTime<Utc>;

    /// Render the record as a `\n`-terminated ledger fragment.
    fn ledger_entry(&self) -> ResultEngine<String>;
}

/// Render any ledger record; see [`LedgerEntry`].
pub fn render_ledger<R: LedgerEntry>(record: &R) -> ResultEngine<String> {
    record.ledger_entry()
}

/// Signed legs of a trade, as seen from the exchange account (`mine`) and
/// from the FX clearing account (`vol`).
struct TradeLegs {
    q_mine: Amount,
    q_vol: Amount,
    b_mine: Amount,
    b_vol: Amount,
}

fn trade_legs(
    side: TradeSide,
    fee_side: FeeSide,
    amounts: &TradeAmounts,
) -> ResultEngine<TradeLegs> {
    let TradeAmounts {
        market,
        amount,
        price,
        fee,
    } = amounts;
    let notional = |quantity: &Amount| {
        quantity
            .retag(market.quote.clone())
            .checked_mul(price.number())
    };

    if !fee.is_positive() {
        let q = notional(amount)?;
        return Ok(match side {
            TradeSide::Sell => TradeLegs {
                q_mine: q.clone(),
                q_vol: -q,
                b_mine: -amount.clone(),
                b_vol: amount.clone(),
            },
            TradeSide::Buy => TradeLegs {
                q_mine: -q.clone(),
                q_vol: q,
                b_mine: amount.clone(),
                b_vol: -amount.clone(),
            },
        });
    }

    // A base-side fee shrinks the base leg on one side only; the sibling leg
    // keeps the full amount.
    let legs = match (fee_side, side) {
        (FeeSide::Quote, TradeSide::Sell) => {
            let q = notional(amount)?;
            TradeLegs {
                q_mine: q.checked_sub(fee)?,
                q_vol: -q,
                b_mine: -amount.clone(),
                b_vol: amount.clone(),
            }
        }
        (FeeSide::Quote, TradeSide::Buy) => {
            let q = notional(amount)?;
            TradeLegs {
                q_mine: (-q.clone()).checked_sub(fee)?,
                q_vol: q,
                b_mine: amount.clone(),
                b_vol: -amount.clone(),
            }
        }
        (FeeSide::Base, TradeSide::Sell) => {
            let net = amount.checked_sub(fee)?;
            let q = notional(&net)?;
            TradeLegs {
                q_mine: q.clone(),
                q_vol: -q,
                b_mine: -amount.clone(),
                b_vol: net,
            }
        }
        (FeeSide::Base, TradeSide::Buy) => {
            let q = notional(amount)?;
            TradeLegs {
                q_mine: -q.clone(),
                q_vol: q,
                b_mine: amount.checked_sub(fee)?,
                b_vol: -amount.clone(),
            }
        }
    };
    Ok(legs)
}

impl LedgerEntry for Trade {
    fn ledger_time(&self) -> DateTime<Utc> {
        self.time
    }

    fn ledger_entry(&self) -> ResultEngine<String> {
        let trade = self.normalize()?;
        let amounts = trade.amounts()?;
        let (base, quote) = (&amounts.market.base, &amounts.market.quote);
        let price = &amounts.price;
        // Price of one quote unit, counted in base.
        let q_price = price.retag(base.clone()).inverted()?;

        let date = trade.time.format(DATE_FORMAT);
        let side = trade.side.as_str();
        let (exchange, market) = (&trade.exchange, &trade.market);
        let legs = trade_legs(trade.side, trade.fee_side, &amounts)?;

        let mut ledger = String::new();
        ledger.push_str(&format!("P {date} {base} {price}\n"));
        ledger.push_str(&format!("P {date} {quote} {q_price}\n"));
        ledger.push_str(&format!("{date} {exchange} {market} {side}\n"));
        ledger.push_str(&format!("    ;{trade}\n"));
        ledger.push_str(&format!(
            "    Assets:{exchange}:{quote}    {} @ {q_price}\n",
            legs.q_mine
        ));
        ledger.push_str(&format!(
            "    FX:{market}:{side}   {} @ {q_price}\n",
            legs.q_vol
        ));
        ledger.push_str(&format!(
            "    Assets:{exchange}:{base}    {} @ {price}\n",
            legs.b_mine
        ));
        ledger.push_str(&format!("    FX:{market}:{side}   {} @ {price}\n", legs.b_vol));

        if amounts.fee.is_positive() {
            let fee_price = match trade.fee_side {
                FeeSide::Base => price,
                FeeSide::Quote => &q_price,
            };
            ledger.push_str(&format!(
                "    Expenses:TradeFee    {} @ {fee_price}\n",
                amounts.fee
            ));
        } else {
            ledger.push('\n');
        }

        Ok(ledger)
    }
}

impl LedgerEntry for Credit {
    fn ledger_time(&self) -> DateTime<Utc> {
        self.time
    }

    fn ledger_entry(&self) -> ResultEngine<String> {
        let credit = self.normalize()?;
        let date = credit.time.format(DATE_FORMAT);
        let (account, currency) = (credit.account(), &credit.currency);
        let amount = tagged(&credit.amount, "credit amount")?;
        let negated = -amount.clone();

        let mut ledger = format!("{date} {account} credit {currency}\n");
        ledger.push_str(&format!(
            "    Assets:{account}:{currency}:credit    {amount}\n"
        ));
        ledger.push_str(&format!("    Equity:Wallet:{currency}:debit   {negated}\n"));
        ledger.push('\n');
        Ok(ledger)
    }
}

impl LedgerEntry for Debit {
    fn ledger_time(&self) -> DateTime<Utc> {
        self.time
    }

    fn ledger_entry(&self) -> ResultEngine<String> {
        let debit = self.normalize()?;
        let amount = tagged(&debit.amount, "debit amount")?;
        let fee = tagged(&debit.fee, "debit fee")?;
        if !amount.is_positive() {
            return Err(EngineError::NegativeAmountInvariantViolation(format!(
                "debit {} amount must be > 0, got {amount}",
                debit.ref_id
            )));
        }
        if fee.is_negative() {
            return Err(EngineError::NegativeAmountInvariantViolation(format!(
                "debit {} fee must be >= 0, got {fee}",
                debit.ref_id
            )));
        }

        let date = debit.time.format(DATE_FORMAT);
        let (account, currency) = (debit.account(), &debit.currency);

        let mut ledger = format!("{date} {account} debit {currency}\n");
        ledger.push_str(&format!(
            "    Assets:{account}:{currency}:debit    {}\n",
            -amount.clone()
        ));
        if fee.is_positive() {
            ledger.push_str(&format!(
                "    Equity:Wallet:{currency}:credit   {}\n",
                amount.checked_sub(fee)?
            ));
            ledger.push_str(&format!("    Expenses:MinerFee   {fee}\n"));
        } else {
            ledger.push_str(&format!("    Equity:Wallet:{currency}:credit   {amount}\n"));
        }
        ledger.push('\n');
        Ok(ledger)
    }
}

fn tagged<'a>(quantity: &'a Quantity, field: &str) -> ResultEngine<&'a Amount> {
    quantity
        .amount()
        .ok_or_else(|| EngineError::InvalidRecord(format!("{field} was not normalized")))
}

/// Rendered ledger entries, kept in chronological order.
///
/// Entries with the same timestamp keep the order they were pushed in.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    entries: Vec<(DateTime<Utc>, String)>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `record` and add it to the journal.
    ///
    /// On error the journal is left untouched.
    pub fn push<R: LedgerEntry>(&mut self, record: &R) -> ResultEngine<()> {
        let entry = record.ledger_entry()?;
        let time = record.ledger_time();
        let index = self.entries.partition_point(|(t, _)| *t <= time);
        self.entries.insert(index, (time, entry));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry, oldest first.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for (_, entry) in &self.entries {
            out.write_all(entry.as_bytes())?;
        }
        out.flush()
    }
}

impl fmt::Display for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, entry) in &self.entries {
            f.write_str(entry)?;
        }
        Ok(())
    }
}
