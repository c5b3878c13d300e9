//! Commodity normalization.
//!
//! Records are created (or reloaded from storage) with bare numbers. Before
//! they are rendered or compared, every numeric field is tagged with the
//! commodity it is denominated in:
//!
//! | record       | base commodity            | quote commodity              |
//! |--------------|---------------------------|------------------------------|
//! | [`Trade`]    | `amount`, fee if `base`   | `price`, fee if `quote`      |
//! | [`Ticker`]   | `volume`                  | `bid` `ask` `high` `low` `last` |
//! | [`LimitOrder`] | `amount`, `exec_amount` | `price`                      |
//!
//! [`Credit`], [`Debit`], [`Balance`] and [`HotWalletBalance`] tag every
//! amount with their own `currency`. [`Address`] only has its currency
//! canonicalized.
//!
//! Tagging reads only the number of a field, so normalizing twice gives the
//! same record as normalizing once.

use crate::{
    Address, Balance, Commodity, Credit, Debit, HotWalletBalance, LimitOrder, Market, Quantity,
    ResultEngine, Ticker, Trade,
};

/// Records whose numeric fields can be tagged with their commodity.
pub trait Normalize: Sized {
    /// Returns a copy of the record with every amount tagged and rounded to
    /// 8 decimals. Nothing is returned if the market or currency is invalid.
    fn normalize(&self) -> ResultEngine<Self>;
}

/// Normalize any record; see [`Normalize`].
pub fn normalize<R: Normalize>(record: &R) -> ResultEngine<R> {
    record.normalize()
}

fn tagged(quantity: &Quantity, commodity: &Commodity) -> Quantity {
    Quantity::Tagged(quantity.tag(commodity))
}

impl Normalize for Trade {
    fn normalize(&self) -> ResultEngine<Self> {
        let amounts = self.amounts()?;

        Ok(Self {
            market: amounts.market.to_string(),
            amount: Quantity::Tagged(amounts.amount),
            price: Quantity::Tagged(amounts.price),
            fee: Quantity::Tagged(amounts.fee),
            ..self.clone()
        })
    }
}

impl Normalize for Ticker {
    fn normalize(&self) -> ResultEngine<Self> {
        let market: Market = self.market.parse()?;

        Ok(Self {
            bid: tagged(&self.bid, &market.quote),
            ask: tagged(&self.ask, &market.quote),
            high: tagged(&self.high, &market.quote),
            low: tagged(&self.low, &market.quote),
            volume: tagged(&self.volume, &market.base),
            last: tagged(&self.last, &market.quote),
            market: market.to_string(),
            ..self.clone()
        })
    }
}

impl Normalize for LimitOrder {
    fn normalize(&self) -> ResultEngine<Self> {
        let market: Market = self.market.parse()?;

        Ok(Self {
            price: tagged(&self.price, &market.quote),
            amount: tagged(&self.amount, &market.base),
            exec_amount: tagged(&self.exec_amount, &market.base),
            market: market.to_string(),
            ..self.clone()
        })
    }
}

impl Normalize for Credit {
    fn normalize(&self) -> ResultEngine<Self> {
        let currency = Commodity::try_from(self.currency.as_str())?;

        Ok(Self {
            amount: tagged(&self.amount, &currency),
            currency: currency.to_string(),
            ..self.clone()
        })
    }
}

impl Normalize for Debit {
    fn normalize(&self) -> ResultEngine<Self> {
        let currency = Commodity::try_from(self.currency.as_str())?;

        Ok(Self {
            amount: tagged(&self.amount, &currency),
            fee: tagged(&self.fee, &currency),
            currency: currency.to_string(),
            ..self.clone()
        })
    }
}

impl Normalize for Balance {
    fn normalize(&self) -> ResultEngine<Self> {
        let currency = Commodity::try_from(self.currency.as_str())?;

        Ok(Self {
            total: tagged(&self.total, &currency),
            available: tagged(&self.available, &currency),
            currency: currency.to_string(),
            ..self.clone()
        })
    }
}

impl Normalize for HotWalletBalance {
    fn normalize(&self) -> ResultEngine<Self> {
        let currency = Commodity::try_from(self.currency.as_str())?;

        Ok(Self {
            available: tagged(&self.available, &currency),
            total: tagged(&self.total, &currency),
            currency: currency.to_string(),
            ..self.clone()
        })
    }
}

impl Normalize for Address {
    fn normalize(&self) -> ResultEngine<Self> {
        let currency = Commodity::try_from(self.currency.as_str())?;

        Ok(Self {
            currency: currency.to_string(),
            ..self.clone()
        })
    }
}
