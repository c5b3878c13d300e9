//! Exchange records rendered as a double-entry ledger.
//!
//! Trades, credits, debits, balances, tickers, limit orders, hot wallet
//! balances and addresses are plain records. [`Normalize`] tags their numbers with the commodity implied by
//! their market or currency, [`LedgerEntry`] renders them as `ledger` text and
//! [`compose_tickers`] chains two tickers into a cross rate. [`Store`] keeps
//! them in a database.

pub use addresses::{Address, AddressState};
pub use amount::{Amount, Quantity};
pub use balances::Balance;
pub use commodity::Commodity;
pub use compose::{COMPOSITE_EXCHANGE, compose_tickers};
pub use credits::{Credit, TransferState};
pub use debits::Debit;
pub use error::EngineError;
pub use hot_wallets::HotWalletBalance;
pub use ledger::{DATE_FORMAT, Journal, LedgerEntry, render_ledger};
pub use limit_orders::{LimitOrder, OrderSide, OrderState, TEMPORARY_ORDER_PREFIX};
pub use market::Market;
pub use normalize::{Normalize, normalize};
pub use store::{Record, Store, StoreBuilder};
pub use tickers::Ticker;
pub use trades::{FeeSide, Trade, TradeSide};

mod addresses;
mod amount;
mod balances;
mod commodity;
mod compose;
mod credits;
mod debits;
mod error;
mod hot_wallets;
mod ledger;
mod limit_orders;
mod market;
mod normalize;
mod store;
mod tickers;
mod trades;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
