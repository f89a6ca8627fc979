//! Binance data parser module.
//!
//! Converts Binance REST payloads into the unified types.

use rust_decimal::Decimal;
use serde_json::Value;
use unicex_core::base_exchange::common_currency_code;
use unicex_core::error::{Error, ParseError, Result};
use unicex_core::parser_utils::{safe_bool, safe_decimal, safe_integer, safe_integer2, safe_string};
use unicex_core::time::{iso8601, milliseconds};
use unicex_core::types::{
    Balance, BalanceEntry, Market, MarketLimits, MarketPrecision, MinMax, Order,
    OrderBook, OrderSide, OrderStatus, OrderType, parse_order_book as parse_book,
};

/// Maps a native order status onto the unified set.
pub fn parse_order_status(status: &str) -> Option<OrderStatus> {
    match status {
        "NEW" | "PARTIALLY_FILLED" => Some(OrderStatus::Open),
        "FILLED" => Some(OrderStatus::Closed),
        "CANCELED" => Some(OrderStatus::Canceled),
        "PENDING_CANCEL" => Some(OrderStatus::Canceling),
        "REJECTED" => Some(OrderStatus::Rejected),
        "EXPIRED" | "EXPIRED_IN_MATCH" => Some(OrderStatus::Failed),
        _ => None,
    }
}

/// Parses one `exchangeInfo.symbols[]` entry.
///
/// Symbols closed to spot trading are skipped.
pub fn parse_market(data: &Value) -> Result<Option<Market>> {
    if safe_bool(data, "isSpotTradingAllowed") == Some(false) {
        return Ok(None);
    }

    let id = safe_string(data, "symbol")
        .ok_or_else(|| Error::from(ParseError::missing_field("symbol")))?;
    let base_id = safe_string(data, "baseAsset")
        .ok_or_else(|| Error::from(ParseError::missing_field("baseAsset")))?;
    let quote_id = safe_string(data, "quoteAsset")
        .ok_or_else(|| Error::from(ParseError::missing_field("quoteAsset")))?;

    let base = common_currency_code(&base_id);
    let quote = common_currency_code(&quote_id);

    let mut precision = MarketPrecision {
        base: safe_integer(data, "baseAssetPrecision").and_then(digits_to_tick),
        quote: safe_integer2(data, "quoteAssetPrecision", "quotePrecision").and_then(digits_to_tick),
        ..MarketPrecision::default()
    };
    let mut limits = MarketLimits::default();

    if let Some(filters) = data.get("filters").and_then(Value::as_array) {
        for filter in filters {
            match safe_string(filter, "filterType").as_deref() {
                Some("PRICE_FILTER") => {
                    precision.price = safe_decimal(filter, "tickSize").map(|d| d.normalize());
                    limits.price = MinMax::new(
                        positive(safe_decimal(filter, "minPrice")),
                        positive(safe_decimal(filter, "maxPrice")),
                    );
                }
                Some("LOT_SIZE") => {
                    precision.amount = safe_decimal(filter, "stepSize").map(|d| d.normalize());
                    limits.amount = MinMax::new(
                        positive(safe_decimal(filter, "minQty")),
                        positive(safe_decimal(filter, "maxQty")),
                    );
                }
                Some("MIN_NOTIONAL" | "NOTIONAL") => {
                    limits.cost.min = positive(safe_decimal(filter, "minNotional"));
                }
                _ => {}
            }
        }
    }

    let mut market = Market::spot(id, base, quote);
    market.base_id = base_id;
    market.quote_id = quote_id;
    market.active = safe_string(data, "status").as_deref() == Some("TRADING");
    market.precision = precision;
    market.limits = limits;
    market.info = data.clone();
    Ok(Some(market))
}

/// Parses an order from any of the order endpoints.
pub fn parse_order(data: &Value, market: Option<&Market>) -> Result<Order> {
    let id = safe_string(data, "orderId")
        .ok_or_else(|| Error::from(ParseError::missing_field("orderId")))?;
    let symbol = match market {
        Some(m) => m.symbol.clone(),
        None => safe_string(data, "symbol").unwrap_or_default(),
    };

    let timestamp = safe_integer2(data, "time", "transactTime");
    let raw_type = safe_string(data, "type");
    // market orders report a zero price
    let price = safe_decimal(data, "price").filter(|p| !p.is_zero());

    Ok(Order {
        id,
        client_order_id: safe_string(data, "clientOrderId"),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        last_trade_timestamp: safe_integer(data, "updateTime"),
        symbol,
        order_type: raw_type.as_deref().and_then(OrderType::parse),
        raw_type,
        time_in_force: safe_string(data, "timeInForce"),
        side: safe_string(data, "side").as_deref().and_then(OrderSide::parse),
        price,
        average: None,
        amount: safe_decimal(data, "origQty"),
        filled: safe_decimal(data, "executedQty"),
        remaining: None,
        cost: safe_decimal(data, "cummulativeQuoteQty"),
        status: safe_string(data, "status")
            .as_deref()
            .and_then(parse_order_status),
        fee: None,
        info: data.clone(),
    }
    .complete())
}

/// Parses a `depth` snapshot. The payload has no time, so the book is
/// stamped with the local receive time.
pub fn parse_order_book(data: &Value, symbol: &str) -> OrderBook {
    let mut book = parse_book(data, symbol, Some(milliseconds()), "bids", "asks", 0, 1);
    book.nonce = safe_integer(data, "lastUpdateId");
    book
}

/// Parses the `account` response.
pub fn parse_balance(data: &Value) -> Balance {
    let mut balance = Balance {
        timestamp: safe_integer(data, "updateTime"),
        info: data.clone(),
        ..Balance::default()
    };

    if let Some(assets) = data.get("balances").and_then(Value::as_array) {
        for asset in assets {
            let Some(code) = safe_string(asset, "asset") else {
                continue;
            };
            let entry = BalanceEntry {
                free: safe_decimal(asset, "free"),
                used: safe_decimal(asset, "locked"),
                total: None,
            };
            balance.set(common_currency_code(&code), entry);
        }
    }
    balance
}

fn digits_to_tick(digits: i64) -> Option<Decimal> {
    let scale = u32::try_from(digits).ok().filter(|s| *s <= 28)?;
    Some(Decimal::new(1, scale))
}

/// Binance reports absent limits as zero.
fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| v.is_sign_positive() && !v.is_zero())
}
