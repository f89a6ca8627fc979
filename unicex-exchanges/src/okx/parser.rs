//! OKX v5 payload parsing.
//!
//! Every v5 response wraps its payload as `{"code": "0", "msg": "", "data": [..]}`.

use serde_json::Value;
use unicex_core::base_exchange::common_currency_code;
use unicex_core::error::{Error, ParseError, Result};
use unicex_core::parser_utils::{safe_decimal, safe_integer, safe_string};
use unicex_core::time::iso8601;
use unicex_core::types::{
    Balance, BalanceEntry, Fee, Market, MarketLimits, MarketPrecision, MinMax, Order, OrderBook,
    OrderSide, OrderStatus, OrderType, parse_order_book as parse_book,
};

/// The `data` array of a v5 envelope.
pub fn data_list(response: &Value) -> Result<&Vec<Value>> {
    response
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::bad_response("okx response has no data array"))
}

/// The first element of the `data` array.
pub fn first_item(response: &Value) -> Result<&Value> {
    data_list(response)?
        .first()
        .ok_or_else(|| Error::bad_response("okx response data is empty"))
}

/// Maps a native order state onto the unified set.
pub fn parse_order_status(status: &str) -> Option<OrderStatus> {
    match status {
        "live" | "partially_filled" => Some(OrderStatus::Open),
        "filled" => Some(OrderStatus::Closed),
        "canceled" | "mmp_canceled" => Some(OrderStatus::Canceled),
        _ => None,
    }
}

/// Parses one `public/instruments` entry. Only spot instruments are kept.
pub fn parse_market(data: &Value) -> Result<Option<Market>> {
    if safe_string(data, "instType").as_deref() != Some("SPOT") {
        return Ok(None);
    }

    let id = safe_string(data, "instId")
        .ok_or_else(|| Error::from(ParseError::missing_field("instId")))?;
    let base_id = safe_string(data, "baseCcy")
        .ok_or_else(|| Error::from(ParseError::missing_field("baseCcy")))?;
    let quote_id = safe_string(data, "quoteCcy")
        .ok_or_else(|| Error::from(ParseError::missing_field("quoteCcy")))?;

    let mut market = Market::spot(
        id,
        common_currency_code(&base_id),
        common_currency_code(&quote_id),
    );
    market.base_id = base_id;
    market.quote_id = quote_id;
    market.active = safe_string(data, "state").as_deref() == Some("live");
    market.precision = MarketPrecision {
        price: safe_decimal(data, "tickSz").map(|d| d.normalize()),
        amount: safe_decimal(data, "lotSz").map(|d| d.normalize()),
        ..MarketPrecision::default()
    };
    market.limits = MarketLimits {
        amount: MinMax::new(safe_decimal(data, "minSz"), safe_decimal(data, "maxLmtSz")),
        ..MarketLimits::default()
    };
    market.info = data.clone();
    Ok(Some(market))
}

/// Parses an order from `trade/order`, `trade/orders-pending` or the
/// acknowledgement of `trade/order` and `trade/cancel-order`.
pub fn parse_order(data: &Value, market: Option<&Market>) -> Result<Order> {
    let id = safe_string(data, "ordId")
        .ok_or_else(|| Error::from(ParseError::missing_field("ordId")))?;
    let symbol = match market {
        Some(m) => m.symbol.clone(),
        None => safe_string(data, "instId").unwrap_or_default(),
    };

    let timestamp = safe_integer(data, "cTime");
    let raw_type = safe_string(data, "ordType");
    let fee = safe_decimal(data, "fee").map(|cost| Fee {
        currency: safe_string(data, "feeCcy")
            .filter(|c| !c.is_empty())
            .map(|c| common_currency_code(&c)),
        cost: cost.abs(),
        rate: None,
    });

    Ok(Order {
        id,
        client_order_id: safe_string(data, "clOrdId").filter(|c| !c.is_empty()),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        last_trade_timestamp: safe_integer(data, "fillTime").or_else(|| safe_integer(data, "uTime")),
        symbol,
        order_type: raw_type.as_deref().and_then(OrderType::parse),
        raw_type,
        time_in_force: None,
        side: safe_string(data, "side").as_deref().and_then(OrderSide::parse),
        // market orders carry an empty px
        price: safe_decimal(data, "px"),
        average: safe_decimal(data, "avgPx").filter(|p| !p.is_zero()),
        amount: safe_decimal(data, "sz"),
        filled: safe_decimal(data, "accFillSz"),
        remaining: None,
        cost: None,
        status: safe_string(data, "state").as_deref().and_then(parse_order_status),
        fee,
        info: data.clone(),
    }
    .complete())
}

/// Parses a `market/books` response.
pub fn parse_order_book(response: &Value, symbol: &str) -> Result<OrderBook> {
    let data = first_item(response)?;
    Ok(parse_book(
        data,
        symbol,
        safe_integer(data, "ts"),
        "bids",
        "asks",
        0,
        1,
    ))
}

/// Parses an `account/balance` response.
pub fn parse_balance(response: &Value) -> Result<Balance> {
    let data = first_item(response)?;
    let mut balance = Balance {
        timestamp: safe_integer(data, "uTime"),
        info: response.clone(),
        ..Balance::default()
    };

    if let Some(details) = data.get("details").and_then(Value::as_array) {
        for detail in details {
            let Some(code) = safe_string(detail, "ccy") else {
                continue;
            };
            let entry = BalanceEntry {
                free: safe_decimal(detail, "availBal"),
                used: safe_decimal(detail, "frozenBal"),
                total: safe_decimal(detail, "eq"),
            };
            balance.set(common_currency_code(&code), entry);
        }
    }
    Ok(balance)
}
