//! Core matching engine: a thin, sink-notifying wrapper around
//! [`OrderBook`] implementing the deterministic price-time priority
//! matching algorithm.
//!
//! CRITICAL PROPERTIES:
//! 1. Deterministic (same inputs -> same outputs, always).
//! 2. Single-threaded; the sink is invoked synchronously, in place.
//! 3. Price-time priority, strictly enforced.

use crate::domain::{Order, OrderBook, OrderBookSnapshot, Trade};
use crate::error::MatchingError;
use crate::event::MatchingEvent;
use crate::result::{CancelResult, MatchResult};
use common::{OrderId, OrderStatus, OrderType, Side, TradeId};
use tracing::{debug, info};

/// Request to place a new order; carries everything the book needs to
/// construct a resident `Order` but none of the bookkeeping (id,
/// sequence, status) the engine assigns itself.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub agent_id: String,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Option<f64>,
    pub quantity: u32,
}

/// Matching engine for the session's single instrument.
pub struct MatchingEngine {
    book: OrderBook,
    sequence: u64,
    trade_sequence: u64,
}

impl MatchingEngine {
    pub fn new(tick_size: f64) -> Self {
        Self {
            book: OrderBook::new(tick_size),
            sequence: 0,
            trade_sequence: 0,
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Monotonic counter backing `TradeId`, separate from the order
    /// sequence so a placement that produces several fills assigns
    /// consecutive trade ids without consuming order sequence numbers.
    fn next_trade_sequence(&mut self) -> u64 {
        self.trade_sequence += 1;
        self.trade_sequence
    }

    fn validate(req: &PlaceOrderRequest) -> Result<(), MatchingError> {
        if req.quantity == 0 {
            return Err(MatchingError::NonPositiveQuantity(req.quantity));
        }
        match req.order_type {
            OrderType::Limit => {
                let price = req.price.unwrap_or(0.0);
                if price <= 0.0 {
                    return Err(MatchingError::NonPositivePrice(price));
                }
            }
            OrderType::Market => {
                if req.price.is_some() {
                    return Err(MatchingError::MarketOrderWithPrice);
                }
            }
        }
        Ok(())
    }

    /// Place an order, push `OrderPlaced` followed by zero or more
    /// `Trade` events through `sink`, and return the resulting order
    /// plus the trades it produced.
    pub fn place_order(
        &mut self,
        req: PlaceOrderRequest,
        timestamp: i64,
        mut sink: impl FnMut(MatchingEvent),
    ) -> Result<MatchResult, MatchingError> {
        Self::validate(&req)?;

        let price = req
            .price
            .map(|p| self.book.round_to_tick(p));

        let sequence = self.next_sequence();
        let mut order = Order {
            id: OrderId::new(sequence),
            agent_id: req.agent_id,
            side: req.side,
            order_type: req.order_type,
            price,
            quantity: req.quantity,
            filled_quantity: 0,
            status: OrderStatus::Open,
            timestamp,
            sequence,
        };

        info!(
            order_id = %order.id,
            agent_id = %order.agent_id,
            side = ?order.side,
            order_type = ?order.order_type,
            price = ?order.price,
            quantity = order.quantity,
            "placing order"
        );

        sink(MatchingEvent::OrderPlaced(order.clone()));

        let trades = match order.side {
            Side::Buy => self.match_buy(&mut order, timestamp),
            Side::Sell => self.match_sell(&mut order, timestamp),
        };

        for trade in &trades {
            debug!(
                trade_id = %trade.id,
                price = trade.price,
                quantity = trade.quantity,
                "trade executed"
            );
            sink(MatchingEvent::Trade(trade.clone()));
        }

        if !order.is_filled() && order.order_type == OrderType::Limit {
            let price = order.price.expect("limit order carries a price");
            self.book.add_to_index(order.id, price);
            self.book.insert_resident(order.clone());
        }

        Ok(MatchResult { order, trades })
    }

    fn match_buy(&mut self, order: &mut Order, timestamp: i64) -> Vec<Trade> {
        let mut trades = Vec::new();
        loop {
            if order.remaining() == 0 {
                break;
            }
            let Some((ask_price, _)) = self.book.best_ask_level_mut() else {
                break;
            };
            if order.order_type == OrderType::Limit {
                let limit = order.price.expect("limit order carries a price");
                if ask_price > limit {
                    break;
                }
            }

            let (resting_id, resting_agent, trade_qty, resting_remaining_after) = {
                let (_, level) = self.book.best_ask_level_mut().expect("checked above");
                let resting = level.orders.front_mut().expect("non-empty level");
                let trade_qty = order.remaining().min(resting.remaining());
                resting.apply_fill(trade_qty);
                level.total_quantity -= trade_qty;
                let remaining_after = resting.remaining();
                let exhausted = resting.is_filled();
                let id = resting.id;
                let agent = resting.agent_id.clone();
                if exhausted {
                    level.orders.pop_front();
                }
                (id, agent, trade_qty, remaining_after)
            };

            order.apply_fill(trade_qty);
            self.book.last_trade_price = Some(ask_price);
            self.book.last_trade_quantity = Some(trade_qty);

            if resting_remaining_after == 0 {
                self.book.drop_from_index(resting_id);
            }

            trades.push(Trade {
                id: TradeId::new(self.next_trade_sequence()),
                buy_order_id: order.id,
                sell_order_id: resting_id,
                buy_agent_id: order.agent_id.clone(),
                sell_agent_id: resting_agent,
                price: ask_price,
                quantity: trade_qty,
                maker_side: Side::Sell,
                timestamp,
            });

            self.book.cleanup_level(Side::Sell, ask_price);
        }
        trades
    }

    fn match_sell(&mut self, order: &mut Order, timestamp: i64) -> Vec<Trade> {
        let mut trades = Vec::new();
        loop {
            if order.remaining() == 0 {
                break;
            }
            let Some((bid_price, _)) = self.book.best_bid_level_mut() else {
                break;
            };
            if order.order_type == OrderType::Limit {
                let limit = order.price.expect("limit order carries a price");
                if bid_price < limit {
                    break;
                }
            }

            let (resting_id, resting_agent, trade_qty, resting_remaining_after) = {
                let (_, level) = self.book.best_bid_level_mut().expect("checked above");
                let resting = level.orders.front_mut().expect("non-empty level");
                let trade_qty = order.remaining().min(resting.remaining());
                resting.apply_fill(trade_qty);
                level.total_quantity -= trade_qty;
                let remaining_after = resting.remaining();
                let exhausted = resting.is_filled();
                let id = resting.id;
                let agent = resting.agent_id.clone();
                if exhausted {
                    level.orders.pop_front();
                }
                (id, agent, trade_qty, remaining_after)
            };

            order.apply_fill(trade_qty);
            self.book.last_trade_price = Some(bid_price);
            self.book.last_trade_quantity = Some(trade_qty);

            if resting_remaining_after == 0 {
                self.book.drop_from_index(resting_id);
            }

            trades.push(Trade {
                id: TradeId::new(self.next_trade_sequence()),
                buy_order_id: resting_id,
                sell_order_id: order.id,
                buy_agent_id: resting_agent,
                sell_agent_id: order.agent_id.clone(),
                price: bid_price,
                quantity: trade_qty,
                maker_side: Side::Buy,
                timestamp,
            });

            self.book.cleanup_level(Side::Buy, bid_price);
        }
        trades
    }

    /// Cancel a resident order, pushing `OrderCancelled` on success.
    pub fn cancel_order(&mut self, id: OrderId, mut sink: impl FnMut(MatchingEvent)) -> CancelResult {
        let cancelled = self.book.cancel_order(id);
        if let Some(order) = &cancelled {
            sink(MatchingEvent::OrderCancelled(order.clone()));
        }
        cancelled
    }

    /// Take a depth-limited snapshot of the book.
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        self.book.snapshot(depth)
    }
}
