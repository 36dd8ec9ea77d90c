//! Domain types for the matching engine: orders, price levels, the book,
//! and trades. The book holds exactly one instrument for the life of a
//! session, so unlike a multi-instrument venue there is no
//! instrument-keyed map of books here — the `OrderBook` itself *is* the
//! session's book.

use common::{OrderId, OrderStatus, OrderType, Side, TradeId};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// A resident or incoming order.
///
/// Invariant: `0 <= filled_quantity <= quantity`. `status` is a
/// monotonic function of the filled/cancelled state: `open` until the
/// first partial fill, `partial` while `0 < filled_quantity <
/// quantity`, `filled` once they're equal, `cancelled` once cancelled
/// (which freezes `filled_quantity`). Market orders are never resident
/// in a `PriceLevel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub agent_id: String,
    pub side: Side,
    pub order_type: OrderType,
    /// `None` for market orders.
    pub price: Option<f64>,
    pub quantity: u32,
    pub filled_quantity: u32,
    pub status: OrderStatus,
    pub timestamp: i64,
    /// Assigned when the order is placed; determines FIFO priority
    /// within its price level.
    pub sequence: u64,
}

impl Order {
    pub fn remaining(&self) -> u32 {
        self.quantity - self.filled_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.filled_quantity >= self.quantity
    }

    /// Apply a fill of `qty`, updating `status` accordingly. Does not
    /// enforce `qty <= remaining`; callers (the matching loop) never
    /// offer more than `remaining`.
    pub fn apply_fill(&mut self, qty: u32) {
        self.filled_quantity += qty;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else if self.filled_quantity > 0 {
            OrderStatus::Partial
        } else {
            OrderStatus::Open
        };
    }

    pub fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
    }
}

/// One price level: a FIFO queue of resident orders plus the running
/// aggregate quantity and count the level can report in O(1).
///
/// Invariant: `total_quantity == sum(order.remaining() for order in
/// orders)`. The level is removed from the book once `total_quantity`
/// reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PriceLevel {
    pub orders: VecDeque<Order>,
    pub total_quantity: u32,
}

impl PriceLevel {
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    fn push(&mut self, order: Order) {
        self.total_quantity += order.remaining();
        self.orders.push_back(order);
    }

    fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// The book for the session's single instrument.
///
/// Bids are keyed by `Reverse(price)` so iteration is highest-first;
/// asks are keyed by plain price so iteration is lowest-first. Both
/// use `BTreeMap` rather than a hash map so traversal order is
/// deterministic and reproducible across platforms, per the ordering
/// guarantees the tape relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    pub tick_size: f64,
    bids: BTreeMap<std::cmp::Reverse<OrderedFloat<f64>>, PriceLevel>,
    asks: BTreeMap<OrderedFloat<f64>, PriceLevel>,
    /// `OrderId -> price`, so cancellation doesn't have to scan every
    /// level to find the order's home.
    index: HashMap<OrderId, f64>,
    pub last_trade_price: Option<f64>,
    pub last_trade_quantity: Option<u32>,
}

impl OrderBook {
    pub fn new(tick_size: f64) -> Self {
        Self {
            tick_size,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
            last_trade_price: None,
            last_trade_quantity: None,
        }
    }

    /// Round `price` to the nearest multiple of `tick_size`.
    pub fn round_to_tick(&self, price: f64) -> f64 {
        if self.tick_size <= 0.0 {
            return price;
        }
        (price / self.tick_size).round() * self.tick_size
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.keys().next().map(|k| k.0 .0)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.keys().next().map(|k| k.0)
    }

    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// All resident orders belonging to `agent_id`, across both sides.
    /// Used by the Runner to build each agent's `open_orders` view
    /// without agents needing to track their own resting orders.
    pub fn orders_for_agent(&self, agent_id: &str) -> Vec<Order> {
        self.bids
            .values()
            .chain(self.asks.values())
            .flat_map(|level| level.orders.iter())
            .filter(|o| o.agent_id == agent_id)
            .cloned()
            .collect()
    }

    pub(crate) fn insert_resident(&mut self, order: Order) {
        debug_assert!(order.order_type == OrderType::Limit);
        let price = order.price.expect("limit order must carry a price");
        self.index.insert(order.id, price);
        match order.side {
            Side::Buy => self
                .bids
                .entry(std::cmp::Reverse(OrderedFloat(price)))
                .or_default()
                .push(order),
            Side::Sell => self.asks.entry(OrderedFloat(price)).or_default().push(order),
        }
    }

    pub(crate) fn best_ask_level_mut(&mut self) -> Option<(f64, &mut PriceLevel)> {
        let price = self.best_ask()?;
        self.asks.get_mut(&OrderedFloat(price)).map(|lvl| (price, lvl))
    }

    pub(crate) fn best_bid_level_mut(&mut self) -> Option<(f64, &mut PriceLevel)> {
        let price = self.best_bid()?;
        self.bids
            .get_mut(&std::cmp::Reverse(OrderedFloat(price)))
            .map(|lvl| (price, lvl))
    }

    pub(crate) fn drop_from_index(&mut self, id: OrderId) {
        self.index.remove(&id);
    }

    pub(crate) fn add_to_index(&mut self, id: OrderId, price: f64) {
        self.index.insert(id, price);
    }

    pub(crate) fn cleanup_level(&mut self, side: Side, price: f64) {
        match side {
            Side::Buy => {
                let key = std::cmp::Reverse(OrderedFloat(price));
                if matches!(self.bids.get(&key), Some(l) if l.is_empty()) {
                    self.bids.remove(&key);
                }
            }
            Side::Sell => {
                let key = OrderedFloat(price);
                if matches!(self.asks.get(&key), Some(l) if l.is_empty()) {
                    self.asks.remove(&key);
                }
            }
        }
    }

    /// Cancel a resident order. Returns `None` if it is absent, already
    /// filled, or already cancelled. Collapses the level if it empties.
    pub fn cancel_order(&mut self, id: OrderId) -> Option<Order> {
        let price = *self.index.get(&id)?;
        let (side, queue) = if self.bids.contains_key(&std::cmp::Reverse(OrderedFloat(price))) {
            (
                Side::Buy,
                self.bids.get_mut(&std::cmp::Reverse(OrderedFloat(price))),
            )
        } else {
            (Side::Sell, self.asks.get_mut(&OrderedFloat(price)))
        };
        let level = queue?;
        let pos = level.orders.iter().position(|o| o.id == id)?;
        let mut order = level.orders.remove(pos)?;
        level.total_quantity -= order.remaining();
        let empty = level.is_empty();
        self.index.remove(&id);
        if empty {
            self.cleanup_level(side, price);
        }
        order.cancel();
        Some(order)
    }

    /// Top-`depth` levels per side, best price first, plus the last
    /// observed trade.
    pub fn snapshot(&self, depth: usize) -> OrderBookSnapshot {
        let bids = self
            .bids
            .iter()
            .take(depth)
            .map(|(price, level)| BookLevel {
                price: price.0 .0,
                quantity: level.total_quantity,
                order_count: level.order_count(),
            })
            .collect();
        let asks = self
            .asks
            .iter()
            .take(depth)
            .map(|(price, level)| BookLevel {
                price: price.0,
                quantity: level.total_quantity,
                order_count: level.order_count(),
            })
            .collect();
        OrderBookSnapshot {
            bids,
            asks,
            last_trade_price: self.last_trade_price,
            last_trade_quantity: self.last_trade_quantity,
        }
    }
}

/// A single price row within a book snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub quantity: u32,
    pub order_count: usize,
}

/// A depth-limited view of the book at one point in simulated time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub last_trade_price: Option<f64>,
    pub last_trade_quantity: Option<u32>,
}

/// A matched execution between two orders. Always prints at the
/// resting (maker) order's price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buy_agent_id: String,
    pub sell_agent_id: String,
    pub price: f64,
    pub quantity: u32,
    pub maker_side: Side,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order(side: Side, price: f64, qty: u32, seq: u64) -> Order {
        Order {
            id: OrderId::new(seq),
            agent_id: "A".into(),
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity: qty,
            filled_quantity: 0,
            status: OrderStatus::Open,
            timestamp: 0,
            sequence: seq,
        }
    }

    #[test]
    fn insert_and_query_best_prices() {
        let mut book = OrderBook::new(1.0);
        book.insert_resident(make_order(Side::Buy, 95.0, 10, 1));
        book.insert_resident(make_order(Side::Sell, 105.0, 10, 2));
        assert_eq!(book.best_bid(), Some(95.0));
        assert_eq!(book.best_ask(), Some(105.0));
        assert_eq!(book.spread(), Some(10.0));
        assert_eq!(book.mid_price(), Some(100.0));
    }

    #[test]
    fn cancel_removes_order_and_collapses_level() {
        let mut book = OrderBook::new(1.0);
        let order = make_order(Side::Buy, 95.0, 10, 1);
        let id = order.id;
        book.insert_resident(order);
        let cancelled = book.cancel_order(id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(book.is_empty());
        assert!(book.cancel_order(id).is_none());
    }

    #[test]
    fn tick_rounding() {
        let book = OrderBook::new(0.5);
        assert_eq!(book.round_to_tick(100.26), 100.5);
        assert_eq!(book.round_to_tick(100.24), 100.0);
    }

    #[test]
    fn snapshot_reports_aggregate_quantity_and_count() {
        let mut book = OrderBook::new(1.0);
        book.insert_resident(make_order(Side::Buy, 95.0, 10, 1));
        book.insert_resident(make_order(Side::Buy, 95.0, 5, 2));
        let snap = book.snapshot(10);
        assert_eq!(snap.bids.len(), 1);
        assert_eq!(snap.bids[0].quantity, 15);
        assert_eq!(snap.bids[0].order_count, 2);
    }
}
