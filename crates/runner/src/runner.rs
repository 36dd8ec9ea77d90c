//! Session orchestration: constructs the book, engine, tape, aggregators,
//! and agent roster for one simulated run, then drives the tick loop.

use crate::agent_factory;
use crate::error::RunnerError;
use agents::{Agent, AgentAction, MarketState, Wallet};
use common::{OrderType, Rng, Side, SimClock};
use config::{NewsMagnitude, NewsScheduleItem, NewsSentiment, SimulationConfig};
use matching_engine::{MatchingEngine, MatchingEvent, PlaceOrderRequest};
use std::collections::VecDeque;
use std::io::Write;
use storage::{OhlcvStore, SessionRecord, SessionStatus, SessionStore, SnapshotStore};
use tape::{AgentThoughtEvent, NewsEvent, TapeError, TapeWriter};

/// Agent id used for the book-seeding resting orders placed at
/// construction. Callers filtering tape/snapshot activity by real
/// participant can exclude this prefix.
pub const SEED_AGENT_ID: &str = "SEED";

/// Seed orders rest five price levels deep on each side of the book.
const SEED_LEVELS: i64 = 5;

/// Resting quantity of each seed order.
const SEED_QUANTITY: u32 = 100;

/// News and trade history kept available to agents is pruned to this
/// trailing window so neither list grows unbounded over a long run.
const TRAILING_WINDOW_MS: i64 = 5000;

struct AgentEntry {
    id: String,
    agent: Box<dyn Agent>,
    wallet: Wallet,
}

/// Outcome reported once a session stops running, whether it reached
/// its configured duration or was aborted.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session_id: String,
    pub status: SessionStatus,
    pub event_count: u64,
    pub trade_count: u64,
    pub final_price: Option<f64>,
}

fn to_tape_sentiment(sentiment: NewsSentiment) -> tape::Sentiment {
    match sentiment {
        NewsSentiment::Positive => tape::Sentiment::Positive,
        NewsSentiment::Neutral => tape::Sentiment::Neutral,
        NewsSentiment::Negative => tape::Sentiment::Negative,
    }
}

fn to_tape_magnitude(magnitude: NewsMagnitude) -> tape::Magnitude {
    match magnitude {
        NewsMagnitude::Low => tape::Magnitude::Low,
        NewsMagnitude::Medium => tape::Magnitude::Medium,
        NewsMagnitude::High => tape::Magnitude::High,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "agent panicked with a non-string payload".to_string()
    }
}

fn seed_level<W: Write>(
    engine: &mut MatchingEngine,
    tape: &mut TapeWriter<W>,
    event_count: &mut u64,
    side: Side,
    price: f64,
) -> Result<(), TapeError> {
    let req = PlaceOrderRequest {
        agent_id: SEED_AGENT_ID.to_string(),
        side,
        order_type: OrderType::Limit,
        price: Some(price),
        quantity: SEED_QUANTITY,
    };
    let mut events = Vec::new();
    engine
        .place_order(req, 0, |e| events.push(e))
        .expect("seed orders always carry a positive price and quantity");
    for event in events {
        if let MatchingEvent::OrderPlaced(order) = event {
            tape.write_order_placed(order, 0)?;
            *event_count += 1;
        }
    }
    Ok(())
}

/// Owns every piece of mutable state for one simulated session: the
/// book, the tape, the aggregators, and the agent roster, plus
/// whichever external stores the caller attached.
pub struct Runner<W: Write> {
    config: SimulationConfig,
    session: SessionRecord,
    effective_initial_price: f64,
    effective_duration_ms: i64,
    clock: SimClock,
    engine: MatchingEngine,
    tape: Option<TapeWriter<W>>,
    ohlcv: market_data::OhlcvBuilder,
    agents: Vec<AgentEntry>,
    news_queue: VecDeque<NewsScheduleItem>,
    /// Monotonic counter backing `NewsEvent::id`, assigned in release
    /// order so ids stay stable across identical-seed runs regardless
    /// of headline text.
    news_sequence: u64,
    recent_news: VecDeque<NewsEvent>,
    recent_trades: VecDeque<matching_engine::Trade>,
    last_snapshot_time: i64,
    event_count: u64,
    trade_count: u64,
    snapshot_store: Option<Box<dyn SnapshotStore>>,
    ohlcv_store: Option<Box<dyn OhlcvStore>>,
    session_store: Option<Box<dyn SessionStore>>,
}

impl<W: Write> Runner<W> {
    /// Construct a session from `config`, writing to `tape_sink`. Fails
    /// only on configuration or agent-construction errors — never on
    /// tape I/O, except while seeding the initial book and snapshot.
    pub fn new(
        config: SimulationConfig,
        session_id: impl Into<String>,
        name: impl Into<String>,
        created_at_ms: i64,
        tape_sink: W,
    ) -> Result<Self, RunnerError> {
        Self::build(config, session_id, name, created_at_ms, tape_sink, |_, _, _, _, _| {})
    }

    /// Like [`Runner::new`], but reports `(id, event_type, timestamp,
    /// sequence, offset)` for every tape record through `indexer`.
    pub fn with_indexer(
        config: SimulationConfig,
        session_id: impl Into<String>,
        name: impl Into<String>,
        created_at_ms: i64,
        tape_sink: W,
        indexer: impl FnMut(&str, &str, i64, u64, u64) + 'static,
    ) -> Result<Self, RunnerError> {
        Self::build(config, session_id, name, created_at_ms, tape_sink, indexer)
    }

    fn build(
        config: SimulationConfig,
        session_id: impl Into<String>,
        name: impl Into<String>,
        created_at_ms: i64,
        tape_sink: W,
        indexer: impl FnMut(&str, &str, i64, u64, u64) + 'static,
    ) -> Result<Self, RunnerError> {
        let report = config::validate_config(&config);
        if !report.is_valid() {
            return Err(RunnerError::InvalidConfig(report.errors));
        }

        let session_id = session_id.into();

        let (effective_initial_price, effective_duration_ms, mut news_items) = match &config.storyline {
            Some(storyline) => (
                storyline.initial_price,
                storyline.duration_ms,
                storyline.news_schedule.clone(),
            ),
            None => (config.initial_price, config.duration_ms, config.news_schedule.clone()),
        };
        news_items.sort_by_key(|item| item.timestamp_ms);

        let mut master_rng = Rng::new(config.seed);
        let mut agents = Vec::with_capacity(config.agents.len());
        for agent_config in &config.agents {
            // Every archetype consumes exactly one derived child, even
            // the ones that never touch it, so adding or removing an
            // RNG-free archetype never shifts later agents' streams.
            let child = master_rng.derive_child();
            let agent = agent_factory::build_agent(agent_config, child)?;
            agents.push(AgentEntry {
                id: agent_config.id.clone(),
                agent,
                wallet: Wallet::default(),
            });
        }

        let session = SessionRecord::new(session_id.clone(), name, config.clone(), created_at_ms);

        let mut engine = MatchingEngine::new(config.tick_size);
        let mut tape = TapeWriter::with_indexer(tape_sink, session_id.clone(), indexer);
        let mut event_count = 0u64;

        for i in 1..=SEED_LEVELS {
            let offset = i as f64 * config.tick_size;
            seed_level(&mut engine, &mut tape, &mut event_count, Side::Buy, effective_initial_price - offset)?;
            seed_level(&mut engine, &mut tape, &mut event_count, Side::Sell, effective_initial_price + offset)?;
        }

        let snapshot = market_data::build_snapshot(&engine, &session_id, 0, config.snapshot_depth);
        tape.write_snapshot(snapshot, 0)?;
        event_count += 1;

        Ok(Self {
            ohlcv: market_data::OhlcvBuilder::new(config.ohlcv_resolution_ms),
            config,
            session,
            effective_initial_price,
            effective_duration_ms,
            clock: SimClock::new(),
            engine,
            tape: Some(tape),
            agents,
            news_queue: news_items.into(),
            news_sequence: 0,
            recent_news: VecDeque::new(),
            recent_trades: VecDeque::new(),
            last_snapshot_time: 0,
            event_count,
            trade_count: 0,
            snapshot_store: None,
            ohlcv_store: None,
            session_store: None,
        })
    }

    pub fn with_snapshot_store(mut self, store: Box<dyn SnapshotStore>) -> Self {
        self.snapshot_store = Some(store);
        self
    }

    pub fn with_ohlcv_store(mut self, store: Box<dyn OhlcvStore>) -> Self {
        self.ohlcv_store = Some(store);
        self
    }

    pub fn with_session_store(mut self, store: Box<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    pub fn effective_initial_price(&self) -> f64 {
        self.effective_initial_price
    }

    fn tape_mut(&mut self) -> &mut TapeWriter<W> {
        self.tape.as_mut().expect("tape present until close")
    }

    /// Run every tick until `duration_ms` is reached, never checking
    /// for cancellation.
    pub fn run_to_completion(self) -> SessionSummary {
        self.run_with_cancellation(|| false)
    }

    /// Run the tick loop, checking `should_cancel` at each tick
    /// boundary. A cancelled session still flushes its final snapshot
    /// and OHLCV bar and closes the tape, but is marked `error` rather
    /// than `completed`.
    pub fn run_with_cancellation(mut self, should_cancel: impl Fn() -> bool) -> SessionSummary {
        self.session.status = SessionStatus::Running;
        if let Some(store) = self.session_store.as_mut() {
            let _ = store.upsert(self.session.clone());
        }

        let mut failed = false;
        while self.clock.now() < self.effective_duration_ms {
            if should_cancel() {
                tracing::warn!(session_id = %self.session.session_id, "session cancelled at tick boundary");
                failed = true;
                break;
            }
            let now = self.clock.now();
            if let Err(err) = self.tick(now) {
                tracing::error!(session_id = %self.session.session_id, error = %err, "tape I/O failure; aborting session");
                failed = true;
                break;
            }
            self.clock.advance(self.config.tick_interval_ms);
        }

        self.finish(failed)
    }

    fn tick(&mut self, now: i64) -> Result<(), TapeError> {
        self.drain_news(now)?;

        for i in 0..self.agents.len() {
            self.tick_agent(i, now)?;
        }

        if now - self.last_snapshot_time >= self.config.snapshot_interval_ms {
            self.write_snapshot(now)?;
        }

        self.prune_trailing_windows(now);
        Ok(())
    }

    fn tick_agent(&mut self, index: usize, now: i64) -> Result<(), TapeError> {
        let id = self.agents[index].id.clone();
        let (position, cash) = {
            let wallet = self.agents[index].wallet;
            (wallet.position, wallet.cash)
        };
        let open_orders = self.engine.book().orders_for_agent(&id);
        let recent_news: Vec<NewsEvent> = self.recent_news.iter().cloned().collect();

        let book = self.engine.book();
        let state = MarketState {
            timestamp: now,
            mid_price: book.mid_price(),
            spread: book.spread(),
            best_bid: book.best_bid(),
            best_ask: book.best_ask(),
            last_trade_price: book.last_trade_price,
            last_trade_quantity: book.last_trade_quantity,
            recent_news: &recent_news,
            position,
            cash,
            open_orders: &open_orders,
        };

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.agents[index].agent.tick(now, &state)
        }));

        match outcome {
            Ok(actions) => {
                for action in actions {
                    self.execute_action(index, action, now)?;
                }
                Ok(())
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                tracing::warn!(agent_id = %id, error = %message, "agent tick panicked; discarding this tick's actions");
                self.write_thought(id, message, now, true)
            }
        }
    }

    fn execute_action(&mut self, index: usize, action: AgentAction, now: i64) -> Result<(), TapeError> {
        let agent_id = self.agents[index].id.clone();
        match action {
            AgentAction::PlaceOrder {
                side,
                order_type,
                price,
                quantity,
                thought,
            } => {
                let req = PlaceOrderRequest {
                    agent_id: agent_id.clone(),
                    side,
                    order_type,
                    price,
                    quantity,
                };
                let mut events = Vec::new();
                match self.engine.place_order(req, now, |e| events.push(e)) {
                    Ok(_) => self.handle_matching_events(events, now)?,
                    Err(err) => {
                        tracing::warn!(agent_id = %agent_id, error = %err, "order rejected at placement");
                    }
                }
                if let Some(text) = thought {
                    self.write_thought(agent_id, text, now, false)?;
                }
            }
            AgentAction::CancelOrder { order_id, thought } => {
                let mut events = Vec::new();
                self.engine.cancel_order(order_id, |e| events.push(e));
                self.handle_matching_events(events, now)?;
                if let Some(text) = thought {
                    self.write_thought(agent_id, text, now, false)?;
                }
            }
        }
        Ok(())
    }

    fn handle_matching_events(&mut self, events: Vec<MatchingEvent>, now: i64) -> Result<(), TapeError> {
        for event in events {
            match event {
                MatchingEvent::OrderPlaced(order) => {
                    self.tape_mut().write_order_placed(order, now)?;
                    self.event_count += 1;
                }
                MatchingEvent::OrderCancelled(order) => {
                    self.tape_mut().write_order_cancelled(order, now)?;
                    self.event_count += 1;
                }
                MatchingEvent::Trade(trade) => {
                    self.tape_mut().write_trade(trade.clone(), now)?;
                    self.event_count += 1;
                    self.trade_count += 1;

                    if let Some(flushed) = self.ohlcv.add_trade(now, trade.price, trade.quantity) {
                        if let Some(store) = self.ohlcv_store.as_mut() {
                            let _ = store.upsert(&self.session.session_id, flushed);
                        }
                    }

                    self.recent_trades.push_back(trade.clone());
                    for entry in self.agents.iter_mut() {
                        entry.wallet.apply_trade(&entry.id, &trade);
                        entry.agent.on_trade(&trade);
                    }
                }
            }
        }
        Ok(())
    }

    fn write_thought(&mut self, agent_id: String, thought: String, now: i64, is_error: bool) -> Result<(), TapeError> {
        let event = AgentThoughtEvent {
            agent_id,
            thought,
            timestamp: now,
            is_error,
        };
        self.tape_mut().write_agent_thought(event, now)?;
        self.event_count += 1;
        Ok(())
    }

    fn drain_news(&mut self, now: i64) -> Result<(), TapeError> {
        while matches!(self.news_queue.front(), Some(item) if item.timestamp_ms <= now) {
            let item = self.news_queue.pop_front().expect("checked by the loop condition");
            self.news_sequence += 1;
            let news = NewsEvent {
                id: format!("NEWS-{:04}", self.news_sequence),
                timestamp: item.timestamp_ms,
                headline: item.headline,
                content: item.content,
                sentiment: to_tape_sentiment(item.sentiment),
                magnitude: to_tape_magnitude(item.magnitude),
                source: item.source,
            };
            self.tape_mut().write_news(news.redact(), now)?;
            self.event_count += 1;
            self.recent_news.push_back(news);
        }
        Ok(())
    }

    fn write_snapshot(&mut self, now: i64) -> Result<(), TapeError> {
        let snapshot = market_data::build_snapshot(&self.engine, &self.session.session_id, now, self.config.snapshot_depth);
        if let Some(store) = self.snapshot_store.as_mut() {
            let _ = store.insert(&self.session.session_id, snapshot.clone());
        }
        self.tape_mut().write_snapshot(snapshot, now)?;
        self.event_count += 1;
        self.last_snapshot_time = now;
        Ok(())
    }

    fn prune_trailing_windows(&mut self, now: i64) {
        let cutoff = now - TRAILING_WINDOW_MS;
        while matches!(self.recent_news.front(), Some(n) if n.timestamp < cutoff) {
            self.recent_news.pop_front();
        }
        while matches!(self.recent_trades.front(), Some(t) if t.timestamp < cutoff) {
            self.recent_trades.pop_front();
        }
    }

    fn finish(mut self, mut failed: bool) -> SessionSummary {
        if !failed {
            let now = self.clock.now();
            if let Err(err) = self.write_snapshot(now) {
                tracing::error!(session_id = %self.session.session_id, error = %err, "final snapshot failed");
                failed = true;
            }
        }

        if let Some(bar) = self.ohlcv.close() {
            if let Some(store) = self.ohlcv_store.as_mut() {
                let _ = store.upsert(&self.session.session_id, bar);
            }
        }

        let final_price = self.engine.book().last_trade_price;
        self.session.status = if failed { SessionStatus::Error } else { SessionStatus::Completed };
        self.session.event_count = self.event_count;
        self.session.trade_count = self.trade_count;
        self.session.final_price = final_price;
        self.session.completed_at_ms = Some(self.clock.now());

        if let Some(tape) = self.tape.take() {
            if let Err(err) = tape.close() {
                tracing::error!(session_id = %self.session.session_id, error = %err, "tape close failed");
                self.session.status = SessionStatus::Error;
            }
        }

        if let Some(store) = self.session_store.as_mut() {
            let _ = store.upsert(self.session.clone());
        }

        SessionSummary {
            session_id: self.session.session_id.clone(),
            status: self.session.status,
            event_count: self.session.event_count,
            trade_count: self.session.trade_count,
            final_price: self.session.final_price,
        }
    }
}
