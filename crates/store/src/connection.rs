//! Shared connection lifecycle for the Redis-backed store.
//!
//! One connection handle is shared by every store operation. It is created
//! lazily on first use, replaced wholesale on reconnect (never mutated in
//! place), and guarded by a lock taken only during the (re)connect
//! transition - steady-state traffic pays a single atomic load.
//!
//! The [`ConnectionManager`] is generic over a [`Dial`] capability so tests
//! can substitute a fake connection provider and a zero-delay retry schedule.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Key written and read back by the post-connect smoke test.
const SMOKE_TEST_KEY: &str = "cart";

/// Bounded retry schedule for (re)connection attempts.
///
/// Delays grow exponentially from `base_delay`, doubling per attempt up to
/// [`RetryPolicy::MAX_DELAY`]. The schedule applies only while establishing a
/// connection; steady-state operations carry no extra timeout.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Number of connection attempts before giving up. At least 1 attempt is
    /// always made.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Upper bound on the backoff delay between attempts.
    pub const MAX_DELAY: Duration = Duration::from_secs(30);

    /// Create a retry policy.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff delay after the given 1-based failed attempt.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // Shift capped well below u32 width; MAX_DELAY caps the result anyway.
        let factor = 1_u32 << attempt.saturating_sub(1).min(15);
        (self.base_delay * factor).min(Self::MAX_DELAY)
    }

    /// Zero-delay variant of this policy, for tests.
    #[must_use]
    pub const fn without_delay(self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            base_delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    /// 30 attempts with a 1 second base delay, the schedule the cart service
    /// has always shipped with.
    fn default() -> Self {
        Self::new(30, Duration::from_secs(1))
    }
}

/// Capability to establish one connection to the backing store.
///
/// Implementations perform the full establishment including any smoke test;
/// a connection returned from [`Dial::dial`] is ready for traffic.
#[async_trait]
pub trait Dial: Send + Sync + 'static {
    /// The connection handle produced. Cloning must be cheap: every store
    /// operation clones the shared handle for its own use.
    type Conn: Clone + Send + Sync + 'static;

    /// Establish a single connection. One call per retry attempt.
    async fn dial(&self) -> Result<Self::Conn, StoreError>;
}

/// Owns the process-wide shared connection handle.
///
/// State machine: `Uninitialized -> Connecting -> Connected -> Failed ->
/// Connecting -> ...`. `Connecting` happens under an exclusive lock so that
/// exactly one caller performs the work per failure episode; everyone else
/// either sees the already-connected state or blocks briefly and observes the
/// winner's result.
pub struct ConnectionManager<D: Dial> {
    dialer: D,
    retry: RetryPolicy,
    /// The shared handle. Replaced as a whole on reconnect, never edited.
    conn: ArcSwapOption<D::Conn>,
    /// Fast-path liveness flag. False from construction and from
    /// [`ConnectionManager::mark_failed`] until a (re)dial succeeds.
    live: AtomicBool,
    /// Distinguishes the first successful connect from a restore.
    ever_connected: AtomicBool,
    /// Guards the (re)connect transition only, never steady-state traffic.
    connect_lock: Mutex<()>,
}

impl<D: Dial> ConnectionManager<D> {
    /// Create a manager in the uninitialized state. No connection is made
    /// until [`ConnectionManager::ensure_connected`] is first called.
    pub fn new(dialer: D, retry: RetryPolicy) -> Self {
        Self {
            dialer,
            retry,
            conn: ArcSwapOption::empty(),
            live: AtomicBool::new(false),
            ever_connected: AtomicBool::new(false),
            connect_lock: Mutex::new(()),
        }
    }

    /// Return a live connection handle, establishing one if necessary.
    ///
    /// The common path is a single unsynchronized liveness check. Otherwise
    /// the caller contends on the connect lock, re-checks liveness (a winner
    /// may have reconnected while we blocked), and if still down performs the
    /// bounded-retry dial itself.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionUnavailable`] once the whole retry
    /// schedule is exhausted. The error propagates to every caller blocked on
    /// the same failure episode.
    pub async fn ensure_connected(&self) -> Result<D::Conn, StoreError> {
        if self.live.load(Ordering::Acquire) {
            if let Some(conn) = self.conn.load_full() {
                return Ok((*conn).clone());
            }
        }

        let _guard = self.connect_lock.lock().await;

        // Double-checked: the previous lock holder may have already
        // reconnected while we were blocked.
        if self.live.load(Ordering::Acquire) {
            if let Some(conn) = self.conn.load_full() {
                return Ok((*conn).clone());
            }
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.dialer.dial().await {
                Ok(conn) => {
                    self.conn.store(Some(Arc::new(conn.clone())));
                    self.live.store(true, Ordering::Release);
                    if self.ever_connected.swap(true, Ordering::AcqRel) {
                        tracing::info!(attempt, "connection to the backing store restored");
                    } else {
                        tracing::info!(attempt, "connected to the backing store");
                    }
                    return Ok(conn);
                }
                Err(err) if attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        error = %err,
                        delay = ?delay,
                        "connection attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(
                        attempts = attempt,
                        error = %err,
                        "giving up on connecting to the backing store"
                    );
                    return Err(StoreError::ConnectionUnavailable {
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
            }
        }
    }

    /// Record a connection-level failure.
    ///
    /// Flips the liveness flag so the next operation reconnects. Lock-free:
    /// the reporting operation is never blocked by this call.
    pub fn mark_failed(&self) {
        if self.live.swap(false, Ordering::AcqRel) {
            tracing::warn!("connection to the backing store lost");
        }
    }

    /// The current handle, if any, without connecting.
    ///
    /// Used by best-effort probes that must not trigger a reconnect.
    #[must_use]
    pub fn current(&self) -> Option<D::Conn> {
        self.conn.load_full().map(|conn| (*conn).clone())
    }

    /// Liveness as last observed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Production dialer: opens a Redis multiplexed connection and smoke-tests it.
pub struct RedisDialer {
    client: redis::Client,
}

impl RedisDialer {
    /// Create a dialer for the given address (`host:port`, or a full
    /// `redis://` URL).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the address cannot be parsed.
    pub fn new(addr: &str) -> Result<Self, StoreError> {
        let url = if addr.contains("://") {
            addr.to_owned()
        } else {
            format!("redis://{addr}")
        };
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Dial for RedisDialer {
    type Conn = MultiplexedConnection;

    async fn dial(&self) -> Result<MultiplexedConnection, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // Smoke test: a connection that opens but cannot serve a write and a
        // read back is not declared live.
        let _: () = conn.set(SMOKE_TEST_KEY, "OK").await?;
        let echo: String = conn.get(SMOKE_TEST_KEY).await?;
        if echo != "OK" {
            return Err(StoreError::Unavailable(
                format!("smoke test read back {echo:?} instead of \"OK\"").into(),
            ));
        }

        tracing::debug!("smoke test passed");
        Ok(conn)
    }
}
