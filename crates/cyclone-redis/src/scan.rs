//! HSCAN exposed as a lazy, bounded, cancellable stream.
//!
//! A [`HashScan`] collects the MATCH/COUNT options; [`HashScan::keys`] or
//! [`HashScan::fields`] turn it into a [`ScanStream`]. Nothing is sent until
//! the stream is first polled. At that point a producer task is spawned that
//! walks the cursor page by page and pushes items into a bounded channel, so
//! a slow consumer holds the producer back.
//!
//! The producer stops as soon as the receiving side goes away, whether by
//! [`ScanStream::cancel`] or by dropping the stream, including while it is
//! waiting on a round trip.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use futures::Stream;
use redis::aio::ConnectionLike;
use redis::Cmd;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::{CycloneError, CycloneResult};
use crate::collections::Hash;

/// Cursor value that both starts and ends a scan.
pub const CURSOR_START: u64 = 0;

/// One field of a hash, as yielded by [`HashScan::fields`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashField {
    pub key: String,
    pub value: String,
}

/// Server-side filtering and paging for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Glob applied by the store (MATCH).
    pub pattern: Option<String>,
    /// Page size hint (COUNT). The store may return more or fewer.
    pub count: Option<usize>,
}

impl ScanOptions {
    /// `HSCAN key cursor [MATCH pattern] [COUNT count]`
    fn page_command(&self, key: &str, cursor: u64) -> Cmd {
        let mut cmd = redis::cmd("HSCAN");
        cmd.arg(key).arg(cursor);
        if let Some(pattern) = &self.pattern {
            cmd.arg("MATCH").arg(pattern);
        }
        if let Some(count) = self.count {
            cmd.arg("COUNT").arg(count);
        }
        cmd
    }
}

/// Where a [`ScanStream`] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Built, nothing sent yet.
    Idle,
    /// Producer running.
    Scanning,
    /// Cursor came back to [`CURSOR_START`] and every item was consumed.
    Done,
    /// An error was delivered; no more items follow.
    Failed,
    /// Stopped by [`ScanStream::cancel`].
    Cancelled,
}

/// Builder for an HSCAN iteration over one hash.
#[derive(Debug, Clone)]
pub struct HashScan<'a, C> {
    hash: Hash<'a, C>,
    options: ScanOptions,
}

impl<'a, C> HashScan<'a, C>
where
    C: ConnectionLike + Clone,
{
    pub(crate) fn new(hash: Hash<'a, C>) -> Self {
        Self {
            hash,
            options: ScanOptions::default(),
        }
    }

    /// Only fields matching the glob `pattern`. An empty pattern means no
    /// filter.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.options.pattern = (!pattern.is_empty()).then_some(pattern);
        self
    }

    /// Page size hint; the store defaults to 10. Zero means no hint.
    pub fn count(mut self, count: usize) -> Self {
        self.options.count = (count > 0).then_some(count);
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }
}

impl<'a, C> HashScan<'a, C>
where
    C: ConnectionLike + Clone + Send + 'static,
{
    /// Field names only, one item each, in server order. A page with an odd
    /// number of elements ends the stream with [`CycloneError::Protocol`].
    ///
    /// `buffer` is the channel capacity; 0 asks for the tightest handoff the
    /// channel allows, a single slot.
    pub fn keys(self, buffer: usize) -> ScanStream<String> {
        self.into_stream(buffer, field_names)
    }

    /// Field/value pairs. A page with an odd number of elements ends the
    /// stream with [`CycloneError::Protocol`].
    pub fn fields(self, buffer: usize) -> ScanStream<HashField> {
        self.into_stream(buffer, pair_fields)
    }

    fn into_stream<T>(self, buffer: usize, decode: Decoder<T>) -> ScanStream<T>
    where
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let producer = produce(
            self.hash.pool().clone(),
            self.hash.key().to_string(),
            self.options,
            tx,
            decode,
        )
        .boxed();
        ScanStream {
            state: ScanState::Idle,
            rx,
            producer: Some(producer),
        }
    }
}

type Decoder<T> = fn(Vec<String>) -> CycloneResult<Vec<T>>;

fn check_paired(page: &[String]) -> CycloneResult<()> {
    if page.len() % 2 != 0 {
        return Err(CycloneError::Protocol(format!(
            "HSCAN page has {} elements, expected field/value pairs",
            page.len()
        )));
    }
    Ok(())
}

/// Keep the field of each `field, value` pair.
fn field_names(page: Vec<String>) -> CycloneResult<Vec<String>> {
    check_paired(&page)?;
    Ok(page.into_iter().step_by(2).collect())
}

/// Pair up a flat `field, value, field, value, ...` page.
fn pair_fields(page: Vec<String>) -> CycloneResult<Vec<HashField>> {
    check_paired(&page)?;
    let mut fields = Vec::with_capacity(page.len() / 2);
    let mut elems = page.into_iter();
    while let (Some(key), Some(value)) = (elems.next(), elems.next()) {
        fields.push(HashField { key, value });
    }
    Ok(fields)
}

async fn produce<C, T>(
    mut conn: C,
    key: String,
    options: ScanOptions,
    tx: mpsc::Sender<CycloneResult<T>>,
    decode: Decoder<T>,
) where
    C: ConnectionLike + Send,
{
    debug!(key = %key, pattern = ?options.pattern, count = ?options.count, "Scan started");
    let mut cursor = CURSOR_START;
    let mut pages = 0usize;

    loop {
        let cmd = options.page_command(&key, cursor);
        let reply: redis::RedisResult<(u64, Vec<String>)> = tokio::select! {
            _ = tx.closed() => {
                debug!(key = %key, pages, "Scan cancelled");
                return;
            }
            reply = cmd.query_async(&mut conn) => reply,
        };
        pages += 1;

        let items = match reply.map_err(CycloneError::from).and_then(|(next, page)| {
            cursor = next;
            decode(page)
        }) {
            Ok(items) => items,
            Err(err) => {
                warn!(key = %key, pages, error = %err, "Scan failed");
                let _ = tx.send(Err(err)).await;
                return;
            }
        };

        for item in items {
            if tx.send(Ok(item)).await.is_err() {
                debug!(key = %key, pages, "Scan cancelled");
                return;
            }
        }

        if cursor == CURSOR_START {
            debug!(key = %key, pages, "Scan finished");
            return;
        }
    }
}

/// Items of an HSCAN iteration. See the module docs.
pub struct ScanStream<T> {
    state: ScanState,
    rx: mpsc::Receiver<CycloneResult<T>>,
    producer: Option<BoxFuture<'static, ()>>,
}

impl<T> ScanStream<T> {
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Stop the scan. The producer exits at its next send or round trip and
    /// the stream yields nothing more.
    pub fn cancel(&mut self) {
        self.producer = None;
        self.rx.close();
        if matches!(self.state, ScanState::Idle | ScanState::Scanning) {
            self.state = ScanState::Cancelled;
        }
    }
}

impl<T> Stream for ScanStream<T> {
    type Item = CycloneResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(producer) = this.producer.take() {
            tokio::spawn(producer);
            this.state = ScanState::Scanning;
        }
        if this.state != ScanState::Scanning {
            return Poll::Ready(None);
        }

        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(item))) => Poll::Ready(Some(Ok(item))),
            Poll::Ready(Some(Err(err))) => {
                this.state = ScanState::Failed;
                this.rx.close();
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.state = ScanState::Done;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
