//! Scripted connection for unit tests.
//!
//! Records every command it is sent and answers with pre-queued replies, in
//! order. Clones share the same script.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use redis::aio::ConnectionLike;
use redis::{Arg, Cmd, ErrorKind, Pipeline, RedisError, RedisFuture, RedisResult, Value};

#[derive(Default)]
struct Script {
    replies: VecDeque<RedisResult<Value>>,
    sent: Vec<Vec<String>>,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedConnection {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, value: Value) -> &Self {
        self.script.lock().unwrap().replies.push_back(Ok(value));
        self
    }

    pub(crate) fn fail(&self, err: RedisError) -> &Self {
        self.script.lock().unwrap().replies.push_back(Err(err));
        self
    }

    /// Commands sent so far, each as its argument list.
    pub(crate) fn sent(&self) -> Vec<Vec<String>> {
        self.script.lock().unwrap().sent.clone()
    }

    pub(crate) fn last_sent(&self) -> Vec<String> {
        self.sent().pop().unwrap_or_default()
    }
}

impl ConnectionLike for ScriptedConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let args = cmd
            .args_iter()
            .map(|arg| match arg {
                Arg::Simple(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                Arg::Cursor => "<cursor>".to_string(),
            })
            .collect();
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.sent.push(args);
            script.replies.pop_front().unwrap_or_else(|| {
                Err(RedisError::from((ErrorKind::ClientError, "script exhausted")))
            })
        };
        Box::pin(async move { reply })
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        _cmd: &'a Pipeline,
        _offset: usize,
        _count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        Box::pin(async move {
            Err(RedisError::from((ErrorKind::ClientError, "pipelines are not scripted")))
        })
    }

    fn get_db(&self) -> i64 {
        0
    }
}

pub(crate) fn bulk(s: &str) -> Value {
    Value::BulkString(s.as_bytes().to_vec())
}

pub(crate) fn array(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| bulk(s)).collect())
}

/// One HSCAN page: `[cursor, [elements...]]`.
pub(crate) fn scan_page(cursor: u64, items: &[&str]) -> Value {
    Value::Array(vec![bulk(&cursor.to_string()), array(items)])
}

pub(crate) fn wire(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// The error a connection raises for a `-CODE detail` reply line.
pub(crate) fn server_error(line: &str) -> RedisError {
    redis::parse_redis_value(format!("-{}\r\n", line).as_bytes())
        .and_then(Value::extract_error)
        .expect_err("error reply")
}
