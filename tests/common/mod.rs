//! Scripted engine for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tlsbridge::bridge::{Dispatching, Engine};
use tlsbridge::NetError;

/// Records every payload and answers with queued replies, falling back to
/// an empty 200 when the queue runs dry.
#[derive(Clone, Default)]
pub struct MockEngine {
    sent: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, payload: impl Into<String>) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(payload.into()));
        self
    }

    pub fn reply_json(&self, value: Value) -> &Self {
        self.reply(value.to_string())
    }

    pub fn fail(&self, message: impl Into<String>) -> &Self {
        self.replies.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// Every descriptor sent so far, parsed.
    pub fn sent(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|s| serde_json::from_str(s).unwrap())
            .collect()
    }

    pub fn last_sent(&self) -> Value {
        self.sent().pop().expect("nothing sent")
    }
}

impl Engine for MockEngine {
    fn dispatch(&self, payload: String) -> Dispatching {
        self.sent.lock().unwrap().push(payload);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"status": 200}).to_string()));
        Box::pin(async move { reply.map_err(NetError::EngineFailed) })
    }
}

pub fn ok_reply(target: &str, headers: Value, body: &str) -> Value {
    json!({
        "status": 200,
        "target": target,
        "headers": headers,
        "body": body,
    })
}
