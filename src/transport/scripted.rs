// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-memory transport replaying canned responses

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::{codes, RawResponse, Transport, WireRequest};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Reply {
    Raw(Bytes),
    Failure { code: i32, message: String },
}

/// Transport that answers from a queue of scripted replies
///
/// Every request it receives is recorded. Clones share the queue and the
/// record, so a test can keep a handle after moving one into a request.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<WireRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw HTTP response (status line, headers, blank line, body)
    pub fn reply(&self, raw: impl Into<Bytes>) -> &Self {
        self.replies.lock().push_back(Reply::Raw(raw.into()));
        self
    }

    /// Queue a transport failure
    pub fn fail(&self, code: i32, message: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Reply::Failure {
            code,
            message: message.into(),
        });
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<WireRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Replies not consumed yet
    pub fn pending(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn round_trip(&mut self, request: &WireRequest) -> Result<RawResponse> {
        self.requests.lock().push(request.clone());

        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Raw(data)) => RawResponse::parse(data),
            Some(Reply::Failure { code, message }) => Err(Error::transport(code, message)),
            None => Err(Error::transport(
                codes::COULDNT_CONNECT,
                format!("no scripted reply left for {}", request.url),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
