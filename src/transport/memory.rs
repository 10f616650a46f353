// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::traits::{RawReply, Transport};
use crate::error::SearchError;

/// In-memory transport that records every command and answers from a
/// scripted queue. An empty queue answers `null`.
#[derive(Default)]
pub struct RecordingTransport {
    commands: Mutex<Vec<Vec<String>>>,
    replies: Mutex<VecDeque<RawReply>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next command.
    pub fn push_reply(&self, reply: RawReply) {
        self.replies.lock().push_back(reply);
    }

    /// Queue a successful reply.
    pub fn reply_with(&self, result: Value) {
        self.push_reply(RawReply::ok(result));
    }

    /// Queue a server error reply.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.push_reply(RawReply::err(message));
    }

    /// Every command sent so far, oldest first.
    #[must_use]
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().clone()
    }

    #[must_use]
    pub fn last_command(&self) -> Option<Vec<String>> {
        self.commands.lock().last().cloned()
    }

    /// Forget recorded commands and pending replies.
    pub fn clear(&self) {
        self.commands.lock().clear();
        self.replies.lock().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, command: &[String]) -> Result<Value, SearchError> {
        if command.is_empty() {
            return Err(SearchError::InvalidCommand);
        }
        self.commands.lock().push(command.to_vec());
        let reply = self.replies.lock().pop_front().unwrap_or_default();
        reply.into_result()
    }
}
