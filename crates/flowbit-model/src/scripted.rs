//! Canned-reply model used as the test double across the workspace.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::GenerativeModel;
use flowbit_core::{Error, Result};

/// A model that replays scripted replies in order and records every prompt
/// it receives. Running out of scripted replies is a model error, which is
/// also how tests assert that no call was made.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(Ok(reply.into()));
    }

    /// Queue a failed call.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().push_back(Err(message.into()));
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of `generate` calls made.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        match self.replies.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(Error::Model(message)),
            None => Err(Error::Model("no scripted reply queued".to_string())),
        }
    }
}
