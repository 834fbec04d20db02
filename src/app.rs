//! Root composition: one conversation and one guideline panel over a shared backend.

use crate::client::{ApiClientBuilder, Backend};
use crate::config::ClientConfig;
use crate::conversation::Conversation;
use crate::guidelines::GuidelineManager;
use crate::locale::{Locale, Strings};
use crate::render::{render, RenderedMessage};
use crate::types::{HealthStatus, Message};
use crate::Result;
use std::sync::Arc;

pub struct App {
    backend: Arc<dyn Backend>,
    conversation: Conversation,
    guidelines: GuidelineManager,
    locale: Locale,
}

impl App {
    /// A fresh session seeded with the greeting.
    pub fn new(backend: Arc<dyn Backend>, locale: Locale) -> Self {
        Self {
            guidelines: GuidelineManager::new(backend.clone(), locale),
            conversation: Conversation::with_greeting(locale),
            backend,
            locale,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = ApiClientBuilder::from_config(config.clone()).build()?;
        Ok(Self::new(Arc::new(client), config.locale))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn strings(&self) -> &'static Strings {
        self.locale.strings()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn guidelines(&self) -> &GuidelineManager {
        &self.guidelines
    }

    /// Initial guideline load. Failure only leaves a notice.
    pub async fn start(&self) {
        let _ = self.guidelines.refresh().await;
    }

    /// Put `text` in the input and submit it. `None` if the submission was a no-op.
    pub async fn send(&mut self, text: &str) -> Option<Message> {
        self.conversation.set_input(text);
        self.conversation
            .send(self.backend.as_ref())
            .await
            .cloned()
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.backend.check_health().await
    }

    pub fn rendered_log(&self) -> Vec<RenderedMessage> {
        self.conversation
            .messages()
            .iter()
            .map(|m| render(m, self.strings()))
            .collect()
    }
}
