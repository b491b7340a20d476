//! Telegram adapter (teloxide).
//!
//! Implements the `rwb-core` Messenger port over the Telegram Bot API. The
//! only retry honored here is Telegram's own RetryAfter backpressure; every
//! other failure is returned to the caller, which logs and moves on.

use async_trait::async_trait;

use teloxide::prelude::*;
use tokio::time::sleep;

use rwb_core::{domain::UserId, errors::Error, ports::Messenger, Result};

#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn from_token(token: &str) -> Self {
        Self::new(Bot::new(token))
    }

    fn tg_chat(user: UserId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(user.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl Messenger for TelegramNotifier {
    async fn send_text(&self, user: UserId, text: &str) -> Result<()> {
        match self
            .bot
            .send_message(Self::tg_chat(user), text.to_string())
            .await
        {
            Ok(_) => Ok(()),
            Err(teloxide::RequestError::RetryAfter(delay)) => {
                sleep(delay).await;
                self.bot
                    .send_message(Self::tg_chat(user), text.to_string())
                    .await
                    .map(|_| ())
                    .map_err(Self::map_err)
            }
            Err(e) => Err(Self::map_err(e)),
        }
    }
}
