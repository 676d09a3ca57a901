//! Chat transports and the loop that feeds them through the dispatcher.
//!
//! Messages are handled one at a time: each command runs to completion and
//! its reply is sent before the next message is looked at.

pub mod console;
pub mod telegram;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::commands::{Dispatcher, Reply};
use crate::error::Result;
use crate::output::truncate;

/// One incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: i64,
    pub message_id: Option<i64>,
    /// Platform account of the sender; selects the bot user.
    pub account_id: i64,
    pub text: String,
}

pub trait Transport {
    /// Block until messages arrive. `Ok(None)` once the transport is closed.
    fn receive(&mut self) -> Result<Option<Vec<Inbound>>>;

    /// Deliver the reply to a message.
    fn send(&mut self, to: &Inbound, reply: &Reply) -> Result<()>;
}

/// Exponential delay between failed receives.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay to wait now; doubles the next one up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(60))
    }
}

/// Run until the transport closes, with the default backoff.
pub fn serve<T: Transport>(transport: &mut T, dispatcher: &Dispatcher) -> Result<()> {
    serve_with(transport, dispatcher, Backoff::default())
}

pub fn serve_with<T: Transport>(
    transport: &mut T,
    dispatcher: &Dispatcher,
    mut backoff: Backoff,
) -> Result<()> {
    info!("serving commands");
    loop {
        let batch = match transport.receive() {
            Ok(Some(batch)) => {
                backoff.reset();
                batch
            }
            Ok(None) => {
                info!("transport closed");
                return Ok(());
            }
            Err(e) => {
                let delay = backoff.next_delay();
                warn!(error = %e, backoff_secs = delay.as_secs(), "receive failed, backing off");
                std::thread::sleep(delay);
                continue;
            }
        };

        for message in batch {
            debug!(
                chat_id = message.chat_id,
                text = %truncate(&message.text, 64),
                "message received"
            );
            let Some(reply) = dispatcher.dispatch(message.account_id, &message.text) else {
                continue;
            };
            if let Err(e) = transport.send(&message, &reply) {
                warn!(chat_id = message.chat_id, error = %e, "failed to send reply");
            }
        }
    }
}
