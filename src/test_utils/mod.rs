//! Helpers shared by the in-crate service tests.
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::mail::{DeliveryError, Mailer, NewAccountEmail};
use crate::store::MemoryStore;
use crate::{config, App};

pub mod users;

pub const JWT_SECRET: &str = "a secret key used only in tests";

/// Forwards every outgoing e-mail to a channel the test can read.
#[derive(Debug)]
pub struct RecordingMailer {
    sent: mpsc::UnboundedSender<NewAccountEmail>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_new_account(
        &self,
        email: NewAccountEmail,
    ) -> error_stack::Result<(), DeliveryError> {
        self.sent
            .send(email)
            .map_err(|_| error_stack::Report::new(DeliveryError))
    }
}

pub struct TestApp {
    pub app: App,
    pub store: Arc<MemoryStore>,
    pub outbox: mpsc::UnboundedReceiver<NewAccountEmail>,
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

pub fn build_test_app_with(configure: impl FnOnce(&mut config::Server)) -> TestApp {
    let mut cfg = config::Server::new(JWT_SECRET);
    configure(&mut cfg);

    let store = Arc::new(MemoryStore::new());
    let (sent, outbox) = mpsc::unbounded_channel();
    let app = App::from_parts(cfg, store.clone(), Arc::new(RecordingMailer { sent }));

    TestApp { app, store, outbox }
}
