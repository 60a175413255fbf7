//! Gated in-memory gateway
//!
//! Every call parks until the test answers it, so tests decide exactly in
//! which order requests complete:
//!
//! ```ignore
//! let (gateway, mut calls) = GatedGateway::new();
//! let mut sync = Synchronizer::new(gateway, Handle::current());
//! sync.refresh();
//! calls.next().await.reply_list(vec![software("1", "X")]);
//! sync.next_completion().await;
//! ```

use apm_console::console::{CollectionGateway, GatewayError};
use apm_console::shared::{Software, SoftwareFields};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Which operation was requested, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(SoftwareFields),
    Update(String, SoftwareFields),
    Delete(String),
}

#[derive(Debug)]
enum Reply {
    List(Result<Vec<Software>, GatewayError>),
    Create(Result<Software, GatewayError>),
    Done(Result<(), GatewayError>),
}

/// A request waiting for its answer
#[derive(Debug)]
pub struct PendingCall {
    pub call: Call,
    responder: oneshot::Sender<Reply>,
}

impl PendingCall {
    pub fn reply_list(self, records: Vec<Software>) {
        assert_eq!(self.call, Call::List, "not a list call");
        self.send(Reply::List(Ok(records)));
    }

    pub fn reply_created(self, record: Software) {
        assert!(matches!(self.call, Call::Create(_)), "not a create call: {:?}", self.call);
        self.send(Reply::Create(Ok(record)));
    }

    /// Acknowledge an update or delete
    pub fn reply_ok(self) {
        assert!(
            matches!(self.call, Call::Update(..) | Call::Delete(_)),
            "not an update/delete call: {:?}",
            self.call
        );
        self.send(Reply::Done(Ok(())));
    }

    pub fn reply_err(self, err: GatewayError) {
        let reply = match self.call {
            Call::List => Reply::List(Err(err)),
            Call::Create(_) => Reply::Create(Err(err)),
            Call::Update(..) | Call::Delete(_) => Reply::Done(Err(err)),
        };
        self.send(reply);
    }

    fn send(self, reply: Reply) {
        // The synchronizer side may already be gone in teardown
        let _ = self.responder.send(reply);
    }
}

/// Receiving end of the calls a [`GatedGateway`] has seen
pub struct CallQueue {
    rx: mpsc::UnboundedReceiver<PendingCall>,
}

impl CallQueue {
    /// Wait for the next request the synchronizer issued
    pub async fn next(&mut self) -> PendingCall {
        tokio::time::timeout(std::time::Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for a gateway call")
            .expect("gateway dropped")
    }
}

pub struct GatedGateway {
    tx: mpsc::UnboundedSender<PendingCall>,
}

impl GatedGateway {
    pub fn new() -> (Self, CallQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, CallQueue { rx })
    }

    async fn park(&self, call: Call) -> Result<Reply, GatewayError> {
        let (responder, answer) = oneshot::channel();
        self.tx
            .send(PendingCall { call, responder })
            .map_err(|_| GatewayError::transport("test dropped the call queue"))?;
        answer
            .await
            .map_err(|_| GatewayError::transport("call dropped without a reply"))
    }
}

#[async_trait]
impl CollectionGateway for GatedGateway {
    async fn list(&self) -> Result<Vec<Software>, GatewayError> {
        match self.park(Call::List).await? {
            Reply::List(result) => result,
            other => panic!("list answered with {:?}", other),
        }
    }

    async fn create(&self, fields: &SoftwareFields) -> Result<Software, GatewayError> {
        match self.park(Call::Create(fields.clone())).await? {
            Reply::Create(result) => result,
            other => panic!("create answered with {:?}", other),
        }
    }

    async fn update(&self, id: &str, fields: &SoftwareFields) -> Result<(), GatewayError> {
        match self.park(Call::Update(id.to_string(), fields.clone())).await? {
            Reply::Done(result) => result,
            other => panic!("update answered with {:?}", other),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        match self.park(Call::Delete(id.to_string())).await? {
            Reply::Done(result) => result,
            other => panic!("delete answered with {:?}", other),
        }
    }
}
