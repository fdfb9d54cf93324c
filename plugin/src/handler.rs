use crate::hooks::DeployHooks;
use crate::plugin::PluginRequest;
use crate::request::Request;
use tracing::{debug, info, instrument};

macro_rules! dispatch {
    ($req:expr, |$payload:ident| $call:expr) => {{
        debug!("Received: {:?}", $req);
        let Request {
            payload: $payload,
            reply_to,
        } = $req;
        let _ = reply_to.send($call.await.map_err(Into::into));
    }};
}

/// Consumes host requests from the channel and runs the matching hook. One
/// request at a time; the host's lifecycle is sequential and so is this.
pub(crate) struct HookHandler {
    receiver: flume::Receiver<PluginRequest>,
    hooks: DeployHooks,
}

impl HookHandler {
    pub(crate) fn new(receiver: flume::Receiver<PluginRequest>, hooks: DeployHooks) -> Self {
        Self { receiver, hooks }
    }

    #[instrument(skip(self))]
    pub(crate) async fn run(self) {
        while let Ok(req) = self.receiver.recv_async().await {
            self.handle_recv(req).await;
        }
        info!("Host dropped the plugin handle");
    }

    async fn handle_recv(&self, req: PluginRequest) {
        match req {
            PluginRequest::BeforeDeploy(r) => {
                dispatch!(r, |_p| self.hooks.before_deploy())
            }
            PluginRequest::AfterDeploy(r) => {
                dispatch!(r, |_p| self.hooks.after_deploy())
            }
            PluginRequest::AfterRemove(r) => {
                dispatch!(r, |_p| self.hooks.after_remove())
            }
            PluginRequest::CreateTables(r) => {
                dispatch!(r, |payload| self.hooks.create_tables(payload))
            }
            PluginRequest::RemoveTables(r) => {
                dispatch!(r, |payload| self.hooks.remove_tables(payload))
            }
        }
    }
}
