use crate::handler::HookHandler;
use crate::hooks::{CreateTables, DeployHooks, RemoveTables};
use crate::into_request;
use crate::request::Request;
use anyhow::Result;
use model::endpoint::ServiceAddr;
use model::table::TablesConfig;
use operator::{HttpQueryService, QueryService, TableOperator};
use std::sync::Arc;
use tracing::info;

/// Marker payloads for the parameterless lifecycle hooks.
#[derive(Clone, Debug, Default)]
pub struct BeforeDeploy;

#[derive(Clone, Debug, Default)]
pub struct AfterDeploy;

#[derive(Clone, Debug, Default)]
pub struct AfterRemove;

pub type BeforeDeployRequest = Request<BeforeDeploy, Result<()>>;
pub type AfterDeployRequest = Request<AfterDeploy, Result<()>>;
pub type AfterRemoveRequest = Request<AfterRemove, Result<()>>;
pub type CreateTablesRequest = Request<CreateTables, Result<()>>;
pub type RemoveTablesRequest = Request<RemoveTables, Result<()>>;

/// Everything the host framework can ask of the plugin. The sender returned
/// by [`start`]/[`spawn`] is the whole plugin surface.
#[derive(Debug)]
pub enum PluginRequest {
    BeforeDeploy(BeforeDeployRequest),
    AfterDeploy(AfterDeployRequest),
    AfterRemove(AfterRemoveRequest),
    CreateTables(CreateTablesRequest),
    RemoveTables(RemoveTablesRequest),
}

into_request!(BeforeDeploy, BeforeDeployRequest, PluginRequest);
into_request!(AfterDeploy, AfterDeployRequest, PluginRequest);
into_request!(AfterRemove, AfterRemoveRequest, PluginRequest);
into_request!(CreateTables, CreateTablesRequest, PluginRequest);
into_request!(RemoveTables, RemoveTablesRequest, PluginRequest);

const DEFAULT_CAPACITY: usize = 16;

/// Start the plugin on its own thread and runtime, for hosts that are not
/// async themselves. The query service client is built here from the
/// configured endpoint; no process-wide client state is involved.
pub fn start(config: TablesConfig, service_addr: ServiceAddr) -> flume::Sender<PluginRequest> {
    info!("Starting");
    let (handle, receiver) = flume::bounded(DEFAULT_CAPACITY);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .enable_io()
            .build()
            .expect("Failed to create Tokio Runtime");

        rt.block_on(async move {
            let service = Arc::new(HttpQueryService::new(service_addr));
            let hooks = DeployHooks::new(config, TableOperator::new(service));
            HookHandler::new(receiver, hooks).run().await
        });

        rt.shutdown_background();
    });

    handle
}

/// Spawn the plugin into the current runtime with an injected query service
/// client. This is the test entry point and the surface for async hosts.
pub fn spawn(
    config: TablesConfig,
    service: Arc<dyn QueryService>,
) -> flume::Sender<PluginRequest> {
    info!("Starting");
    let (handle, receiver) = flume::bounded(DEFAULT_CAPACITY);

    let hooks = DeployHooks::new(config, TableOperator::new(service));
    tokio::spawn(async move { HookHandler::new(receiver, hooks).run().await });

    handle
}
