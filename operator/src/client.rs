use async_trait::async_trait;
use model::endpoint::ServiceAddr;
use model::execution::{ExecutionId, ExecutionState, SubmitQuery};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum QueryServiceError {
    #[error("Failed to reach query service at '{1}': {0}")]
    Connection(reqwest::Error, ServiceAddr),

    #[error("Query service at '{0}' rejected the request: {1}")]
    Rejected(ServiceAddr, String),

    #[error("Malformed reply from query service at '{0}': {1}")]
    MalformedReply(ServiceAddr, reqwest::Error),

    #[error("Unknown execution '{1}' at query service '{0}'")]
    UnknownExecution(ServiceAddr, ExecutionId),
}

/// Client seam to the remote query service.
///
/// The operator only ever sees this trait: production wires an
/// [`HttpQueryService`] built from the configured endpoint, tests wire mocks.
/// Submission failures propagate immediately; only the polling phase waits.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn submit_query(&self, query: SubmitQuery) -> Result<ExecutionId, QueryServiceError>;

    async fn execution_status(
        &self,
        id: &ExecutionId,
    ) -> Result<ExecutionState, QueryServiceError>;
}

#[derive(Serialize)]
struct SubmitQueryBody<'a> {
    query: &'a str,
    output_location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
}

#[derive(Deserialize)]
struct SubmitQueryReply {
    execution_id: ExecutionId,
}

#[derive(Deserialize)]
struct ExecutionStatusReply {
    state: ExecutionState,
}

/// Query service client over its HTTP API.
pub struct HttpQueryService {
    addr: ServiceAddr,
    client: reqwest::Client,
}

impl HttpQueryService {
    pub fn new(addr: ServiceAddr) -> Self {
        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    #[instrument(skip(self, query), fields(addr = %self.addr))]
    async fn submit_query(&self, query: SubmitQuery) -> Result<ExecutionId, QueryServiceError> {
        let body = SubmitQueryBody {
            query: &query.query,
            output_location: &query.output_location,
            database: query.database.as_deref(),
        };

        let response = self
            .client
            .post(self.url("/v1/executions"))
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryServiceError::Connection(e, self.addr.clone()))?;

        if !response.status().is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(QueryServiceError::Rejected(self.addr.clone(), reason));
        }

        let reply: SubmitQueryReply = response
            .json()
            .await
            .map_err(|e| QueryServiceError::MalformedReply(self.addr.clone(), e))?;
        debug!("Submitted execution '{}'", reply.execution_id);
        Ok(reply.execution_id)
    }

    async fn execution_status(
        &self,
        id: &ExecutionId,
    ) -> Result<ExecutionState, QueryServiceError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/executions/{id}")))
            .send()
            .await
            .map_err(|e| QueryServiceError::Connection(e, self.addr.clone()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QueryServiceError::UnknownExecution(
                self.addr.clone(),
                id.clone(),
            ));
        }
        if !response.status().is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(QueryServiceError::Rejected(self.addr.clone(), reason));
        }

        let reply: ExecutionStatusReply = response
            .json()
            .await
            .map_err(|e| QueryServiceError::MalformedReply(self.addr.clone(), e))?;
        Ok(reply.state)
    }
}
