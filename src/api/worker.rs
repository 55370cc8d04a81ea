use super::error::ApiError;
use super::gateway::TaskApi;
use crate::domain::{Task, TaskDraft, TaskId};
use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{debug, info};

/// A request queued for the network
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    List,
    Create(TaskDraft),
    Update(TaskId, TaskDraft),
    Delete(TaskId),
}

impl ApiRequest {
    /// The task this request mutates, if any
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            ApiRequest::Update(id, _) | ApiRequest::Delete(id) => Some(*id),
            ApiRequest::List | ApiRequest::Create(_) => None,
        }
    }

    /// Run the round trip against `api`
    pub fn execute(self, api: &dyn TaskApi) -> Completion {
        let outcome = match &self {
            ApiRequest::List => api.list().map(ApiReply::Tasks),
            ApiRequest::Create(draft) => api.create(draft).map(ApiReply::Task),
            ApiRequest::Update(id, draft) => api.update(*id, draft).map(ApiReply::Task),
            ApiRequest::Delete(id) => api.delete(*id).map(|_| ApiReply::Deleted),
        };
        Completion {
            request: self,
            outcome,
        }
    }
}

/// Decoded success payload
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Tasks(Vec<Task>),
    Task(Task),
    Deleted,
}

/// A finished round trip, paired with the request that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub request: ApiRequest,
    pub outcome: Result<ApiReply, ApiError>,
}

/// Background thread that performs API calls in submission order.
///
/// The UI thread submits requests and drains completions on every tick, so
/// it never blocks on the network. Requests are never cancelled; dropping the
/// worker closes the queue and the thread exits after its current call.
pub struct ApiWorker {
    requests: Sender<ApiRequest>,
    completions: Receiver<Completion>,
}

impl ApiWorker {
    pub fn spawn<A>(api: A) -> Self
    where
        A: TaskApi + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<ApiRequest>();
        let (completion_tx, completion_rx) = mpsc::channel();

        thread::spawn(move || {
            info!("api worker started");
            for request in request_rx {
                debug!(?request, "executing request");
                let completion = request.execute(&api);
                if completion_tx.send(completion).is_err() {
                    break;
                }
            }
            info!("api worker stopped");
        });

        Self {
            requests: request_tx,
            completions: completion_rx,
        }
    }

    pub fn submit(&self, request: ApiRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| anyhow!("API worker has stopped"))
    }

    /// Next finished request, without blocking
    pub fn try_recv(&self) -> Option<Completion> {
        match self.completions.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
