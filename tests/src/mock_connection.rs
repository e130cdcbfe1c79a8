use crate::exec_log::{ExecLog, LoggedRequest};

use async_trait::async_trait;
use mautic::{Connection, Error, Json, Method, RequestOptions, Result, SharedConnection};

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// A connection answering from a queue of scripted replies and recording
/// every request it receives.
#[derive(Debug, Default)]
pub struct MockConnection {
    id: Option<String>,

    /// Replies handed out in FIFO order
    replies: Mutex<VecDeque<Result<Json>>>,

    /// Log of all requests received
    ops_log: Arc<Mutex<Vec<LoggedRequest>>>,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        crate::init_logging();
        Arc::new(Self::default())
    }

    pub fn with_id(id: &str) -> Arc<Self> {
        crate::init_logging();
        Arc::new(Self {
            id: Some(id.to_string()),
            ..Self::default()
        })
    }

    /// The mock as the shared connection records are bound to.
    pub fn connection(self: &Arc<Self>) -> SharedConnection {
        self.clone()
    }

    /// Queues a successful response.
    pub fn reply(&self, json: Json) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(json));
        self
    }

    /// Queues a failure.
    pub fn fail(&self, err: Error) -> &Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }

    /// Number of scripted replies not consumed yet.
    pub fn pending(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn request(&self, method: Method, path: &str, options: RequestOptions) -> Result<Json> {
        self.ops_log.lock().unwrap().push(LoggedRequest {
            method,
            path: path.to_string(),
            options,
        });

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(mautic::err!("no reply scripted for {} {}", method, path)))
    }
}
