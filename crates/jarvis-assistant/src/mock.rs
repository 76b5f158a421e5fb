//! Scripted in-memory gateway for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};

use crate::gateway::*;
use crate::GatewayError;

/// Records every call and answers from scripted state.
///
/// Ids are generated per prefix (`asst_1`, `thr_1`, `thr_2`, ...). Scripted
/// queues fall back to success when empty.
#[derive(Default)]
pub(crate) struct MockGateway {
    state: Mutex<MockState>,
}

#[derive(Default)]
pub(crate) struct MockState {
    pub calls: Vec<String>,
    counters: HashMap<&'static str, u32>,
    pub assistants: HashMap<String, AssistantObject>,
    pub threads: HashMap<String, ThreadObject>,
    /// First entry answers `create_run`, the rest answer `retrieve_run`.
    pub run_statuses: VecDeque<RunStatus>,
    pub run_usage: Option<RunUsage>,
    /// Returned by `list_messages`, newest first.
    pub messages: Vec<MessageObject>,
    /// First entry answers the attach call, the rest answer polls.
    pub ingestion: VecDeque<IngestionStatus>,
    /// Ids whose deletion is refused with `deleted: false`.
    pub refuse_delete: HashSet<String>,
    /// Operations that fail with an API error.
    pub failing: HashSet<&'static str>,
    /// Event scripts for `stream_run` and `submit_tool_outputs_stream`.
    pub streams: VecDeque<Vec<Result<RunEvent, GatewayError>>>,
    pub submitted: Vec<(String, Vec<ToolOutput>)>,
    pub assistant_updates: Vec<AssistantUpdate>,
    pub thread_updates: Vec<(String, ToolResources)>,
    /// Uploaded files by id, with their filenames.
    pub files: HashMap<String, String>,
    pub deleted_files: Vec<String>,
}

impl MockState {
    fn next_id(&mut self, prefix: &'static str) -> String {
        let n = self.counters.entry(prefix).or_insert(0);
        *n += 1;
        format!("{prefix}_{n}")
    }

    fn deletion(&self, id: &str) -> Deletion {
        Deletion {
            id: id.to_string(),
            deleted: !self.refuse_delete.contains(id),
        }
    }

    fn next_stream(&mut self) -> RunEventStream {
        let events = self.streams.pop_front().unwrap_or_default();
        stream::iter(events).boxed()
    }
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mutate the scripted state.
    pub fn script(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Read from the state.
    pub fn inspect<T>(&self, f: impl FnOnce(&MockState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.inspect(|s| s.calls.clone())
    }

    pub fn call_count(&self) -> usize {
        self.inspect(|s| s.calls.len())
    }

    pub fn count(&self, op: &str) -> usize {
        self.inspect(|s| s.calls.iter().filter(|c| c.as_str() == op).count())
    }

    fn record(&self, op: &'static str) -> Result<MutexGuard<'_, MockState>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op.to_string());
        if state.failing.contains(op) {
            return Err(GatewayError::ApiError(format!("scripted failure: {op}")));
        }
        Ok(state)
    }
}

pub(crate) fn run(id: &str, status: RunStatus) -> RunObject {
    RunObject {
        id: id.to_string(),
        thread_id: "thr_1".to_string(),
        status,
        required_action: None,
        last_error: None,
        usage: None,
    }
}

/// A run paused on the given `(call id, function name, JSON arguments)` calls.
pub(crate) fn requires_action(id: &str, calls: &[(&str, &str, &str)]) -> RunObject {
    let tool_calls = calls
        .iter()
        .map(|(call_id, name, args)| RequiredToolCall {
            id: call_id.to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: args.to_string(),
            },
        })
        .collect();
    RunObject {
        required_action: Some(RequiredAction {
            submit_tool_outputs: SubmitToolOutputs { tool_calls },
        }),
        ..run(id, RunStatus::RequiresAction)
    }
}

pub(crate) fn text_message(id: &str, role: Role, text: &str) -> MessageObject {
    MessageObject {
        id: id.to_string(),
        role,
        content: vec![MessageContent::Text {
            text: TextContent {
                value: text.to_string(),
                annotations: Vec::new(),
            },
        }],
        run_id: None,
    }
}

#[async_trait]
impl AssistantGateway for MockGateway {
    async fn create_assistant(
        &self,
        params: &AssistantParams,
    ) -> Result<AssistantObject, GatewayError> {
        let mut state = self.record("create_assistant")?;
        let assistant = AssistantObject {
            id: state.next_id("asst"),
            name: Some(params.name.clone()),
            instructions: Some(params.instructions.clone()),
            model: params.model.clone(),
            tools: params.tools.clone(),
            tool_resources: None,
        };
        state
            .assistants
            .insert(assistant.id.clone(), assistant.clone());
        Ok(assistant)
    }

    async fn retrieve_assistant(
        &self,
        assistant_id: &str,
    ) -> Result<AssistantObject, GatewayError> {
        let state = self.record("retrieve_assistant")?;
        state
            .assistants
            .get(assistant_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("assistant {assistant_id}")))
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        update: &AssistantUpdate,
    ) -> Result<AssistantObject, GatewayError> {
        let mut state = self.record("update_assistant")?;
        state.assistant_updates.push(update.clone());
        let assistant = state
            .assistants
            .get_mut(assistant_id)
            .ok_or_else(|| GatewayError::NotFound(format!("assistant {assistant_id}")))?;
        if let Some(name) = &update.name {
            assistant.name = Some(name.clone());
        }
        if let Some(instructions) = &update.instructions {
            assistant.instructions = Some(instructions.clone());
        }
        if let Some(model) = &update.model {
            assistant.model = model.clone();
        }
        if let Some(tools) = &update.tools {
            assistant.tools = tools.clone();
        }
        if let Some(resources) = &update.tool_resources {
            assistant.tool_resources = Some(resources.clone());
        }
        Ok(assistant.clone())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<Deletion, GatewayError> {
        let mut state = self.record("delete_assistant")?;
        let deletion = state.deletion(assistant_id);
        if deletion.deleted {
            state.assistants.remove(assistant_id);
        }
        Ok(deletion)
    }

    async fn create_thread(&self) -> Result<ThreadObject, GatewayError> {
        let mut state = self.record("create_thread")?;
        let thread = ThreadObject {
            id: state.next_id("thr"),
            tool_resources: None,
        };
        state.threads.insert(thread.id.clone(), thread.clone());
        Ok(thread)
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadObject, GatewayError> {
        let state = self.record("retrieve_thread")?;
        state
            .threads
            .get(thread_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("thread {thread_id}")))
    }

    async fn update_thread(
        &self,
        thread_id: &str,
        tool_resources: &ToolResources,
    ) -> Result<ThreadObject, GatewayError> {
        let mut state = self.record("update_thread")?;
        state
            .thread_updates
            .push((thread_id.to_string(), tool_resources.clone()));
        let thread = ThreadObject {
            id: thread_id.to_string(),
            tool_resources: Some(tool_resources.clone()),
        };
        state.threads.insert(thread.id.clone(), thread.clone());
        Ok(thread)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<Deletion, GatewayError> {
        let mut state = self.record("delete_thread")?;
        let deletion = state.deletion(thread_id);
        if deletion.deleted {
            state.threads.remove(thread_id);
        }
        Ok(deletion)
    }

    async fn create_message(
        &self,
        _thread_id: &str,
        role: Role,
        content: &str,
    ) -> Result<MessageObject, GatewayError> {
        let mut state = self.record("create_message")?;
        let id = state.next_id("msg");
        Ok(text_message(&id, role, content))
    }

    async fn list_messages(
        &self,
        _thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<MessageObject>, GatewayError> {
        let state = self.record("list_messages")?;
        let mut messages = state.messages.clone();
        if order == ListOrder::Asc {
            messages.reverse();
        }
        Ok(messages)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        _assistant_id: &str,
    ) -> Result<RunObject, GatewayError> {
        let mut state = self.record("create_run")?;
        let status = state
            .run_statuses
            .pop_front()
            .unwrap_or(RunStatus::Completed);
        let id = state.next_id("run");
        Ok(RunObject {
            thread_id: thread_id.to_string(),
            ..run(&id, status)
        })
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject, GatewayError> {
        let mut state = self.record("retrieve_run")?;
        let status = state
            .run_statuses
            .pop_front()
            .unwrap_or(RunStatus::Completed);
        let usage = if status == RunStatus::Completed {
            state.run_usage
        } else {
            None
        };
        Ok(RunObject {
            thread_id: thread_id.to_string(),
            usage,
            ..run(run_id, status)
        })
    }

    async fn stream_run(
        &self,
        _thread_id: &str,
        _assistant_id: &str,
    ) -> Result<RunEventStream, GatewayError> {
        let mut state = self.record("stream_run")?;
        Ok(state.next_stream())
    }

    async fn submit_tool_outputs_stream(
        &self,
        _thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunEventStream, GatewayError> {
        let mut state = self.record("submit_tool_outputs")?;
        state.submitted.push((run_id.to_string(), outputs.to_vec()));
        Ok(state.next_stream())
    }

    async fn create_vector_store(
        &self,
        name: &str,
        expires_after: &ExpiresAfter,
    ) -> Result<VectorStoreObject, GatewayError> {
        let mut state = self.record("create_vector_store")?;
        Ok(VectorStoreObject {
            id: state.next_id("vs"),
            name: Some(name.to_string()),
            expires_after: Some(expires_after.clone()),
        })
    }

    async fn retrieve_vector_store(
        &self,
        vector_store_id: &str,
    ) -> Result<VectorStoreObject, GatewayError> {
        let _state = self.record("retrieve_vector_store")?;
        Ok(VectorStoreObject {
            id: vector_store_id.to_string(),
            name: Some("remote store".to_string()),
            expires_after: None,
        })
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<Deletion, GatewayError> {
        let state = self.record("delete_vector_store")?;
        Ok(state.deletion(vector_store_id))
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, GatewayError> {
        let mut state = self.record("upload_file")?;
        let id = state.next_id("file");
        state.files.insert(id.clone(), upload.filename.clone());
        Ok(FileObject {
            id,
            filename: upload.filename,
            bytes: upload.bytes.len() as u64,
        })
    }

    async fn create_vector_store_file(
        &self,
        _vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFileObject, GatewayError> {
        let mut state = self.record("create_vector_store_file")?;
        let status = state
            .ingestion
            .pop_front()
            .unwrap_or(IngestionStatus::Completed);
        Ok(VectorStoreFileObject {
            id: file_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn retrieve_vector_store_file(
        &self,
        _vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFileObject, GatewayError> {
        let mut state = self.record("retrieve_vector_store_file")?;
        let status = state
            .ingestion
            .pop_front()
            .unwrap_or(IngestionStatus::Completed);
        Ok(VectorStoreFileObject {
            id: file_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject, GatewayError> {
        let state = self.record("retrieve_file")?;
        state
            .files
            .get(file_id)
            .map(|filename| FileObject {
                id: file_id.to_string(),
                filename: filename.clone(),
                bytes: 0,
            })
            .ok_or_else(|| GatewayError::NotFound(format!("file {file_id}")))
    }

    async fn delete_file(&self, file_id: &str) -> Result<Deletion, GatewayError> {
        let mut state = self.record("delete_file")?;
        let deletion = state.deletion(file_id);
        if deletion.deleted {
            state.files.remove(file_id);
            state.deleted_files.push(file_id.to_string());
        }
        Ok(deletion)
    }
}
