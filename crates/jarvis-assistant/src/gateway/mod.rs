//! The remote resource boundary.
//!
//! `AssistantGateway` is the only way the session layer talks to the
//! remote service. Every call is fallible and deletions report an explicit
//! confirmation flag instead of implying success from the absence of an
//! error.

mod events;
mod types;

pub use events::{RunEvent, RunEventStream};
pub use types::*;

use async_trait::async_trait;

use crate::GatewayError;

#[async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn create_assistant(
        &self,
        params: &AssistantParams,
    ) -> Result<AssistantObject, GatewayError>;

    async fn retrieve_assistant(&self, assistant_id: &str)
        -> Result<AssistantObject, GatewayError>;

    async fn update_assistant(
        &self,
        assistant_id: &str,
        update: &AssistantUpdate,
    ) -> Result<AssistantObject, GatewayError>;

    async fn delete_assistant(&self, assistant_id: &str) -> Result<Deletion, GatewayError>;

    async fn create_thread(&self) -> Result<ThreadObject, GatewayError>;

    async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadObject, GatewayError>;

    /// Replace the thread's tool resources.
    async fn update_thread(
        &self,
        thread_id: &str,
        tool_resources: &ToolResources,
    ) -> Result<ThreadObject, GatewayError>;

    async fn delete_thread(&self, thread_id: &str) -> Result<Deletion, GatewayError>;

    async fn create_message(
        &self,
        thread_id: &str,
        role: Role,
        content: &str,
    ) -> Result<MessageObject, GatewayError>;

    /// List a thread's messages in the requested order.
    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<MessageObject>, GatewayError>;

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunObject, GatewayError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str)
        -> Result<RunObject, GatewayError>;

    /// Create a run and return its live event stream.
    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunEventStream, GatewayError>;

    /// Submit tool outputs for a run paused on `requires_action` and
    /// return the resumed run's event stream.
    async fn submit_tool_outputs_stream(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunEventStream, GatewayError>;

    async fn create_vector_store(
        &self,
        name: &str,
        expires_after: &ExpiresAfter,
    ) -> Result<VectorStoreObject, GatewayError>;

    async fn retrieve_vector_store(
        &self,
        vector_store_id: &str,
    ) -> Result<VectorStoreObject, GatewayError>;

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<Deletion, GatewayError>;

    /// Upload a file for assistant use.
    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, GatewayError>;

    /// Attach an uploaded file to a vector store, starting ingestion.
    async fn create_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFileObject, GatewayError>;

    async fn retrieve_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFileObject, GatewayError>;

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject, GatewayError>;

    async fn delete_file(&self, file_id: &str) -> Result<Deletion, GatewayError>;
}
