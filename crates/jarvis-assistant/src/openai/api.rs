//! AssistantGateway implementation for OpenAiGateway.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::gateway::{
    AssistantGateway, AssistantObject, AssistantParams, AssistantUpdate, Deletion, ExpiresAfter,
    FileObject, FileUpload, ListOrder, MessageObject, Role, RunEventStream, RunObject,
    ThreadObject, ToolOutput, ToolResources, VectorStoreFileObject, VectorStoreObject,
};
use crate::GatewayError;

use super::client::{check_status, OpenAiGateway};

/// Page size for message listings (service maximum).
const MESSAGE_PAGE_LIMIT: u32 = 100;

#[derive(serde::Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[async_trait]
impl AssistantGateway for OpenAiGateway {
    async fn create_assistant(
        &self,
        params: &AssistantParams,
    ) -> Result<AssistantObject, GatewayError> {
        self.post("/assistants", params).await
    }

    async fn retrieve_assistant(
        &self,
        assistant_id: &str,
    ) -> Result<AssistantObject, GatewayError> {
        self.get(&format!("/assistants/{assistant_id}")).await
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        update: &AssistantUpdate,
    ) -> Result<AssistantObject, GatewayError> {
        self.post(&format!("/assistants/{assistant_id}"), update).await
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<Deletion, GatewayError> {
        self.delete(&format!("/assistants/{assistant_id}")).await
    }

    async fn create_thread(&self) -> Result<ThreadObject, GatewayError> {
        self.post("/threads", &json!({})).await
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadObject, GatewayError> {
        self.get(&format!("/threads/{thread_id}")).await
    }

    async fn update_thread(
        &self,
        thread_id: &str,
        tool_resources: &ToolResources,
    ) -> Result<ThreadObject, GatewayError> {
        self.post(
            &format!("/threads/{thread_id}"),
            &json!({ "tool_resources": tool_resources }),
        )
        .await
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<Deletion, GatewayError> {
        self.delete(&format!("/threads/{thread_id}")).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: Role,
        content: &str,
    ) -> Result<MessageObject, GatewayError> {
        self.post(
            &format!("/threads/{thread_id}/messages"),
            &json!({ "role": role, "content": content }),
        )
        .await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<MessageObject>, GatewayError> {
        let page: ListResponse<MessageObject> = self
            .get(&format!(
                "/threads/{thread_id}/messages?order={}&limit={MESSAGE_PAGE_LIMIT}",
                order.as_str()
            ))
            .await?;
        Ok(page.data)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunObject, GatewayError> {
        self.post(
            &format!("/threads/{thread_id}/runs"),
            &json!({ "assistant_id": assistant_id }),
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject, GatewayError> {
        self.get(&format!("/threads/{thread_id}/runs/{run_id}")).await
    }

    async fn stream_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<RunEventStream, GatewayError> {
        self.post_stream(
            &format!("/threads/{thread_id}/runs"),
            json!({ "assistant_id": assistant_id }),
        )
        .await
    }

    async fn submit_tool_outputs_stream(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunEventStream, GatewayError> {
        self.post_stream(
            &format!("/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            json!({ "tool_outputs": outputs }),
        )
        .await
    }

    async fn create_vector_store(
        &self,
        name: &str,
        expires_after: &ExpiresAfter,
    ) -> Result<VectorStoreObject, GatewayError> {
        self.post(
            "/vector_stores",
            &json!({ "name": name, "expires_after": expires_after }),
        )
        .await
    }

    async fn retrieve_vector_store(
        &self,
        vector_store_id: &str,
    ) -> Result<VectorStoreObject, GatewayError> {
        self.get(&format!("/vector_stores/{vector_store_id}")).await
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<Deletion, GatewayError> {
        self.delete(&format!("/vector_stores/{vector_store_id}")).await
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject, GatewayError> {
        debug!(filename = %upload.filename, size = upload.bytes.len(), "file upload");

        let file_part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str("application/octet-stream")
            .map_err(|e| GatewayError::ApiError(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", file_part);

        // Uploads may be large; no request timeout beyond the connect timeout.
        let response = self
            .http
            .post(self.url("/files"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(e.to_string()))
    }

    async fn create_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFileObject, GatewayError> {
        self.post(
            &format!("/vector_stores/{vector_store_id}/files"),
            &json!({ "file_id": file_id }),
        )
        .await
    }

    async fn retrieve_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<VectorStoreFileObject, GatewayError> {
        self.get(&format!("/vector_stores/{vector_store_id}/files/{file_id}"))
            .await
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileObject, GatewayError> {
        self.get(&format!("/files/{file_id}")).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<Deletion, GatewayError> {
        self.delete(&format!("/files/{file_id}")).await
    }
}
