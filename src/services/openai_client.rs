use anyhow::{anyhow, Context};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// One prompt for the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub json_object: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        CompletionRequest {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 1000,
            json_object: false,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn json_object(mut self) -> Self {
        self.json_object = true;
        self
    }
}

/// A language model answering free-text prompts. Output is non-deterministic
/// and may be malformed; callers keep a local fallback for everything they ask.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<String>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl Default for OpenaiClient {
    fn default() -> Self {
        OpenaiClient {
            client: Client::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl OpenaiClient {
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
            model,
        }
    }

    fn messages(request: &CompletionRequest) -> anyhow::Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages = vec![];

        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.as_str())
                    .build()?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()?
                .into(),
        );

        Ok(messages)
    }
}

#[async_trait]
impl Oracle for OpenaiClient {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<String> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.as_str())
            .messages(Self::messages(&request)?)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens);
        if request.json_object {
            args.response_format(ResponseFormat::JsonObject);
        }
        let chat_request = args.build()?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .context("Openai chat completion failed")?;
        log::debug!("Response: {:?}", response);

        let content = response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No choices in Openai response"))?
            .message
            .content
            .clone()
            .ok_or_else(|| anyhow!("No content"))?;

        match content.trim().is_empty() {
            true => Err(anyhow!("Empty content in Openai response")),
            false => Ok(content.trim().to_string()),
        }
    }
}
