//! Application wiring
//!
//! Builds every provider, store and service once from [`Config`] and shares
//! them through `Arc`s.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::domain::models::{Config, EmbeddingProviderKind, SplitterConfig};
use crate::domain::ports::{ChatModel, EmbeddingProvider, StreamingChatModel};
use crate::infrastructure::http::AppState;
use crate::infrastructure::ollama::{OllamaClient, OllamaClientConfig, OllamaEmbeddingProvider};
use crate::infrastructure::vector::{DocumentSplitter, HashingEmbeddingProvider, InMemoryEmbeddingStore};
use crate::services::{
    default_registry, AiServices, BasicChatService, ChatMemoryStore, ConversationService,
    EmbeddingService, KeyValueStore, RagService, StreamingChatService, ToolService,
};

/// Providers the services run against.
pub struct Providers {
    pub chat_model: Arc<dyn ChatModel>,
    pub streaming_model: Arc<dyn StreamingChatModel>,
    pub embedder: Arc<dyn EmbeddingProvider>,
}

impl Providers {
    /// Ollama for chat, and the configured embedding provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OllamaClient::new(OllamaClientConfig::from(&config.ollama))
            .context("Failed to create Ollama client")?;

        let embedder: Arc<dyn EmbeddingProvider> = match config.embedding.provider {
            EmbeddingProviderKind::Hashing => Arc::new(
                HashingEmbeddingProvider::new(config.embedding.dimensions)
                    .context("Failed to create hashing embedder")?,
            ),
            EmbeddingProviderKind::Ollama => Arc::new(OllamaEmbeddingProvider::new(client.clone())),
        };

        let client = Arc::new(client);
        Ok(Self {
            chat_model: client.clone(),
            streaming_model: client,
            embedder,
        })
    }
}

/// Every shared store and service of a running instance.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<InMemoryEmbeddingStore>,
    pub memory: Arc<ChatMemoryStore>,
    pub key_value: Arc<KeyValueStore>,
    pub basic_chat: Arc<BasicChatService>,
    pub conversation: Arc<ConversationService>,
    pub embeddings: Arc<EmbeddingService>,
    pub rag: Arc<RagService>,
    pub ai_services: Arc<AiServices>,
    pub tools: Arc<ToolService>,
    pub streaming: Arc<StreamingChatService>,
}

impl AppContext {
    /// Wire everything against the providers named in `config`.
    pub fn build(config: &Config) -> Result<Self> {
        let providers = Providers::from_config(config)?;
        Self::with_providers(config, providers)
    }

    /// Wire everything against the given providers.
    pub fn with_providers(config: &Config, providers: Providers) -> Result<Self> {
        let Providers {
            chat_model,
            streaming_model,
            embedder,
        } = providers;

        let splitter = DocumentSplitter::new(SplitterConfig::new(
            config.rag.max_chunk_size,
            config.rag.chunk_overlap,
        ))
        .context("Invalid document splitter settings")?;

        let store = Arc::new(InMemoryEmbeddingStore::new());
        let memory = Arc::new(ChatMemoryStore::new(config.memory.max_messages));
        let key_value = Arc::new(KeyValueStore::new());

        let embeddings = Arc::new(
            EmbeddingService::new(embedder.clone(), store.clone(), splitter)
                .with_min_score(config.rag.min_score),
        );
        let rag = Arc::new(RagService::new(chat_model.clone(), embeddings.clone()));
        let registry = Arc::new(default_registry(&key_value));

        info!(
            chat_model = %config.ollama.chat_model,
            embedder = embedder.name(),
            tools = registry.len(),
            "application context ready"
        );

        Ok(Self {
            config: config.clone(),
            store,
            memory: memory.clone(),
            key_value,
            basic_chat: Arc::new(BasicChatService::new(chat_model.clone())),
            conversation: Arc::new(ConversationService::new(chat_model.clone(), memory)),
            embeddings,
            rag,
            ai_services: Arc::new(AiServices::new(chat_model.clone())),
            tools: Arc::new(ToolService::new(chat_model, registry, config.tools.max_tool_rounds)),
            streaming: Arc::new(StreamingChatService::new(streaming_model)),
        })
    }

    /// Handler state for the HTTP API.
    pub fn http_state(&self) -> AppState {
        AppState {
            basic_chat: self.basic_chat.clone(),
            conversation: self.conversation.clone(),
            embeddings: self.embeddings.clone(),
            rag: self.rag.clone(),
            ai_services: self.ai_services.clone(),
            tools: self.tools.clone(),
            streaming: self.streaming.clone(),
            default_max_results: self.config.rag.default_max_results,
        }
    }
}
