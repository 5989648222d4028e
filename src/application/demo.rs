//! Feature walkthrough
//!
//! Runs six short demonstrations against a live [`AppContext`]: basic chat,
//! memory chat, vector search, RAG, template assistants and tool calling.
//! A failing demo is recorded and the rest still run.

use serde::Serialize;
use tracing::{info, warn};

use super::context::AppContext;
use crate::domain::errors::DomainResult;

const DEMO_CONVERSATION_ID: &str = "demo";

/// One labelled line of demo output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoEntry {
    pub label: String,
    pub value: String,
}

impl DemoEntry {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoSection {
    pub title: String,
    pub entries: Vec<DemoEntry>,
    /// Set when the demo stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub sections: Vec<DemoSection>,
}

impl DemoReport {
    pub fn failures(&self) -> usize {
        self.sections.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Run every demo in order.
pub async fn run_all(context: &AppContext) -> DemoReport {
    let mut report = DemoReport::default();

    let mut entries = Vec::new();
    let outcome = basic_chat(context, &mut entries).await;
    report.sections.push(section("Basic Chat", entries, outcome));

    let mut entries = Vec::new();
    let outcome = conversational_chat(context, &mut entries).await;
    report
        .sections
        .push(section("Conversational Chat with Memory", entries, outcome));

    let mut entries = Vec::new();
    let outcome = embeddings(context, &mut entries).await;
    report
        .sections
        .push(section("Embeddings and Vector Search", entries, outcome));

    let mut entries = Vec::new();
    let outcome = rag(context, &mut entries).await;
    report
        .sections
        .push(section("RAG (Retrieval Augmented Generation)", entries, outcome));

    let mut entries = Vec::new();
    let outcome = ai_services(context, &mut entries).await;
    report.sections.push(section("AI Services", entries, outcome));

    let mut entries = Vec::new();
    let outcome = tools(context, &mut entries).await;
    report
        .sections
        .push(section("Tools/Function Calling", entries, outcome));

    info!(
        demos = report.sections.len(),
        failures = report.failures(),
        "demo run complete"
    );
    report
}

fn section(title: &str, entries: Vec<DemoEntry>, outcome: DomainResult<()>) -> DemoSection {
    let error = outcome.err().map(|err| {
        warn!(demo = title, error = %err, "demo failed");
        err.to_string()
    });
    DemoSection {
        title: title.to_string(),
        entries,
        error,
    }
}

async fn basic_chat(context: &AppContext, out: &mut Vec<DemoEntry>) -> DomainResult<()> {
    let question = "What is Java?";
    let answer = context.basic_chat.chat(question).await?;
    out.push(DemoEntry::new("Q", question));
    out.push(DemoEntry::new("A", answer));

    let code = context
        .basic_chat
        .generate_code("Create a Java method to check if a number is prime")
        .await?;
    out.push(DemoEntry::new("Code Generation Result", code));
    Ok(())
}

async fn conversational_chat(context: &AppContext, out: &mut Vec<DemoEntry>) -> DomainResult<()> {
    let conversation = &context.conversation;
    conversation.clear(DEMO_CONVERSATION_ID);

    for message in ["My favorite color is blue", "What is my favorite color?"] {
        let reply = conversation.chat(DEMO_CONVERSATION_ID, message).await?;
        out.push(DemoEntry::new("User", message));
        out.push(DemoEntry::new("AI", reply.response));
    }

    out.push(DemoEntry::new(
        "Conversation size",
        format!("{} messages", conversation.size(DEMO_CONVERSATION_ID)),
    ));
    Ok(())
}

async fn embeddings(context: &AppContext, out: &mut Vec<DemoEntry>) -> DomainResult<()> {
    let documents = [
        "Java is a popular programming language",
        "Python is great for data science",
        "JavaScript runs in web browsers",
        "The weather is sunny today",
        "Machine learning is a subset of AI",
    ]
    .map(String::from);

    let added = context.embeddings.add_documents(&documents).await?;
    out.push(DemoEntry::new("Documents added", added.to_string()));

    let query = "programming languages";
    let results = context.embeddings.search(query, 3).await?;
    out.push(DemoEntry::new("Query", query));
    for (rank, text) in results.into_iter().enumerate() {
        out.push(DemoEntry::new(format!("{}.", rank + 1), text));
    }
    Ok(())
}

async fn rag(context: &AppContext, out: &mut Vec<DemoEntry>) -> DomainResult<()> {
    let knowledge = [
        "LangChain4j is a Java library for building applications with Large Language Models.",
        "Ollama allows you to run LLMs locally on your machine without internet connection.",
        "RAG (Retrieval Augmented Generation) combines information retrieval with text generation.",
        "Embeddings are vector representations of text that capture semantic meaning.",
        "Spring Boot is a framework that makes it easy to create production-ready applications.",
    ]
    .map(String::from);

    let added = context.embeddings.add_documents(&knowledge).await?;
    out.push(DemoEntry::new("Knowledge base entries added", added.to_string()));

    let question = "What is LangChain4j?";
    let answer = context.rag.answer(question, 2).await?;
    out.push(DemoEntry::new("Question", question));
    out.push(DemoEntry::new("Answer", answer));

    let question = "How can I run LLMs locally?";
    let answer = context.rag.answer_with_sources(question, 2).await?;
    out.push(DemoEntry::new("Question", question));
    out.push(DemoEntry::new("Answer", answer.answer));
    out.push(DemoEntry::new("Sources used", answer.sources.len().to_string()));
    Ok(())
}

async fn ai_services(context: &AppContext, out: &mut Vec<DemoEntry>) -> DomainResult<()> {
    let services = &context.ai_services;

    let sentiment = services
        .analyze_sentiment("This product is amazing! I love it!")
        .await?;
    out.push(DemoEntry::new("Sentiment Analysis", sentiment));

    let summary = services
        .summarize(
            "Artificial intelligence is transforming the world. \
             It helps in healthcare, finance, education, and many other fields. \
             Machine learning, a subset of AI, enables computers to learn from data.",
            20,
        )
        .await?;
    out.push(DemoEntry::new("Summary", summary));

    let translation = services.translate("Hello, how are you?", "Spanish").await?;
    out.push(DemoEntry::new("Translation to Spanish", translation));
    Ok(())
}

async fn tools(context: &AppContext, out: &mut Vec<DemoEntry>) -> DomainResult<()> {
    for question in [
        "What is 25 multiplied by 4?",
        "Calculate the square root of 144",
        "What's the weather in San Francisco?",
    ] {
        let answer = context.tools.chat_with_tools(question).await?;
        out.push(DemoEntry::new("Q", question));
        out.push(DemoEntry::new("A", answer));
    }
    Ok(())
}
