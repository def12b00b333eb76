//! Export of every message of every page conversation.

use std::io::Write;

use crate::domain::{Batch, Conversation, ExportStats, GraphApi, Message, MessagePage, Result};

use super::normalizer::{normalize_message, EscapeMode};
use super::pager::Pager;
use super::renderer::TemplateRenderer;

/// Fields requested for each message.
const MESSAGE_FIELDS: &str = "message,from,created_time";

/// Walk all conversations of `page_id` and render each page of messages.
///
/// # Errors
/// Returns error only if the first conversations page cannot be fetched.
/// Everything after that is logged and skipped.
pub async fn export_messages<A: GraphApi, W: Write + ?Sized>(
    api: &A,
    page_id: &str,
    renderer: &TemplateRenderer,
    out: &mut W,
    escape: EscapeMode,
) -> Result<ExportStats> {
    let mut stats = ExportStats::default();

    let first = api
        .get(&format!("/{page_id}/conversations"), &[])
        .await?;
    let mut conversations = Pager::new(api, "conversations", first);

    loop {
        stats.pages += 1;
        match conversations.decode::<Batch<Conversation>>() {
            Ok(batch) => {
                for conversation in &batch.data {
                    stats.conversations += 1;
                    export_conversation(api, &conversation.id, renderer, out, escape, &mut stats)
                        .await;
                }
            }
            Err(e) => {
                stats.skipped_pages += 1;
                tracing::warn!(page = conversations.number(), error = %e, "Decode conversations failed");
            }
        }

        if !conversations.next_page().await {
            break;
        }
    }

    tracing::info!(
        conversations = stats.conversations,
        messages = stats.records,
        "Messages export finished"
    );
    Ok(stats)
}

/// Render every message page of one conversation.
async fn export_conversation<A: GraphApi, W: Write + ?Sized>(
    api: &A,
    conversation_id: &str,
    renderer: &TemplateRenderer,
    out: &mut W,
    escape: EscapeMode,
    stats: &mut ExportStats,
) {
    let first = match api
        .get(
            &format!("/{conversation_id}/messages"),
            &[("fields", MESSAGE_FIELDS)],
        )
        .await
    {
        Ok(first) => first,
        Err(e) => {
            tracing::warn!(%conversation_id, error = %e, "Fetch messages failed");
            return;
        }
    };
    let mut pager = Pager::new(api, "messages", first);

    loop {
        stats.pages += 1;
        match pager.decode::<Batch<Message>>() {
            Ok(Batch { data: mut messages }) if !messages.is_empty() => {
                for message in &mut messages {
                    normalize_message(message, conversation_id, escape);
                }
                let context = MessagePage {
                    conversation_id,
                    messages: &messages,
                };
                match renderer.render_to(&context, out) {
                    Ok(()) => stats.records += messages.len(),
                    Err(e) => {
                        stats.render_failures += 1;
                        tracing::warn!(%conversation_id, error = %e, "Render template to output failed");
                    }
                }
            }
            Ok(_) => tracing::warn!(%conversation_id, "No messages found"),
            Err(e) => {
                stats.skipped_pages += 1;
                tracing::warn!(%conversation_id, page = pager.number(), error = %e, "Decode messages failed");
            }
        }

        if !pager.next_page().await {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::application::stub::StubApi;

    /// Emits one bracketed line per render.
    fn counting_renderer() -> TemplateRenderer {
        TemplateRenderer::from_source(
            "messages",
            "[{{ conversation_id }}:{% for m in messages %}{{ m.from.name }}={{ m.text }}@{{ m.created_time }};{% endfor %}]\n"
                .to_string(),
        )
        .unwrap()
    }

    fn message(text: &str, name: &str) -> serde_json::Value {
        json!({
            "message": text,
            "from": {"id": "u", "name": name},
            "created_time": "2021-05-01T10:00:00+0000"
        })
    }

    #[tokio::test]
    async fn test_renders_once_per_message_page() {
        let api = StubApi::new()
            .with_path(
                "/page/conversations",
                json!({"data": [{"id": "t_1", "updated_time": "2021-05-01T10:00:00+0000"}]}),
            )
            .with_path(
                "/t_1/messages",
                json!({"data": [message("hi", "Ann")], "paging": {"next": "t_1-p2"}}),
            )
            .with_url("t_1-p2", json!({"data": [message("it's", "Bob")]}));

        let mut out = Vec::new();
        let stats = export_messages(&api, "page", &counting_renderer(), &mut out, EscapeMode::Standard)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "[t_1:Ann=hi@2021-05-01 10:00:00;]\n[t_1:Bob=it\\'s@2021-05-01 10:00:00;]\n"
        );
        assert_eq!(stats.records, 2);
        assert_eq!(stats.conversations, 1);
        assert_eq!(
            api.calls(),
            ["/page/conversations", "/t_1/messages", "t_1-p2"]
        );        let fields = [("fields".to_string(), "message,from,created_time".to_string())];
        assert_eq!(api.params("/t_1/messages"), [fields]);
    }

    #[tokio::test]
    async fn test_skips_page_that_fails_to_decode() {
        let api = StubApi::new()
            .with_path(
                "/page/conversations",
                json!({"data": [{"id": "t_1", "updated_time": ""}]}),
            )
            .with_path(
                "/t_1/messages",
                json!({"data": {"broken": true}, "paging": {"next": "t_1-p2"}}),
            )
            .with_url("t_1-p2", json!({"data": [message("second", "Ann")]}));

        let mut out = Vec::new();
        let stats = export_messages(&api, "page", &counting_renderer(), &mut out, EscapeMode::Standard)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("second"));
        assert_eq!(stats.skipped_pages, 1);
    }

    #[tokio::test]
    async fn test_walks_all_conversation_pages() {
        let api = StubApi::new()
            .with_path(
                "/page/conversations",
                json!({"data": [{"id": "t_1", "updated_time": ""}], "paging": {"next": "conv-p2"}}),
            )
            .with_url(
                "conv-p2",
                json!({"data": [{"id": "t_2", "updated_time": ""}]}),
            )
            .with_path("/t_1/messages", json!({"data": [message("a", "Ann")]}))
            .with_path("/t_2/messages", json!({"data": []}));

        let mut out = Vec::new();
        let stats = export_messages(&api, "page", &counting_renderer(), &mut out, EscapeMode::Standard)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
        assert_eq!(stats.conversations, 2);
        assert_eq!(stats.records, 1);
    }

    #[tokio::test]
    async fn test_missing_conversation_is_skipped() {
        let api = StubApi::new()
            .with_path(
                "/page/conversations",
                json!({"data": [{"id": "t_gone", "updated_time": ""}, {"id": "t_1", "updated_time": ""}]}),
            )
            .with_path("/t_1/messages", json!({"data": [message("ok", "Ann")]}));

        let mut out = Vec::new();
        let stats = export_messages(&api, "page", &counting_renderer(), &mut out, EscapeMode::Standard)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[t_1:Ann=ok@2021-05-01 10:00:00;]\n");
        assert_eq!(stats.conversations, 2);
    }

    #[tokio::test]
    async fn test_failing_first_page_is_fatal() {
        let api = StubApi::new();
        let mut out = Vec::new();

        let result =
            export_messages(&api, "page", &counting_renderer(), &mut out, EscapeMode::Standard).await;

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_does_not_stop_export() {
        let renderer = TemplateRenderer::from_source(
            "messages",
            "{% if messages[0].text == 'bad' %}{{ nosuchfunc() }}{% endif %}{{ conversation_id }}\n"
                .to_string(),
        )
        .unwrap();
        let api = StubApi::new()
            .with_path(
                "/page/conversations",
                json!({"data": [{"id": "t_1", "updated_time": ""}, {"id": "t_2", "updated_time": ""}]}),
            )
            .with_path("/t_1/messages", json!({"data": [message("bad", "Ann")]}))
            .with_path("/t_2/messages", json!({"data": [message("good", "Ann")]}));

        let mut out = Vec::new();
        let stats = export_messages(&api, "page", &renderer, &mut out, EscapeMode::Standard)
            .await
            .unwrap();

        assert!(String::from_utf8(out).unwrap().ends_with("t_2\n"));
        assert_eq!(stats.render_failures, 1);
        assert_eq!(stats.records, 1);
    }
}
