//! Export of every user that has talked to the page.

use std::io::Write;

use crate::domain::{
    AppError, Batch, Conversation, ExportStats, GraphApi, PageIdentity, Participants, Result, User,
    UserPage,
};

use super::normalizer::display_time_or_now;
use super::pager::Pager;
use super::renderer::TemplateRenderer;

/// Participants of a conversation minus the page itself, stamped with the
/// conversation's last update as their last send time.
#[must_use]
pub fn collect_senders(participants: Vec<User>, page_id: &str, conversation: &Conversation) -> Vec<User> {
    let last_send_time = display_time_or_now(&conversation.updated_time, &conversation.id);
    participants
        .into_iter()
        .filter(|user| user.id != page_id)
        .map(|mut user| {
            user.last_send_time.clone_from(&last_send_time);
            user
        })
        .collect()
}

/// Walk all conversations of `page_id` and render the senders of each
/// conversation page.
///
/// # Errors
/// Returns error if the page identity or the first conversations page
/// cannot be fetched.
pub async fn export_users<A: GraphApi, W: Write + ?Sized>(
    api: &A,
    page_id: &str,
    renderer: &TemplateRenderer,
    out: &mut W,
) -> Result<ExportStats> {
    let mut stats = ExportStats::default();

    let me: PageIdentity = serde_json::from_value(api.get("/me", &[("fields", "id,name")]).await?)
        .map_err(AppError::json_parse)?;
    tracing::info!(id = %me.id, name = %me.name, "Exporting users of page");

    let first = api
        .get(&format!("/{page_id}/conversations"), &[])
        .await?;
    let mut conversations = Pager::new(api, "conversations", first);

    loop {
        stats.pages += 1;
        match conversations.decode::<Batch<Conversation>>() {
            Ok(batch) => {
                let mut senders = Vec::new();
                for conversation in &batch.data {
                    stats.conversations += 1;
                    if let Some(participants) = fetch_participants(api, &conversation.id).await {
                        senders.extend(collect_senders(participants, &me.id, conversation));
                    }
                }

                if !senders.is_empty() {
                    match renderer.render_to(&UserPage { users: &senders }, out) {
                        Ok(()) => stats.records += senders.len(),
                        Err(e) => {
                            stats.render_failures += 1;
                            tracing::warn!(page = conversations.number(), error = %e, "Render template to output failed");
                        }
                    }
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
        users = stats.records,
        "Users export finished"
    );
    Ok(stats)
}

/// Participants of one conversation; failures are logged and yield `None`.
async fn fetch_participants<A: GraphApi>(api: &A, conversation_id: &str) -> Option<Vec<User>> {
    let body = match api
        .get(&format!("/{conversation_id}"), &[("fields", "participants")])
        .await
    {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(%conversation_id, error = %e, "Fetch participants failed");
            return None;
        }
    };

    match serde_json::from_value::<Participants>(body) {
        Ok(participants) => Some(participants.into_users()),
        Err(e) => {
            tracing::warn!(%conversation_id, error = %e, "Decode participants failed");
            None
        }
    }
}
