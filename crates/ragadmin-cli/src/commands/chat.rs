use crate::context::AppContext;
use anyhow::{Result, bail};
use futures::StreamExt;
use ragadmin_core::backend::ChatResponse;
use ragadmin_core::session::{DEFAULT_SESSION_TITLE, Message, MessageRole};
use std::io::Write;

pub async fn show(app: &AppContext) -> Result<()> {
    let controller = &app.controller;
    controller.settle_route().await?;

    let Some(session_id) = controller.active_session_id().await else {
        bail!("No chat to show");
    };
    let title = controller
        .store()
        .get(&session_id)
        .await
        .map(|session| session.title)
        .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());

    println!("💬 {} ({})", title, session_id);
    if let Some(welcome) = controller.welcome().await {
        println!("{}", welcome);
        return Ok(());
    }
    for message in controller.transcript().await.values() {
        println!("[{}] {}", message.role, message.content);
    }
    Ok(())
}

pub async fn send(app: &AppContext, model: Option<String>, text: &str) -> Result<()> {
    let controller = &app.controller;
    controller.settle_route().await?;
    controller.refresh_models().await;
    if let Some(model) = model {
        controller.select_model(model).await;
    }

    let mut transcript = controller.transcript().await;
    transcript.push(stamped(MessageRole::User, text));

    let exchange = controller.send(&transcript.to_ordered_vec()).await;
    let Some(session_id) = exchange.session_id else {
        bail!("No active chat to send from");
    };

    let reply = print_reply(exchange.response).await?;
    transcript.push(stamped(MessageRole::Assistant, &reply));

    let saved = controller.on_exchange_complete(&session_id, transcript).await;
    report_saved(&session_id, saved)
}

/// Reports how the exchange was recorded. A failed write or an unknown chat
/// id only warns; the reply was already shown.
fn report_saved(session_id: &str, saved: ragadmin_core::Result<String>) -> Result<()> {
    match saved {
        Ok(title) => tracing::debug!("[Send] Chat {} saved as '{}'", session_id, title),
        Err(e) if e.is_persistence() => {
            eprintln!("⚠️  Reply could not be saved: {}", e);
        }
        Err(e) if e.is_not_found() => {
            eprintln!("⚠️  Chat {} is not stored, reply was not saved", session_id);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Streams the reply body to stdout and returns the full text.
///
/// An interrupted stream keeps what arrived so far.
async fn print_reply(response: ChatResponse) -> Result<String> {
    let mut body = response.into_body();
    let mut stdout = std::io::stdout();
    let mut reply = String::new();

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(text) => {
                write!(stdout, "{}", text)?;
                stdout.flush()?;
                reply.push_str(&text);
            }
            Err(e) => {
                tracing::warn!("[Send] Reply stream interrupted: {}", e);
                break;
            }
        }
    }
    writeln!(stdout)?;
    Ok(reply)
}

/// Builds a message the way the chat widget stamps them.
fn stamped(role: MessageRole, content: &str) -> Message {
    let now = chrono::Utc::now().timestamp_millis();
    Message::new(uuid::Uuid::new_v4().to_string(), role, content)
        .with_extra("createAt", serde_json::json!(now))
        .with_extra("updateAt", serde_json::json!(now))
}
