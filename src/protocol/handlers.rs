//! Command handlers
//!
//! Executes parsed commands against the namespace and the egress
//! dispatcher. Lookup and transfer failures become reply text; only a
//! failing transport reply is returned as an error.

use log::info;

use crate::error::RelayError;
use crate::error::handlers::{handle_error, user_message};
use crate::navigate::{FolderAddress, paginate};
use crate::protocol::commands::Command;
use crate::protocol::responses;
use crate::session::Relay;
use crate::transfer::TransferOutcome;
use crate::transport::{ChatId, Reply};

/// Dispatches a command to its handler. `None` means the sent file itself
/// is the answer.
pub async fn handle_command(
    relay: &Relay,
    chat: ChatId,
    command: Command,
) -> Result<Option<Reply>, RelayError> {
    let reply = match command {
        Command::Start => responses::welcome(relay.namespace().roots()),
        Command::Help => responses::help(),
        Command::Usage(form) => responses::usage(form),
        Command::Unknown(input) => responses::unknown(&input),
        Command::Files(page) => handle_files(relay, page).await,
        Command::Folders(page) => handle_folders(relay, page).await,
        Command::Ls(token) => handle_ls(relay, &token).await,
        Command::Get(token) => return Ok(handle_get(relay, chat, &token).await),
        Command::GetFolder(token) => handle_get_folder(relay, chat, &token).await?,
        Command::SendFolder(folder) => send_folder(relay, chat, folder).await?,
    };
    Ok(Some(reply))
}

async fn handle_files(relay: &Relay, page_index: usize) -> Reply {
    let page_size = relay.config().page_size;
    let files = relay.namespace().list_all_files().await;
    let page = paginate(&files, page_index, page_size);
    responses::files_page(&page, files.len(), page_size)
}

async fn handle_folders(relay: &Relay, page_index: usize) -> Reply {
    let page_size = relay.config().page_size;
    let folders = relay.namespace().list_all_folders().await;
    let page = paginate(&folders, page_index, page_size);
    responses::folders_page(&page, folders.len(), page_size)
}

async fn handle_ls(relay: &Relay, token: &str) -> Reply {
    let folder = match relay.namespace().find_folder(token).await {
        Ok(folder) => folder,
        Err(e) => return failure_reply(RelayError::from(e)),
    };

    match relay.namespace().list_folder(&folder).await {
        Ok(files) => responses::folder_listing(&folder, &files),
        Err(e) => failure_reply(RelayError::from(e)),
    }
}

async fn handle_get(relay: &Relay, chat: ChatId, token: &str) -> Option<Reply> {
    let file = match relay.namespace().find_file(token).await {
        Ok(file) => file,
        Err(e) => return Some(failure_reply(RelayError::from(e))),
    };

    match relay
        .egress()
        .send_file(relay.transport(), chat, &file)
        .await
    {
        TransferOutcome::Sent { .. } => None,
        failed => Some(Reply::text(failed.to_string())),
    }
}

async fn handle_get_folder(
    relay: &Relay,
    chat: ChatId,
    token: &str,
) -> Result<Reply, RelayError> {
    let folder = match relay.namespace().find_folder(token).await {
        Ok(folder) => folder,
        Err(e) => return Ok(failure_reply(RelayError::from(e))),
    };
    send_folder(relay, chat, folder).await
}

async fn send_folder(
    relay: &Relay,
    chat: ChatId,
    folder: FolderAddress,
) -> Result<Reply, RelayError> {
    info!("Sending folder {}", folder);
    relay
        .reply(chat, Reply::text(format!("📦 Sending {}...", folder.label())))
        .await?;

    let reply = match relay
        .egress()
        .send_folder(relay.transport(), relay.namespace(), chat, &folder)
        .await
    {
        Ok(report) => Reply::text(report.to_string()),
        Err(e) => failure_reply(RelayError::from(e)),
    };
    Ok(reply)
}

fn failure_reply(err: RelayError) -> Reply {
    handle_error(&err);
    Reply::text(user_message(&err))
}
