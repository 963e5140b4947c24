//! Module `commands`
//!
//! Parses chat text and button payloads into the commands the relay
//! understands.

use crate::navigate::FolderAddress;

/// Represents a command received from the user.
///
/// Page numbers are zero-based indexes; text commands take one-based
/// page numbers and are converted here.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Files(usize),     // Browse all files
    Folders(usize),   // Browse all folders
    Get(String),      // Send one file
    GetFolder(String), // Send every file of a folder
    SendFolder(FolderAddress), // Folder already resolved by a button
    Ls(String),       // Show the files of a folder
    Usage(&'static str),
    Unknown(String),
}

/// Button payload prefixes
pub const CB_FILES: &str = "files";
pub const CB_FOLDERS: &str = "folders";
pub const CB_GET: &str = "get";
pub const CB_GET_FOLDER: &str = "getfolder";
pub const CB_LS: &str = "ls";

/// Parses a text message into a `Command`.
///
/// Accepts an optional `@botname` suffix on the command word.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let word = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();

    let Some(word) = word.strip_prefix('/') else {
        return Command::Unknown(trimmed.to_string());
    };
    let cmd = word.split('@').next().unwrap_or("").to_ascii_lowercase();

    match cmd.as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "files" => Command::Files(page_from_text(arg)),
        "folders" => Command::Folders(page_from_text(arg)),
        "get" if !arg.is_empty() => Command::Get(arg.to_string()),
        "get" => Command::Usage("/get <file>"),
        "getfolder" if !arg.is_empty() => Command::GetFolder(arg.to_string()),
        "getfolder" => Command::Usage("/getfolder <folder>"),
        "ls" if arg.is_empty() => Command::Ls(".".to_string()),
        "ls" => Command::Ls(arg.to_string()),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Parses the data attached to a pressed button.
pub fn parse_callback(data: &str) -> Command {
    let (kind, value) = data.split_once(':').unwrap_or((data, ""));

    match kind {
        CB_FILES => Command::Files(value.parse().unwrap_or(0)),
        CB_FOLDERS => Command::Folders(value.parse().unwrap_or(0)),
        CB_GET if !value.is_empty() => Command::Get(value.to_string()),
        CB_GET_FOLDER => match FolderAddress::from_payload(value) {
            Some(folder) => Command::SendFolder(folder),
            None => Command::GetFolder(value.to_string()),
        },
        CB_LS => Command::Ls(value.to_string()),
        _ => Command::Unknown(data.to_string()),
    }
}

/// Builds the payload for a button
pub fn callback_data(kind: &str, value: impl std::fmt::Display) -> String {
    format!("{kind}:{value}")
}

fn page_from_text(arg: &str) -> usize {
    arg.parse::<usize>().map(|n| n.saturating_sub(1)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_commands() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/files"), Command::Files(0));
        assert_eq!(parse_command("/files 3"), Command::Files(2));
        assert_eq!(parse_command("/Folders@relay_bot 2"), Command::Folders(1));
        assert_eq!(
            parse_command("/get  My Photo.jpg "),
            Command::Get("My Photo.jpg".into())
        );
        assert_eq!(parse_command("/get"), Command::Usage("/get <file>"));
        assert_eq!(parse_command("/ls"), Command::Ls(".".into()));
        assert_eq!(parse_command("hello"), Command::Unknown("hello".into()));
    }

    #[test]
    fn parses_button_payloads() {
        assert_eq!(parse_callback("files:2"), Command::Files(2));
        assert_eq!(parse_callback("folders:x"), Command::Folders(0));
        assert_eq!(
            parse_callback("getfolder:trips-d"),
            Command::GetFolder("trips-d".into())
        );
        assert_eq!(parse_callback("get:a:b.txt"), Command::Get("a:b.txt".into()));
        assert_eq!(parse_callback("bogus"), Command::Unknown("bogus".into()));
    }

    #[test]
    fn folder_buttons_carry_their_root() {
        use crate::storage::Root;

        let literal = FolderAddress::new(Root::Upload, "build-d");
        assert_eq!(
            parse_callback(&callback_data(CB_GET_FOLDER, literal.to_payload())),
            Command::SendFolder(literal)
        );
        assert_eq!(
            parse_callback("getfolder:d:"),
            Command::SendFolder(FolderAddress::root_of(Root::Download))
        );
    }

    #[test]
    fn callback_data_round_trips() {
        assert_eq!(
            parse_callback(&callback_data(CB_GET_FOLDER, ".-d")),
            Command::GetFolder(".-d".into())
        );
    }
}
