//! Reply rendering
//!
//! Turns listings and pages into reply text and button rows.

use crate::error::handlers::human_size;
use crate::navigate::{FolderAddress, Page, page_count};
use crate::protocol::commands::{CB_FILES, CB_FOLDERS, CB_GET, CB_GET_FOLDER, callback_data};
use crate::storage::Roots;
use crate::transfer::StoredFile;
use crate::transport::{Button, Reply};

/// Transports cap button payloads; longer entries stay text-only
pub const MAX_CALLBACK_DATA: usize = 64;

/// Entries shown by a folder listing before it is cut short
const MAX_LISTED_ENTRIES: usize = 50;

pub fn welcome(roots: &Roots) -> Reply {
    Reply::text(format!(
        "👋 Hey there!\n\n\
         📩 Send or forward me any media (photos, videos, documents...) and I'll save it into:\n   {}\n\n\
         📤 Ask for anything under:\n   {}\n\n\
         {}\n\n\
         🔒 Only you can use this bot.",
        roots.download().display(),
        roots.upload().display(),
        help_text()
    ))
}

pub fn help() -> Reply {
    Reply::text(help_text())
}

fn help_text() -> String {
    [
        "Commands:",
        "/files [page] - browse all files",
        "/folders [page] - browse all folders",
        "/get <file> - send a file",
        "/getfolder <folder> - send every file in a folder",
        "/ls <folder> - list the files in a folder",
        "Folders are looked up under uploads; add -d (e.g. photos-d, .-d) for downloads.",
    ]
    .join("\n")
}

pub fn usage(form: &str) -> Reply {
    Reply::text(format!("Usage: {form}"))
}

pub fn unknown(input: &str) -> Reply {
    Reply::text(format!("I don't understand {input:?}.\n\n{}", help_text()))
}

pub fn files_page(page: &Page<StoredFile>, total: usize, page_size: usize) -> Reply {
    if total == 0 {
        return Reply::text("No files yet.");
    }

    let mut text = format!(
        "Files (page {}/{}, {} total):",
        page.index.saturating_add(1),
        page_count(total, page_size),
        total
    );
    let mut buttons = Vec::new();
    for file in &page.items {
        text.push_str(&format!(
            "\n{} {} ({}, {})",
            file.category.emoji(),
            file.rel_path,
            human_size(file.size),
            file.root
        ));
        push_entry_button(&mut buttons, &file.rel_path, CB_GET, &file.rel_path);
    }

    push_nav_row(&mut buttons, page, CB_FILES);
    Reply { text, buttons }
}

pub fn folders_page(page: &Page<FolderAddress>, total: usize, page_size: usize) -> Reply {
    let mut text = format!(
        "Folders (page {}/{}, {} total):",
        page.index.saturating_add(1),
        page_count(total, page_size),
        total
    );
    let mut buttons = Vec::new();
    for folder in &page.items {
        text.push_str(&format!("\n📁 {}  ({})", folder.label(), folder));
        push_entry_button(&mut buttons, &folder.label(), CB_GET_FOLDER, &folder.to_payload());
    }

    push_nav_row(&mut buttons, page, CB_FOLDERS);
    Reply { text, buttons }
}

pub fn folder_listing(folder: &FolderAddress, files: &[StoredFile]) -> Reply {
    if files.is_empty() {
        return Reply::text(format!("📁 {} has no files.", folder.label()));
    }

    let mut text = format!("📁 {} ({} files):", folder.label(), files.len());
    for file in files.iter().take(MAX_LISTED_ENTRIES) {
        text.push_str(&format!(
            "\n{} {} ({})",
            file.category.emoji(),
            file.file_name(),
            human_size(file.size)
        ));
    }
    if files.len() > MAX_LISTED_ENTRIES {
        text.push_str(&format!("\n... and {} more", files.len() - MAX_LISTED_ENTRIES));
    }

    let mut buttons = Vec::new();
    push_entry_button(&mut buttons, "Send all", CB_GET_FOLDER, &folder.to_payload());
    Reply { text, buttons }
}

fn push_entry_button(buttons: &mut Vec<Vec<Button>>, label: &str, kind: &str, value: &str) {
    let data = callback_data(kind, value);
    if data.len() <= MAX_CALLBACK_DATA {
        buttons.push(vec![Button::new(label, data)]);
    }
}

fn push_nav_row<T>(buttons: &mut Vec<Vec<Button>>, page: &Page<T>, kind: &str) {
    let mut row = Vec::new();
    if page.has_previous {
        row.push(Button::new("◀ Previous", callback_data(kind, page.index - 1)));
    }
    if page.has_next {
        row.push(Button::new("Next ▶", callback_data(kind, page.index.saturating_add(1))));
    }
    if !row.is_empty() {
        buttons.push(row);
    }
}
