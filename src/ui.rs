// UI layer: the numbered main menu and the six actions it dispatches to.
// Each action is a short, sequential series of calls on the resource
// client; results are printed through the `Terminal` seam.

use crate::api::{ApiClient, AssistantRecord, FileRecord, FileUpload, ResourceClient};
use crate::terminal::{ConsoleTerminal, Terminal, Tone};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::path::Path;

/// Purpose tag attached to every file this tool creates or lists.
pub const FILE_PURPOSE: &str = "assistants";

/// Literal the operator must type before a bulk delete goes ahead.
pub const DELETE_ALL_CONFIRMATION: &str = "YES";

const MENU: [&str; 9] = [
    "",
    "== Assistants file utility ==",
    "[1] Upload file",
    "[2] List all files",
    "[3] List all files and delete one",
    "[4] Delete all assistant files (confirmation required)",
    "[5] List all assistants",
    "[6] List all assistants and delete one",
    "[0] Exit",
];

/// Main interactive menu on the real console. Blocks until the operator
/// chooses "Exit".
pub fn main_menu(api: ApiClient) -> Result<()> {
    Menu::new(api, ConsoleTerminal::new()).run()
}

/// Menu controller. Owns the authenticated client and the terminal it
/// talks to.
pub struct Menu<C, T> {
    client: C,
    term: T,
}

impl<C: ResourceClient, T: Terminal> Menu<C, T> {
    pub fn new(client: C, term: T) -> Self {
        Menu { client, term }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    /// Render the menu, read a choice and dispatch, until "0" is entered.
    pub fn run(&mut self) -> Result<()> {
        loop {
            for line in MENU {
                self.term.print(line);
            }
            let choice = self.term.prompt("Enter your choice")?;

            match choice.as_str() {
                "1" => self.upload_file()?,
                "2" => self.list_files()?,
                "3" => self.list_and_delete_file()?,
                "4" => self.delete_all_files()?,
                "5" => {
                    self.list_assistants()?;
                }
                "6" => self.list_and_delete_assistant()?,
                "0" => break,
                _ => self
                    .term
                    .print_toned(Tone::Error, "Invalid choice. Please try again."),
            }
        }
        Ok(())
    }

    /// Ask for a local path and upload it. A path that cannot be opened is
    /// reported and never reaches the client.
    pub fn upload_file(&mut self) -> Result<()> {
        let input = self.term.prompt("Enter the filename to upload")?;
        let path = Path::new(input.trim());

        let contents = match open_regular_file(path) {
            Some(file) => file,
            None => {
                tracing::debug!(path = %path.display(), "upload path not readable");
                self.term.print_toned(
                    Tone::Error,
                    "File not found. Please make sure the filename and path are correct.",
                );
                return Ok(());
            }
        };

        let upload = FileUpload {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.trim().to_string()),
            purpose: FILE_PURPOSE.to_string(),
            contents,
        };

        let client = &self.client;
        let record = self
            .term
            .working("Uploading...", || client.create_file(upload))
            .context("Failed to upload file")?;
        tracing::info!(id = %record.id, filename = %record.filename, "file uploaded");
        self.term.print_toned(
            Tone::Success,
            &format!("File uploaded successfully: {} [{}]", record.filename, record.id),
        );
        Ok(())
    }

    pub fn list_files(&mut self) -> Result<()> {
        let files = self.fetch_files()?;
        if files.is_empty() {
            self.term.print("No files found.");
            return Ok(());
        }
        for file in &files {
            self.term.print(&format!(
                "{} [{}], Created: {}",
                file.filename,
                file.id,
                format_created(file.created_at)
            ));
        }
        Ok(())
    }

    /// Numbered listing with a delete prompt. Repeats with a fresh listing
    /// after every deletion; any invalid selection returns to the menu.
    pub fn list_and_delete_file(&mut self) -> Result<()> {
        loop {
            let files = self.fetch_files()?;
            if files.is_empty() {
                self.term.print("No files found.");
                return Ok(());
            }
            for (i, file) in files.iter().enumerate() {
                self.term.print(&format!(
                    "[{}] {} [{}], Created: {}",
                    i + 1,
                    file.filename,
                    file.id,
                    format_created(file.created_at)
                ));
            }

            let choice = self
                .term
                .prompt("Enter a file number to delete, or any other input to return to menu")?;
            let Some(index) = parse_selection(&choice, files.len()) else {
                return Ok(());
            };

            let selected = &files[index];
            if self.remove_file(selected)? {
                self.term
                    .print_toned(Tone::Success, &format!("File deleted: {}", selected.filename));
            } else {
                self.term.print_toned(
                    Tone::Warning,
                    &format!("File was not deleted: {}", selected.filename),
                );
            }
        }
    }

    /// Delete every file with the purpose tag, but only after the exact
    /// confirmation literal.
    pub fn delete_all_files(&mut self) -> Result<()> {
        self.term.print_toned(
            Tone::Warning,
            &format!("This will delete all OpenAI files with purpose '{}'.", FILE_PURPOSE),
        );
        let confirmation = self
            .term
            .prompt(&format!("Type '{}' to confirm", DELETE_ALL_CONFIRMATION))?;
        if confirmation != DELETE_ALL_CONFIRMATION {
            self.term.print("Operation cancelled.");
            return Ok(());
        }

        let files = self.fetch_files()?;
        let mut removed = 0;
        for file in &files {
            if self.remove_file(file)? {
                removed += 1;
            } else {
                self.term.print_toned(
                    Tone::Warning,
                    &format!("File was not deleted: {}", file.filename),
                );
            }
        }
        self.term.print_toned(
            Tone::Success,
            &format!(
                "All files with purpose '{}' have been deleted. ({} removed)",
                FILE_PURPOSE, removed
            ),
        );
        Ok(())
    }

    /// Print every assistant and hand the listing back so the delete flow
    /// can select from exactly what was shown.
    pub fn list_assistants(&mut self) -> Result<Vec<AssistantRecord>> {
        let client = &self.client;
        let assistants = self
            .term
            .working("Fetching assistants...", || client.list_assistants())
            .context("Failed to list assistants")?;
        if assistants.is_empty() {
            self.term.print("No assistants found.");
            return Ok(assistants);
        }
        for (i, assistant) in assistants.iter().enumerate() {
            self.term.print(&format!(
                "[{}] {} [{}], Created: {}",
                i + 1,
                assistant.name.as_deref().unwrap_or(""),
                assistant.id,
                format_created(assistant.created_at)
            ));
            self.term.print(&format!(
                "Instructions: {}",
                assistant.instructions.as_deref().unwrap_or("")
            ));
        }
        Ok(assistants)
    }

    /// Single pass: list once, delete at most one assistant.
    pub fn list_and_delete_assistant(&mut self) -> Result<()> {
        let assistants = self.list_assistants()?;
        if assistants.is_empty() {
            return Ok(());
        }

        let choice = self
            .term
            .prompt("Enter a number to delete, or enter anything else to go back.")?;
        let Some(index) = parse_selection(&choice, assistants.len()) else {
            return Ok(());
        };

        let selected = &assistants[index];
        let name = selected.name.as_deref().unwrap_or("");
        let client = &self.client;
        let deletion = self
            .term
            .working("Deleting...", || client.delete_assistant(&selected.id))
            .with_context(|| format!("Failed to delete assistant {}", selected.id))?;
        if deletion.deleted {
            tracing::info!(id = %selected.id, "assistant deleted");
            self.term
                .print_toned(Tone::Success, &format!("Deleted assistant: {}", name));
        } else {
            tracing::warn!(id = %selected.id, "service did not confirm assistant deletion");
            self.term
                .print_toned(Tone::Warning, &format!("Assistant was not deleted: {}", name));
        }
        Ok(())
    }

    /// Delete one file. `Ok(false)` when the service answered without
    /// confirming the deletion.
    fn remove_file(&self, file: &FileRecord) -> Result<bool> {
        let client = &self.client;
        let deletion = self
            .term
            .working(&format!("Deleting {}...", file.filename), || {
                client.delete_file(&file.id)
            })
            .with_context(|| format!("Failed to delete file {}", file.id))?;
        if deletion.deleted {
            tracing::info!(id = %file.id, "file deleted");
        } else {
            tracing::warn!(id = %file.id, "service did not confirm file deletion");
        }
        Ok(deletion.deleted)
    }

    fn fetch_files(&self) -> Result<Vec<FileRecord>> {
        let client = &self.client;
        self.term
            .working("Fetching files...", || client.list_files(FILE_PURPOSE))
            .context("Failed to list files")
    }
}

/// Open `path` for reading, rejecting directories. `None` means the
/// operator should be told the file was not found.
fn open_regular_file(path: &Path) -> Option<File> {
    let file = File::open(path).ok()?;
    match file.metadata() {
        Ok(meta) if meta.is_file() => Some(file),
        _ => None,
    }
}

/// Map operator input to a 0-based index into a listing of `len` items.
/// Only a plain positive integer in `1..=len`, with no surrounding
/// whitespace, selects anything.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = input.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// Render a Unix timestamp as a UTC calendar date (`YYYY-MM-DD`).
pub fn format_created(created_at: i64) -> String {
    DateTime::<Utc>::from_timestamp(created_at, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| created_at.to_string())
}
