//! Subcommand handlers.
//!
//! Handlers translate one parsed command into note store calls and write
//! human output to `out`. Storage failures arrive as store notices, which
//! the caller reports after the handler returns.

use super::args::{Commands, SyncCommands};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use stickynotes_core::{
    today_export_file_name, Clock, Note, NoteColor, NotePatch, NoteRepository, NoteStore,
    StubSyncProvider, SyncProvider,
};

const PREVIEW_CHARS: usize = 60;

pub fn dispatch<R: NoteRepository, C: Clock>(
    command: &Commands,
    store: &mut NoteStore<R, C>,
    sync: &StubSyncProvider,
    out: &mut impl Write,
) -> Result<()> {
    info!("event=cli_command module=cli status=start command={}", command_name(command));
    match command {
        Commands::Add { content, color } => handle_add(store, content, *color, out),
        Commands::List { search, json } => handle_list(store, search, *json, out),
        Commands::Edit { id, content, color } => {
            handle_edit(store, id, content.as_deref(), *color, out)
        }
        Commands::Delete { id } => handle_delete(store, id, out),
        Commands::Move { from, to, search } => handle_move(store, *from, *to, search, out),
        Commands::Import { file } => handle_import(store, file),
        Commands::Export { out: path } => handle_export(store, path.as_deref(), out),
        Commands::Clear { yes } => handle_clear(store, *yes, out),
        Commands::Sync { command } => handle_sync(store, sync, command, out),
    }
}

fn handle_add<R: NoteRepository, C: Clock>(
    store: &mut NoteStore<R, C>,
    content: &str,
    color: Option<NoteColor>,
    out: &mut impl Write,
) -> Result<()> {
    let color = color.unwrap_or_else(|| store.default_color());
    let note = store.create(content, color);
    writeln!(out, "{}", note.id)?;
    Ok(())
}

fn handle_list<R: NoteRepository, C: Clock>(
    store: &NoteStore<R, C>,
    search: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let notes = store.search(search);
    if json {
        serde_json_pretty(&notes, out)?;
        return Ok(());
    }
    if notes.is_empty() {
        writeln!(out, "No notes. Create one with `stickynotes add`.")?;
        return Ok(());
    }
    for (view_index, note) in notes.iter().enumerate() {
        writeln!(out, "{}", format_line(view_index, note))?;
    }
    Ok(())
}

fn handle_edit<R: NoteRepository, C: Clock>(
    store: &mut NoteStore<R, C>,
    id: &str,
    content: Option<&str>,
    color: Option<NoteColor>,
    out: &mut impl Write,
) -> Result<()> {
    let patch = NotePatch {
        content: content.map(str::to_string),
        color,
    };
    if patch.is_empty() {
        bail!("nothing to change; pass --content and/or --color");
    }
    match store.update(id, patch) {
        Some(note) => writeln!(out, "{}", format_line(note.position, &note))?,
        None => bail!("no note with id `{id}`"),
    }
    Ok(())
}

fn handle_delete<R: NoteRepository, C: Clock>(
    store: &mut NoteStore<R, C>,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    if !store.delete(id) {
        bail!("no note with id `{id}`");
    }
    writeln!(out, "Deleted {id}")?;
    Ok(())
}

fn handle_move<R: NoteRepository, C: Clock>(
    store: &mut NoteStore<R, C>,
    from: usize,
    to: usize,
    search: &str,
    out: &mut impl Write,
) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if !store.reorder_in_view(search, from, to) {
        bail!("cannot move {from} to {to}: position out of range");
    }
    writeln!(out, "Moved {from} -> {to}")?;
    Ok(())
}

fn handle_import<R: NoteRepository, C: Clock>(
    store: &mut NoteStore<R, C>,
    file: &Path,
) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read import file `{}`", file.display()))?;
    // Rejections are reported through the store's notices.
    let _ = store.import_json(&text);
    Ok(())
}

fn handle_export<R: NoteRepository, C: Clock>(
    store: &NoteStore<R, C>,
    path: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(today_export_file_name()));
    let text = store.export_all().context("failed to serialize notes")?;
    fs::write(&path, text)
        .with_context(|| format!("failed to write export file `{}`", path.display()))?;
    writeln!(out, "Exported {} notes to {}", store.len(), path.display())?;
    Ok(())
}

fn handle_clear<R: NoteRepository, C: Clock>(
    store: &mut NoteStore<R, C>,
    yes: bool,
    out: &mut impl Write,
) -> Result<()> {
    if !yes {
        bail!("refusing to delete all notes without --yes; this cannot be undone");
    }
    let dropped = store.clear();
    writeln!(out, "Deleted {dropped} notes")?;
    Ok(())
}

fn handle_sync<R: NoteRepository, C: Clock>(
    store: &NoteStore<R, C>,
    sync: &StubSyncProvider,
    command: &SyncCommands,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        SyncCommands::Status => {
            let status = sync.status();
            writeln!(out, "{}: {}", status.provider_id, status.message)?;
        }
        SyncCommands::Push => {
            let accepted = sync.push_all(store.notes())?;
            writeln!(out, "Pushed {accepted} notes")?;
        }
    }
    Ok(())
}

fn serde_json_pretty(notes: &[&Note], out: &mut impl Write) -> Result<()> {
    let text = serde_json::to_string_pretty(notes).context("failed to serialize notes")?;
    writeln!(out, "{text}")?;
    Ok(())
}

fn format_line(index: usize, note: &Note) -> String {
    let updated = DateTime::from_timestamp_millis(note.updated_at)
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{index:>3}  {:<6}  {updated}  {}  {}",
        note.color,
        note.id,
        preview(&note.content)
    )
}

fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    let mut text: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
        text.push_str("...");
    }
    if text.is_empty() {
        text.push_str("(empty)");
    }
    text
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::List { .. } => "list",
        Commands::Edit { .. } => "edit",
        Commands::Delete { .. } => "delete",
        Commands::Move { .. } => "move",
        Commands::Import { .. } => "import",
        Commands::Export { .. } => "export",
        Commands::Clear { .. } => "clear",
        Commands::Sync { .. } => "sync",
    }
}

#[cfg(test)]
mod tests {
    use super::{dispatch, preview};
    use crate::cli::args::{Commands, SyncCommands};
    use stickynotes_core::{
        BlobNoteRepository, InMemoryBlobRepository, ManualClock, NoteColor, NoteStore, Notice,
        StoreOptions, StubSyncProvider,
    };

    type MemoryStore = NoteStore<BlobNoteRepository<InMemoryBlobRepository>, ManualClock>;

    fn store() -> MemoryStore {
        NoteStore::open_with(
            BlobNoteRepository::new(InMemoryBlobRepository::new()),
            ManualClock::new(1_700_000_000_000),
            StoreOptions::default(),
        )
    }

    fn run(store: &mut MemoryStore, command: Commands) -> anyhow::Result<String> {
        let mut out = Vec::new();
        dispatch(&command, store, &StubSyncProvider::new(), &mut out)?;
        Ok(String::from_utf8(out).expect("output is UTF-8"))
    }

    #[test]
    fn add_prints_new_id_and_list_shows_it() {
        let mut store = store();
        let printed = run(
            &mut store,
            Commands::Add {
                content: "buy milk".to_string(),
                color: Some(NoteColor::Green),
            },
        )
        .expect("add should succeed");
        assert_eq!(printed.trim(), store.notes()[0].id);

        let listed = run(
            &mut store,
            Commands::List {
                search: "MILK".to_string(),
                json: false,
            },
        )
        .expect("list should succeed");
        assert!(listed.contains("buy milk"));
        assert!(listed.contains("green"));
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut store = store();
        store.create("keep", NoteColor::Yellow);
        let err = run(&mut store, Commands::Clear { yes: false }).expect_err("must refuse");
        assert!(err.to_string().contains("--yes"));
        assert_eq!(store.len(), 1);

        run(&mut store, Commands::Clear { yes: true }).expect("confirmed clear");
        assert!(store.is_empty());
    }

    #[test]
    fn move_uses_filtered_positions() {
        let mut store = store();
        store.create("apple pie", NoteColor::Yellow);
        store.create("grocery list", NoteColor::Yellow);
        store.create("apple crumble", NoteColor::Yellow);

        run(
            &mut store,
            Commands::Move {
                from: 1,
                to: 0,
                search: "apple".to_string(),
            },
        )
        .expect("move should succeed");
        assert_eq!(store.notes()[0].content, "apple pie");
    }

    #[test]
    fn import_rejection_surfaces_as_notice() {
        let mut store = store();
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(&mut file, b"{\"not\": \"an array\"}").expect("write");

        run(
            &mut store,
            Commands::Import {
                file: file.path().to_path_buf(),
            },
        )
        .expect("import handler reports through notices");
        assert!(matches!(
            store.drain_notices().as_slice(),
            [Notice::ImportRejected { .. }]
        ));
    }

    #[test]
    fn export_writes_requested_file() {
        let mut store = store();
        store.create("exported", NoteColor::Pink);
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.json");

        run(
            &mut store,
            Commands::Export {
                out: Some(path.clone()),
            },
        )
        .expect("export should succeed");
        let written = std::fs::read_to_string(&path).expect("export file exists");
        assert!(written.contains("\"content\": \"exported\""));
    }

    #[test]
    fn sync_push_reports_stub_state() {
        let mut store = store();
        let err = run(
            &mut store,
            Commands::Sync {
                command: SyncCommands::Push,
            },
        )
        .expect_err("stub cannot push");
        assert!(err.to_string().contains("not enabled"));
    }

    #[test]
    fn preview_truncates_and_marks_multiline() {
        assert_eq!(preview(""), "(empty)");
        assert_eq!(preview("one\ntwo"), "one...");
        assert_eq!(preview(&"x".repeat(70)).chars().count(), 63);
    }
}
