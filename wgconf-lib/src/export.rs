use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{info, warn};
use thiserror::Error;

use crate::notice::Notice;

/// File name every exported configuration gets.
pub const EXPORT_FILE_NAME: &str = "wg0.conf";

/// Content type of an exported configuration.
pub const EXPORT_MIME_TYPE: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No configuration to export!")]
    NothingToExport,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

/// A file ready to be handed to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub content: String,
}

/// Something that can deliver a [`Download`] to the operator.
pub trait DownloadSink {
    fn deliver(&mut self, download: Download) -> Result<(), ExportError>;
}

/// Writes downloads into a directory, replacing any file of the same name.
pub struct FileDownload {
    dir: PathBuf,
}

impl FileDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path an exported configuration ends up at.
    pub fn path(&self) -> PathBuf {
        self.dir.join(EXPORT_FILE_NAME)
    }
}

impl DownloadSink for FileDownload {
    fn deliver(&mut self, download: Download) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(download.file_name);
        std::fs::write(&path, download.content.as_bytes())?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Keeps downloads in memory.
#[derive(Debug, Default)]
pub struct MemoryDownload {
    pub downloads: Vec<Download>,
}

impl DownloadSink for MemoryDownload {
    fn deliver(&mut self, download: Download) -> Result<(), ExportError> {
        self.downloads.push(download);
        Ok(())
    }
}

/// Hands the rendered configuration to `sink` as `wg0.conf`.
///
/// The text is passed on unmodified.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] if the text is empty or only whitespace, in
/// which case `sink` is not called. Errors from the sink are passed through.
pub fn export(text: &str, sink: &mut impl DownloadSink) -> Result<Notice, ExportError> {
    if text.trim().is_empty() {
        return Err(ExportError::NothingToExport);
    }
    sink.deliver(Download {
        file_name: EXPORT_FILE_NAME,
        mime_type: EXPORT_MIME_TYPE,
        content: text.to_string(),
    })?;
    Ok(Notice::ConfigurationExported)
}

/// A way of putting text on the operator's clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Pipes the text into an external program such as `wl-copy`, `xclip` or `pbcopy`.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ExportError::ClipboardUnavailable(format!("{}: {}", self.program, e)))?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                // Reap the child before giving up on it.
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(ExportError::ClipboardUnavailable(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}

/// Prints the text so the operator can copy it by hand.
pub struct TerminalClipboard<W> {
    out: W,
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Clipboard for TerminalClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Copies `text` with `primary`, falling back to `fallback` if that fails.
///
/// Returns [`Notice::NothingToCopy`] for empty text, [`Notice::Copied`] with `message`
/// once either mechanism succeeded, and [`Notice::CopyFailed`] when both failed.
pub fn copy(
    text: &str,
    message: &str,
    primary: &mut dyn Clipboard,
    fallback: &mut dyn Clipboard,
) -> Notice {
    if text.is_empty() {
        return Notice::NothingToCopy;
    }
    if let Err(e) = primary.write_text(text) {
        warn!("Clipboard failed, using fallback: {}", e);
        if let Err(e) = fallback.write_text(text) {
            warn!("Fallback clipboard failed: {}", e);
            return Notice::CopyFailed;
        }
    }
    Notice::Copied(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        texts: Vec<String>,
    }

    impl Clipboard for Recording {
        fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
            self.texts.push(text.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl Clipboard for Broken {
        fn write_text(&mut self, _text: &str) -> Result<(), ExportError> {
            Err(ExportError::ClipboardUnavailable("broken".into()))
        }
    }

    #[test]
    fn test_export_empty_is_rejected() {
        let mut sink = MemoryDownload::default();
        assert!(matches!(
            export("  \n\t", &mut sink),
            Err(ExportError::NothingToExport)
        ));
        assert!(matches!(export("", &mut sink), Err(ExportError::NothingToExport)));
        assert!(sink.downloads.is_empty());
    }

    #[test]
    fn test_export_passes_text_verbatim() {
        let mut sink = MemoryDownload::default();
        let text = "[Interface]\nAddress = 10.0.0.1/24\n\n";
        let notice = export(text, &mut sink).unwrap();
        assert_eq!(notice, Notice::ConfigurationExported);
        assert_eq!(
            sink.downloads,
            vec![Download {
                file_name: "wg0.conf",
                mime_type: "text/plain",
                content: text.to_string(),
            }]
        );
    }

    #[test]
    fn test_file_download() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileDownload::new(dir.path().join("out"));
        export("[Interface]\n\n", &mut sink).unwrap();
        assert_eq!(sink.path(), dir.path().join("out").join("wg0.conf"));
        assert_eq!(
            std::fs::read_to_string(sink.path()).unwrap(),
            "[Interface]\n\n"
        );
    }

    #[test]
    fn test_copy_uses_primary() {
        let mut primary = Recording::default();
        let mut fallback = Recording::default();
        let notice = copy("KEY=", "Public key copied!", &mut primary, &mut fallback);
        assert_eq!(notice, Notice::Copied("Public key copied!".into()));
        assert_eq!(primary.texts, vec!["KEY="]);
        assert!(fallback.texts.is_empty());
    }

    #[test]
    fn test_copy_falls_back() {
        let mut fallback = Recording::default();
        let notice = copy("KEY=", "Private key copied!", &mut Broken, &mut fallback);
        assert_eq!(notice, Notice::Copied("Private key copied!".into()));
        assert_eq!(fallback.texts, vec!["KEY="]);
    }

    #[test]
    fn test_copy_both_fail() {
        assert_eq!(copy("KEY=", "copied", &mut Broken, &mut Broken), Notice::CopyFailed);
    }

    #[test]
    fn test_copy_nothing() {
        let mut primary = Recording::default();
        let mut fallback = Recording::default();
        assert_eq!(
            copy("", "copied", &mut primary, &mut fallback),
            Notice::NothingToCopy
        );
        assert!(primary.texts.is_empty());
    }

    #[test]
    fn test_terminal_clipboard() {
        let mut out = Vec::new();
        TerminalClipboard::new(&mut out).write_text("abc").unwrap();
        assert_eq!(out, b"abc\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_program_that_stops_reading() {
        // `true` exits without reading, so writing more than a pipe buffer fails.
        let mut clipboard = CommandClipboard::new("true", vec![]);
        let text = "x".repeat(1 << 20);
        assert!(matches!(clipboard.write_text(&text), Err(ExportError::Io(_))));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let mut clipboard = CommandClipboard::new("wgconf-no-such-clipboard-program", vec![]);
        assert!(matches!(
            clipboard.write_text("x"),
            Err(ExportError::ClipboardUnavailable(_))
        ));
    }
}
