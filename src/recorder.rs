//! Local copy of every transmitted message.

use crate::error::{Result, StreamError};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Output file, truncated on creation and appended to one line per message.
pub struct Recorder {
    file: File,
    path: PathBuf,
}

impl Recorder {
    pub async fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .await
            .map_err(|source| StreamError::Record {
                path: path.clone(),
                source,
            })?;
        tracing::info!("Opened for writing: {}", path.display());
        Ok(Self { file, path })
    }

    /// Write `message` as a bytes literal plus a newline, flushed immediately.
    pub async fn append(&mut self, message: &[u8]) -> Result<()> {
        let mut line = bytes_literal(message);
        line.push('\n');
        self.write(line.as_bytes()).await
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let result = async {
            self.file.write_all(bytes).await?;
            self.file.flush().await
        }
        .await;
        result.map_err(|source| StreamError::Record {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render bytes as a literal, e.g. `b'[Afghanistan, 2015]'`.
///
/// Printable ASCII is kept; `\\`, the quote and `\t`/`\n`/`\r` are escaped,
/// everything else becomes `\xNN`. Double quotes delimit the literal when the
/// bytes contain a single quote and no double quote.
pub fn bytes_literal(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote as char);
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            _ if byte == quote => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push(quote as char);
    out
}
