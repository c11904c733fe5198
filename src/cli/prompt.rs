//! Line-oriented prompts

use std::io;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

/// Asks questions on a writer and reads one-line answers from a reader
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl Prompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Prints `label` and returns the next input line without its line ending.
    pub async fn ask(&mut self, label: &str) -> io::Result<String> {
        self.writer.write_all(label.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Input closed while waiting for an answer",
            ));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Writes one line of output.
    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}
