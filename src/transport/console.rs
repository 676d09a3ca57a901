use std::io::{BufRead, Write};

use crate::commands::Reply;
use crate::error::Result;
use crate::transport::{Inbound, Transport};

/// Line-based transport: one command per input line, replies written to
/// the output. Everything is attributed to a single account.
pub struct ConsoleTransport<R, W> {
    input: R,
    output: W,
    account_id: i64,
    line_no: i64,
}

impl<R: BufRead, W: Write> ConsoleTransport<R, W> {
    pub fn new(input: R, output: W, account_id: i64) -> Self {
        Self {
            input,
            output,
            account_id,
            line_no: 0,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Transport for ConsoleTransport<R, W> {
    fn receive(&mut self) -> Result<Option<Vec<Inbound>>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let text = line.trim();
        if text.is_empty() {
            return Ok(Some(Vec::new()));
        }
        // The leading slash is optional when typing locally.
        let text = if text.starts_with('/') {
            text.to_string()
        } else {
            format!("/{text}")
        };
        Ok(Some(vec![Inbound {
            chat_id: self.account_id,
            message_id: Some(self.line_no),
            account_id: self.account_id,
            text,
        }]))
    }

    fn send(&mut self, _to: &Inbound, reply: &Reply) -> Result<()> {
        match reply {
            Reply::Text(text) => writeln!(self.output, "{}", text.trim_end())?,
            Reply::Photo { file_name, bytes } => {
                writeln!(self.output, "[photo {file_name}, {} bytes]", bytes.len())?
            }
        }
        self.output.flush()?;
        Ok(())
    }
}
