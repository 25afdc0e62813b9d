//! Local command execution for Hermes agents
//!
//! Handles:
//! - Running a program with arguments (no shell)
//! - Capturing stdout and stderr line by line, each line stamped on arrival
//! - Exit code and elapsed time
//! - Rendering the merged output as timestamped `I`/`E` lines

use chrono::{DateTime, Local};
use std::fmt;
use std::io;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

/// Which stream a line was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => write!(f, "I"),
            Stream::Stderr => write!(f, "E"),
        }
    }
}

/// One captured output line; `text` keeps its line terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub time: DateTime<Local>,
    pub stream: Stream,
    pub text: String,
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.stream,
            self.text
        )
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Both streams merged in arrival order
    pub lines: Vec<OutputLine>,
    pub execution_time_ms: u128,
}

impl ExecutionResult {
    /// Everything the program wrote to `stream`, byte for byte
    pub fn text(&self, stream: Stream) -> String {
        self.lines
            .iter()
            .filter(|line| line.stream == stream)
            .map(|line| line.text.as_str())
            .collect()
    }

    pub fn stdout(&self) -> String {
        self.text(Stream::Stdout)
    }

    pub fn stderr(&self) -> String {
        self.text(Stream::Stderr)
    }

    /// Timestamped rendering of the merged output
    pub fn render(&self) -> String {
        render_lines(&self.lines)
    }
}

pub fn render_lines(lines: &[OutputLine]) -> String {
    let mut rendered = String::new();
    for line in lines {
        rendered.push_str(&line.to_string());
        if !line.text.ends_with('\n') {
            rendered.push('\n');
        }
    }
    rendered
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Run `program` with `args` to completion.
    ///
    /// A non-zero exit is reported through `success`/`exit_code`; only a
    /// failure to spawn or to read the pipes is an error.
    pub async fn run<S: AsRef<str>>(program: &str, args: &[S]) -> io::Result<ExecutionResult> {
        let start_time = Instant::now();
        debug!(
            "Executing {} {:?}",
            program,
            args.iter().map(AsRef::as_ref).collect::<Vec<_>>()
        );

        let mut child = AsyncCommand::new(program)
            .args(args.iter().map(AsRef::as_ref))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not captured"))?;

        let (out_lines, err_lines) = tokio::try_join!(
            read_lines(stdout, Stream::Stdout),
            read_lines(stderr, Stream::Stderr)
        )?;
        let status = child.wait().await?;

        let mut lines = out_lines;
        lines.extend(err_lines);
        // stable: lines from one stream keep their order within the same instant
        lines.sort_by_key(|line| line.time);

        let execution_time_ms = start_time.elapsed().as_millis();
        debug!(
            "{} exited with {:?} after {}ms",
            program,
            status.code(),
            execution_time_ms
        );

        Ok(ExecutionResult {
            success: status.success(),
            exit_code: status.code(),
            lines,
            execution_time_ms,
        })
    }
}

async fn read_lines<R>(reader: R, stream: Stream) -> io::Result<Vec<OutputLine>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    loop {
        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        lines.push(OutputLine {
            time: Local::now(),
            stream,
            text: String::from_utf8_lossy(&buf).into_owned(),
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_captures_stdout() {
        let result = CommandExecutor::run("echo", &["Hello", "World"]).await.unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout(), "Hello World\n");
        assert!(result.stderr().is_empty());
        assert!(result.execution_time_ms < 5000);
    }

    #[tokio::test]
    async fn test_failure_keeps_both_streams() {
        let result = CommandExecutor::run("sh", &["-c", "echo out; echo err >&2; exit 3"])
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout(), "out\n");
        assert_eq!(result.stderr(), "err\n");
        assert_eq!(result.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let err = CommandExecutor::run("/nonexistent/program", &[] as &[&str])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_render_marks_streams() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let lines = vec![
            OutputLine {
                time,
                stream: Stream::Stdout,
                text: "started\n".to_string(),
            },
            OutputLine {
                time,
                stream: Stream::Stderr,
                text: "no newline".to_string(),
            },
        ];

        assert_eq!(
            render_lines(&lines),
            "2024-03-09 07:05:01 I started\n2024-03-09 07:05:01 E no newline\n"
        );
    }
}
