//! Task runner backed by an external command such as `php artisan`.
//!
//! The task name is appended to the configured command line and the child
//! is waited on with a timeout. Its output is captured and logged; a
//! non-zero exit status becomes a [`TaskError::Exit`] carrying stderr.

use super::TaskRunner;
use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::{
    io::{self, Read},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, info};
use wait_timeout::ChildExt;

/// Time allowed for a single task before it is killed.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(60);

const SENSITIVE_KEYS: [&str; 7] = [
    "password",
    "token",
    "secret",
    "api_key",
    "apikey",
    "auth",
    "authorization",
];

/// Errors raised while running an external task.
#[derive(Debug, Error, Diagnostic)]
pub enum TaskError {
    /// The configured command line is empty.
    #[error("task command is empty")]
    #[diagnostic(code(hexavel::task::empty_command))]
    EmptyCommand,

    /// The configured command line has unbalanced quotes.
    #[error("task command `{command}` could not be split into arguments")]
    #[diagnostic(code(hexavel::task::invalid_command))]
    InvalidCommand {
        /// The offending command line.
        command: String,
    },

    /// The process could not be started.
    #[error("failed to start task `{task}`")]
    #[diagnostic(code(hexavel::task::spawn))]
    Spawn {
        /// Task name.
        task: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Waiting on the process failed.
    #[error("I/O error while running task `{task}`")]
    #[diagnostic(code(hexavel::task::io))]
    Io {
        /// Task name.
        task: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The process did not finish in time and was killed.
    #[error("task `{task}` timed out after {timeout:?}")]
    #[diagnostic(code(hexavel::task::timeout))]
    Timeout {
        /// Task name.
        task: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// The process exited unsuccessfully.
    #[error("task `{task}` failed with status {}: {stderr}", describe_status(.status))]
    #[diagnostic(code(hexavel::task::exit))]
    Exit {
        /// Task name.
        task: String,
        /// Exit code, `None` when terminated by a signal.
        status: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    status.map_or_else(|| "signal".to_owned(), |code| code.to_string())
}

/// Runs tasks as `<program> <args...> <task>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTaskRunner {
    program: String,
    args: Vec<String>,
    working_dir: Option<Utf8PathBuf>,
    timeout: Duration,
}

impl CommandTaskRunner {
    /// Create a runner for `program` with leading `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    /// Split a shell-style command line such as `php artisan` into a runner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidCommand`] for unbalanced quoting and
    /// [`TaskError::EmptyCommand`] when no program is named.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexavel::hooks::CommandTaskRunner;
    /// let runner = CommandTaskRunner::from_command_line("php artisan --env=testing").unwrap();
    /// assert_eq!(runner.program(), "php");
    /// assert_eq!(runner.args(), ["artisan", "--env=testing"]);
    /// ```
    pub fn from_command_line(command: &str) -> Result<Self, TaskError> {
        let words = shlex::split(command).ok_or_else(|| TaskError::InvalidCommand {
            command: command.to_owned(),
        })?;
        let (program, args) = words.split_first().ok_or(TaskError::EmptyCommand)?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    /// Run tasks from `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Override the per-task timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The program invoked for each task.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments placed before the task name.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command_for(&self, task: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(task)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir.as_std_path());
        }
        cmd
    }

    /// Run `task` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskError`] if the process cannot start, times out or
    /// exits unsuccessfully.
    pub fn run(&self, task: &str) -> Result<(), TaskError> {
        let mut cmd = self.command_for(task);
        log_command(&cmd);
        let mut child = cmd.spawn().map_err(|source| TaskError::Spawn {
            task: task.to_owned(),
            source,
        })?;
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());
        let status = wait_for_exit(&mut child, task, self.timeout)?;
        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);
        if !stdout.trim().is_empty() {
            debug!(task, output = stdout.trim(), "task output");
        }
        if status.success() {
            Ok(())
        } else {
            Err(TaskError::Exit {
                task: task.to_owned(),
                status: status.code(),
                stderr: stderr.trim().to_owned(),
            })
        }
    }
}

impl Default for CommandTaskRunner {
    fn default() -> Self {
        Self::new("php", vec!["artisan".to_owned()])
    }
}

impl TaskRunner for CommandTaskRunner {
    fn call(&mut self, task: &str) -> anyhow::Result<()> {
        Ok(self.run(task)?)
    }
}

type Reader = Option<thread::JoinHandle<String>>;

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Reader {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(err) = pipe.read_to_end(&mut buf) {
                debug!("task output pipe closed early: {err}");
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_reader(reader: Reader) -> String {
    reader
        .map(|handle| {
            handle.join().unwrap_or_else(|err| {
                tracing::warn!("task output reader panicked: {err:?}");
                String::new()
            })
        })
        .unwrap_or_default()
}

fn wait_for_exit(
    child: &mut Child,
    task: &str,
    timeout: Duration,
) -> Result<ExitStatus, TaskError> {
    let io_error = |source| TaskError::Io {
        task: task.to_owned(),
        source,
    };
    if let Some(status) = child.wait_timeout(timeout).map_err(io_error)? {
        return Ok(status);
    }
    if let Err(err) = child.kill()
        && err.kind() != io::ErrorKind::InvalidInput
    {
        return Err(io_error(err));
    }
    if let Err(err) = child.wait() {
        tracing::warn!("failed to reap timed-out task: {err}");
    }
    Err(TaskError::Timeout {
        task: task.to_owned(),
        timeout,
    })
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|candidate| key.eq_ignore_ascii_case(candidate))
}

/// Replace the value of `key=value` arguments whose key looks like a secret.
fn redact_argument(arg: &str) -> String {
    match arg.split_once('=') {
        Some((key, _)) if is_sensitive_key(key.trim().trim_start_matches('-')) => {
            format!("{}=***REDACTED***", key.trim())
        }
        _ => arg.to_owned(),
    }
}

fn log_command(cmd: &Command) {
    let args: Vec<String> = cmd
        .get_args()
        .map(|arg| redact_argument(&arg.to_string_lossy()))
        .collect();
    info!(
        "Running task: {} {}",
        cmd.get_program().to_string_lossy(),
        args.join(" ")
    );
}
