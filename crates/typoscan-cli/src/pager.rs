// Sending the report through a pager when writing to a terminal

use std::env;
use std::io::{self, BufWriter, IsTerminal, StdoutLock, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, warn};

/// Where the report goes: standard output or a pager's input.
pub enum Output {
    Stdout(BufWriter<StdoutLock<'static>>),
    Pager {
        child: Child,
        stdin: BufWriter<ChildStdin>,
    },
}

impl Output {
    /// Standard output, or a pager if stdout is a terminal and the user
    /// did not opt out with `PAGER=cat`.
    ///
    /// `raw_control_chars` tells the pager to pass color escapes through.
    pub fn auto(raw_control_chars: bool) -> Self {
        let stdout = io::stdout();
        if !stdout.is_terminal() {
            return Self::stdout();
        }
        let env_pager = env::var("PAGER").ok();
        let Some(cmdline) = pager_command(env_pager.as_deref(), on_path) else {
            return Self::stdout();
        };
        let vars = pager_env(
            raw_control_chars,
            env::var_os("LESS").is_some(),
            env::var_os("LV").is_some(),
        );
        let spawned = Command::new("sh")
            .arg("-c")
            .arg(&cmdline)
            .envs(vars)
            .stdin(Stdio::piped())
            .spawn();
        match spawned {
            Ok(mut child) => match child.stdin.take() {
                Some(stdin) => {
                    debug!(pager = %cmdline, "started pager");
                    Output::Pager {
                        child,
                        stdin: BufWriter::new(stdin),
                    }
                }
                None => Self::stdout(),
            },
            Err(e) => {
                warn!(pager = %cmdline, error = %e, "cannot start pager");
                Self::stdout()
            }
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout(BufWriter::new(io::stdout().lock()))
    }

    /// Flush the report and wait for the pager to exit.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Output::Stdout(mut out) => out.flush(),
            Output::Pager { mut child, stdin } => {
                let flushed = stdin.into_inner().map_err(|e| e.into_error()).map(drop);
                let status = child.wait()?;
                if let Err(e) = flushed {
                    if e.kind() != io::ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
                if status.success() {
                    Ok(())
                } else {
                    Err(io::Error::other(format!("pager failed: {status}")))
                }
            }
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(out) => out.write(buf),
            Output::Pager { stdin, .. } => stdin.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(out) => out.flush(),
            Output::Pager { stdin, .. } => stdin.flush(),
        }
    }
}

/// The pager command line to run, or `None` to write directly.
///
/// `$PAGER` wins when set; otherwise `pager` if `is_available` finds it,
/// else `more`. A pager of `cat` disables paging.
pub fn pager_command(env_pager: Option<&str>, is_available: impl Fn(&str) -> bool) -> Option<String> {
    let cmdline = match env_pager.filter(|p| !p.is_empty()) {
        Some(pager) => pager.to_string(),
        None if is_available("pager") => "pager".to_string(),
        None => "more".to_string(),
    };
    (cmdline != "cat").then_some(cmdline)
}

/// Environment defaults for `less` and `lv`, unless the user set them.
pub fn pager_env(raw_control_chars: bool, less_set: bool, lv_set: bool) -> Vec<(&'static str, &'static str)> {
    let mut vars = Vec::new();
    if !less_set {
        vars.push(("LESS", if raw_control_chars { "-FXR" } else { "-FX" }));
    }
    if raw_control_chars && !lv_set {
        vars.push(("LV", "-c"));
    }
    vars
}

fn on_path(command: &str) -> bool {
    env::var_os("PATH")
        .is_some_and(|path| env::split_paths(&path).any(|dir| dir.join(command).is_file()))
}
