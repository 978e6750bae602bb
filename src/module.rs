//! Binary module protocol: parameters arrive as a JSON file whose path is the
//! first argument, and a single JSON object goes to stdout.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use crate::reader::ReadResult;

/// Logs go to stderr; stdout carries only the response.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read and parse the parameter file named by the first real argument.
pub fn load_params<T: DeserializeOwned>(args: impl IntoIterator<Item = OsString>) -> Result<T> {
    let mut args = args.into_iter();
    let _exe = args.next();

    let Some(params_path) = args.next() else {
        return Err(anyhow!("missing argument: path to a JSON parameter file"));
    };
    let params_path = PathBuf::from(params_path);
    let content = fs::read_to_string(&params_path)
        .with_context(|| format!("cannot read parameter file: {}", params_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid parameters in {}", params_path.display()))
}

/// Treat `""` like an omitted option.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub changed: bool,
    pub failed: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<ReadResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_written: Option<usize>,
}

impl Response {
    pub fn ok(changed: bool, msg: impl Into<String>) -> Self {
        Self {
            changed,
            failed: false,
            msg: msg.into(),
            rows: None,
            rows_written: None,
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            failed: true,
            ..Self::ok(false, msg)
        }
    }

    /// Print the response and return the process exit code.
    pub fn emit(&self) -> i32 {
        match serde_json::to_string(self) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("{}", failure_json(&err.to_string())),
        }
        if self.failed { 1 } else { 0 }
    }
}

fn failure_json(msg: &str) -> serde_json::Value {
    serde_json::json!({"changed": false, "failed": true, "msg": msg})
}

impl From<anyhow::Error> for Response {
    fn from(err: anyhow::Error) -> Self {
        Response::failed(format!("{err:#}"))
    }
}
