use std::ffi::OsString;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Exit status for bad invocations (input path problems).
pub const EXIT_USAGE: i32 = 1;
/// Exit status for I/O and format failures.
pub const EXIT_FAILURE: i32 = 2;

pub fn exit_with(code: i32, err: impl Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(code);
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("file '{0}' is not json")]
    NotJson(String),

    #[error("file {0} does not exist")]
    Missing(String),
}

/// The legacy flavor part must be an existing `.json` file.
pub fn validate_input_path(path: &Path) -> Result<(), InputError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return Err(InputError::NotJson(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(InputError::Missing(path.display().to_string()));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Replace `path` with `contents` via a temp file and rename, so readers
/// never see a partially written document.
pub fn write_output(path: &Path, contents: &str) -> Result<(), OutputError> {
    let io_err = |path: &Path| {
        let path = path.display().to_string();
        move |source| OutputError::Write { path, source }
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), OutputError> {
        let mut file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        file.write_all(contents.as_bytes())
            .map_err(io_err(&tmp_path))?;
        file.sync_all().map_err(io_err(&tmp_path))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        OutputError::Write {
            path: path.display().to_string(),
            source,
        }
    })
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}
