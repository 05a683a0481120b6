use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use getset::{CopyGetters, Getters};

use crate::{Args, errors::GeneratorError, template::Template};

/// Flags that were historically spelled with a single dash.
const LEGACY_FLAGS: [&str; 4] = ["db", "tpl", "out", "days"];

/// Runtime settings, built once at startup and read-only afterwards.
#[derive(Debug, Getters, CopyGetters)]
pub struct Config {
    /// Organization table. Detail tables live next to it.
    #[getset(get = "pub")]
    db: PathBuf,
    #[getset(get = "pub")]
    template: Template,
    #[getset(get = "pub")]
    out: PathBuf,
    #[getset(get_copy = "pub")]
    days: u32,
}

impl Config {
    /// Validates the input and output locations and loads the template.
    pub fn from_args(args: &Args) -> Result<Self> {
        if !args.db.exists() {
            return Err(GeneratorError::NotFound {
                what: "local database",
                path: args.db.clone(),
            })?;
        }
        if !args.tpl.exists() {
            return Err(GeneratorError::NotFound {
                what: "template file",
                path: args.tpl.clone(),
            })?;
        }
        let raw = fs::read(&args.tpl)
            .with_context(|| format!("failed to read template file '{}'", args.tpl.display()))?;

        check_output_dir(&args.out)?;

        Ok(Self {
            db: args.db.clone(),
            template: Template::new(raw),
            out: args.out.clone(),
            days: args.days,
        })
    }

    /// Directory holding the per-organization detail tables.
    pub fn db_dir(&self) -> &Path {
        match self.db.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

fn check_output_dir(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|_| GeneratorError::NotFound {
        what: "output directory",
        path: path.to_path_buf(),
    })?;
    if !meta.is_dir() {
        return Err(GeneratorError::NotADirectory(path.to_path_buf()))?;
    }
    Ok(())
}

/// Rewrites `-db`, `-db=x` and friends into their `--` form so that old
/// invocations keep working. The argument following a flag that takes a
/// value is its value and is never rewritten. Anything else is passed
/// through as is.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut value_pending = false;
    args.into_iter()
        .map(|arg| {
            if std::mem::take(&mut value_pending) {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = s.strip_prefix('-') else {
                return arg;
            };
            let (legacy, rest) = match rest.strip_prefix('-') {
                Some(long) => (false, long),
                None => (true, rest),
            };
            let (name, inline_value) = match rest.split_once('=') {
                Some((name, _)) => (name, true),
                None => (rest, false),
            };
            if !LEGACY_FLAGS.contains(&name) {
                return arg;
            }
            value_pending = !inline_value;
            if legacy {
                OsString::from(format!("-{s}"))
            } else {
                arg
            }
        })
        .collect()
}
