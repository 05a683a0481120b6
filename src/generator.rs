use std::{
    borrow::Cow,
    ffi::{OsStr, OsString},
    path::{MAIN_SEPARATOR_STR, Path, PathBuf},
};

use anyhow::Result;
use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::{
    config::Config,
    models::{Detail, Organization},
    template::Substitutions,
    traits::{DocumentSink, TableSource},
};

const DIR_DATE_FORMAT: &str = "%Y-%m-%d";
const DETAIL_EXT: &str = "csv";
const DOCUMENT_EXT: &str = "html";

pub struct Engine<'c, S, W> {
    config: &'c Config,
    source: S,
    sink: W,
}

impl<'c, S, W> Engine<'c, S, W>
where
    S: TableSource,
    W: DocumentSink,
{
    pub fn new(config: &'c Config, source: S, sink: W) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    /// Generates documents for every organization and every day of the
    /// `days` long window beginning at `start`. Stops at the first error.
    pub fn run(&mut self, start: NaiveDate) -> Result<()> {
        let orgs: Vec<Organization> = self.source.load(self.config.db(), "local")?;
        debug!(
            organizations = orgs.len(),
            days = self.config.days(),
            "starting generation"
        );

        for org in &orgs {
            for offset in 0..self.config.days() {
                self.generate(org, offset_date(start, offset)?)?;
            }
        }

        Ok(())
    }

    /// Writes one document per detail row of `org` for `date`.
    pub fn generate(&mut self, org: &Organization, date: NaiveDate) -> Result<()> {
        let table = self.detail_table_path(org);
        let out_dir = self.output_dir(org, date);
        self.sink.ensure_dir(&out_dir)?;

        let details: Vec<Detail> = self.source.load(&table, "company")?;

        let template = self.config.template();
        let mut buf = Vec::with_capacity(template.as_bytes().len());
        for detail in &details {
            let out = append_file(&out_dir, &detail.file_stem(), DOCUMENT_EXT);
            info!(
                "processing '{}/{}' to '{}'",
                String::from_utf8_lossy(org.slug()),
                String::from_utf8_lossy(detail.driver_name()),
                out.display()
            );
            template.render_into(&Substitutions::new(org, detail, date), &mut buf);
            self.sink.write_document(&out, &buf)?;
        }

        Ok(())
    }

    fn detail_table_path(&self, org: &Organization) -> PathBuf {
        append_file(self.config.db_dir(), org.slug(), DETAIL_EXT)
    }

    fn output_dir(&self, org: &Organization, date: NaiveDate) -> PathBuf {
        let slug_dir = append_segment(self.config.out(), &os_segment(org.slug()));
        let day = date.format(DIR_DATE_FORMAT).to_string();
        append_segment(&slug_dir, OsStr::new(&day))
    }
}

/// Appends `segment` after a separator. Unlike `Path::join`, a segment that
/// looks absolute still ends up below `base`.
fn append_segment(base: &Path, segment: &OsStr) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(MAIN_SEPARATOR_STR);
    path.push(segment);
    PathBuf::from(path)
}

fn append_file(dir: &Path, stem: &[u8], ext: &str) -> PathBuf {
    let mut name = os_segment(stem).into_owned();
    name.push(".");
    name.push(ext);
    append_segment(dir, &name)
}

#[cfg(unix)]
fn os_segment(bytes: &[u8]) -> Cow<'_, OsStr> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn os_segment(bytes: &[u8]) -> Cow<'_, OsStr> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => Cow::Borrowed(OsStr::new(s)),
        Cow::Owned(s) => Cow::Owned(OsString::from(s)),
    }
}

fn offset_date(start: NaiveDate, offset: u32) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(u64::from(offset)))
        .ok_or_else(|| anyhow::anyhow!("date {start} + {offset} days is out of range"))
}
