//! Presenting a written report to the user.

use std::path::Path;

use crate::error::EdaResult;

/// Something that can show a report document, e.g. a browser.
pub trait ReportViewer: Send + Sync {
    /// Present the document at `path`.
    fn open(&self, path: &Path) -> EdaResult<()>;
}

/// Opens documents with the platform's default application.
#[derive(Debug, Default)]
pub struct SystemViewer;

impl ReportViewer for SystemViewer {
    fn open(&self, path: &Path) -> EdaResult<()> {
        open::that(path)?;
        Ok(())
    }
}
