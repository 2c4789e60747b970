use std::path::Path;

use vetch_fs::Removal;

use crate::effects::log::{Logger, Severity};
use crate::error::{FetchError, Result};

const SOURCE: &str = "remove";

/// Idempotent deletion of download artifacts, with logging.
///
/// Failures are always surfaced, never logged and swallowed.
pub struct FileRemover<'a> {
    logger: &'a dyn Logger,
}

impl<'a> FileRemover<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self { Self { logger } }

    pub fn remove(&self, path: &Path) -> Result<()> {
        match vetch_fs::remove(path) {
            Ok(Removal::Absent) => {
                self.logger.log(
                    &format!("nothing to remove at {}", path.display()),
                    Severity::Info,
                    SOURCE,
                );
                Ok(())
            }
            Ok(Removal::Removed) => {
                self.logger
                    .log(&format!("removed {}", path.display()), Severity::Info, SOURCE);
                Ok(())
            }
            Err(e) => {
                self.logger.log(
                    &format!("failed to remove {}: {e}", path.display()),
                    Severity::Error,
                    SOURCE,
                );
                Err(FetchError::Removal(e))
            }
        }
    }
}
