//! Ticket persistence and print dispatch
//!
//! The composed document always lands on disk first; physical dispatch is a
//! best-effort, at-most-once side effect on top of that. The business
//! requirement is "a printable artifact must always exist", not "must
//! always reach a physical printer".
//!
//! State machine per invocation:
//! `Composed → Saved → {Printed | Failed | NotAttempted}`
//!
//! - Saving failures are fatal and propagate to the caller.
//! - A dispatch failure (device offline, driver missing) is caught locally,
//!   logged and downgraded; the ticket file is retained.
//! - On platforms without spooler integration dispatch is skipped outright
//!   and the outcome carries a manual print hint.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::TicketConfig;
use crate::error::TicketResult;

/// Terminal state of the dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Document reached the spooler
    Printed { printer: String },
    /// Dispatch was attempted and failed; the ticket file is retained
    Failed { reason: String },
    /// No spooler integration on this platform; print manually
    NotAttempted { hint: String },
}

/// Result of one save-and-dispatch invocation
///
/// Created at the end of the call and consumed by the caller for logging;
/// the ticket file at `path` exists in every variant.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub path: PathBuf,
    pub dispatch: DispatchStatus,
}

impl DispatchOutcome {
    /// Whether the document physically reached a printer
    pub fn printed(&self) -> bool {
        matches!(self.dispatch, DispatchStatus::Printed { .. })
    }
}

/// Output device abstraction
///
/// Two implementations: the Windows spooler device, and a no-op reporter
/// for platforms without spooler integration. The platform picks one at
/// compile time; there is no OS branching at call sites.
#[allow(async_fn_in_trait)]
pub trait OutputDevice {
    /// Best-effort dispatch; never fails the overall operation
    async fn dispatch(&self, data: &[u8], saved_at: &Path) -> DispatchStatus;
}

/// Spooler-backed output device (Windows driver printing)
#[cfg(windows)]
pub struct SpoolerDevice {
    printer_name: Option<String>,
}

#[cfg(windows)]
impl OutputDevice for SpoolerDevice {
    async fn dispatch(&self, data: &[u8], saved_at: &Path) -> DispatchStatus {
        use ticket_printer::{Printer, WindowsPrinter};
        use tracing::warn;

        let name = match WindowsPrinter::resolve(self.printer_name.as_deref()) {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, path = %saved_at.display(), "no usable printer, ticket kept on disk");
                return DispatchStatus::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match WindowsPrinter::new(&name).print(data).await {
            Ok(()) => DispatchStatus::Printed { printer: name },
            Err(e) => {
                warn!(printer = %name, error = %e, path = %saved_at.display(), "dispatch failed, ticket kept on disk");
                DispatchStatus::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// No-op reporter for platforms without spooler integration
pub struct ManualDevice;

impl OutputDevice for ManualDevice {
    async fn dispatch(&self, _data: &[u8], saved_at: &Path) -> DispatchStatus {
        let hint = format!("lp -o raw {}", saved_at.display());
        info!(path = %saved_at.display(), "no spooler integration on this platform; print manually");
        DispatchStatus::NotAttempted { hint }
    }
}

/// Select the output device for the compiled platform
#[cfg(windows)]
pub fn platform_device(printer_name: Option<String>) -> SpoolerDevice {
    SpoolerDevice { printer_name }
}

/// Select the output device for the compiled platform
#[cfg(not(windows))]
pub fn platform_device(_printer_name: Option<String>) -> ManualDevice {
    ManualDevice
}

/// Unique-per-invocation file name: short code plus timestamp
fn ticket_file_name(short_code: &str) -> String {
    format!(
        "ticket_{}_{}.escpos",
        short_code,
        chrono::Utc::now().timestamp_millis()
    )
}

/// Persist the composed document and attempt physical dispatch
///
/// Write failures propagate; dispatch failures are downgraded into the
/// returned outcome. The ticket file is retained in every case.
#[instrument(skip(data, config), fields(short_code = short_code, bytes = data.len()))]
pub async fn save_and_dispatch(
    short_code: &str,
    data: &[u8],
    config: &TicketConfig,
) -> TicketResult<DispatchOutcome> {
    let path = config.output_dir.join(ticket_file_name(short_code));
    tokio::fs::write(&path, data).await?;
    info!(path = %path.display(), "ticket saved");

    let device = platform_device(config.printer_name.clone());
    let dispatch = device.dispatch(data, &path).await;
    if let DispatchStatus::Printed { printer } = &dispatch {
        info!(printer = %printer, "ticket printed");
    }

    Ok(DispatchOutcome { path, dispatch })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_file_name_pattern() {
        let name = ticket_file_name("abc12345");
        assert!(name.starts_with("ticket_abc12345_"));
        assert!(name.ends_with(".escpos"));

        // The middle part is a millisecond timestamp
        let ts = name
            .trim_start_matches("ticket_abc12345_")
            .trim_end_matches(".escpos");
        assert!(ts.parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_save_writes_file_and_never_fails_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let config = TicketConfig::with_overrides("https://shop.example", dir.path());

        let outcome = save_and_dispatch("abc12345", b"ticket bytes", &config)
            .await
            .unwrap();

        assert!(outcome.path.exists());
        assert_eq!(std::fs::read(&outcome.path).unwrap(), b"ticket bytes");

        #[cfg(not(windows))]
        {
            assert!(!outcome.printed());
            match &outcome.dispatch {
                DispatchStatus::NotAttempted { hint } => {
                    assert!(hint.contains("lp -o raw"));
                    assert!(hint.contains(outcome.path.to_str().unwrap()));
                }
                other => panic!("expected NotAttempted, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_unwritable_output_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let config = TicketConfig::with_overrides("https://shop.example", missing);

        let result = save_and_dispatch("abc12345", b"ticket bytes", &config).await;
        assert!(matches!(result, Err(crate::TicketError::Io(_))));
    }

    #[tokio::test]
    async fn test_manual_device_reports_hint() {
        let device = ManualDevice;
        let status = device
            .dispatch(b"data", Path::new("/tmp/ticket_x_1.escpos"))
            .await;

        assert_eq!(
            status,
            DispatchStatus::NotAttempted {
                hint: "lp -o raw /tmp/ticket_x_1.escpos".to_string()
            }
        );
    }
}
