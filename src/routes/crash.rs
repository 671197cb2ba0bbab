//! Failure injection.

use tracing::warn;

use crate::{Request, Response};

/// Exit status used by `/crash`.
pub const CRASH_EXIT_CODE: i32 = 1;

/// `GET /crash`: intentional self-termination for failure-injection testing.
///
/// Exits the process immediately with [`CRASH_EXIT_CODE`]. No response is
/// written, no connection is drained, so the caller sees the connection drop
/// and the supervisor (kubelet, systemd, ...) sees a failed process.
pub async fn crash(req: Request) -> Response {
    warn!(
        user_agent = req.header("user-agent").unwrap_or("-"),
        code = CRASH_EXIT_CODE,
        "crash requested, terminating process"
    );
    std::process::exit(CRASH_EXIT_CODE)
}
