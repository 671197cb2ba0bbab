//! Liveness probe.

use crate::{Request, Response};

/// `GET /health`: always `200 OK` with body `"ok"`.
///
/// If the process can answer HTTP at all it is alive, so this handler has no
/// dependencies and no failure path.
pub async fn health(_req: Request) -> Response {
    Response::text("ok")
}
