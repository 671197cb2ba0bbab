//! Build and runtime metadata.

use std::ffi::OsString;
use std::io;

use serde::Serialize;
use tracing::error;

use crate::config::AppInfo;
use crate::response::{IntoResponse, Json};
use crate::{Request, Response, Status};

#[derive(Serialize)]
struct Info {
    #[serde(flatten)]
    app: AppInfo,
    hostname: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// `GET /info`: `{"app", "env", "version", "hostname"}`.
///
/// Environment and hostname are both read on every call.
pub async fn info(_req: Request) -> Response {
    render(AppInfo::from_env(), hostname::get())
}

fn render(app: AppInfo, hostname: io::Result<OsString>) -> Response {
    match hostname {
        Ok(name) => Json(Info { app, hostname: name.to_string_lossy().into_owned() }).into_response(),
        Err(e) => {
            error!("hostname lookup failed: {e}");
            match serde_json::to_vec(&ErrorBody { error: "hostname lookup failed" }) {
                Ok(body) => Response::builder().status(Status::InternalServerError).json(body),
                Err(_) => Response::status(Status::InternalServerError),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn defaults() -> AppInfo {
        AppInfo::from_lookup(|_| None)
    }

    #[test]
    fn renders_fields_in_order() {
        let res = render(defaults(), Ok(OsString::from("pod-7f9c")));
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(
            std::str::from_utf8(res.body()).unwrap(),
            r#"{"app":"devops-node-k8s-demo","env":"dev","version":"0.0.0","hostname":"pod-7f9c"}"#
        );
    }

    #[test]
    fn hostname_failure_is_internal_error() {
        let res = render(defaults(), Err(io::Error::other("uname failed")));
        assert_eq!(res.status_code(), Status::InternalServerError);
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body, json!({ "error": "hostname lookup failed" }));
    }

    #[tokio::test]
    async fn reports_os_hostname() {
        let expected = hostname::get().unwrap().to_string_lossy().into_owned();
        let res = info(Request::new(crate::Method::Get, "/info", Vec::new())).await;
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["hostname"], Value::String(expected));
    }
}
