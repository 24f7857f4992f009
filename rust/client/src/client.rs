use crate::common::defs::*;
use crate::error::{EnvError, EnvResult};
use crate::telemetry::TelemetrySource;
use reqwest::blocking::Response;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

/// Telemetry bridge reached over blocking JSON/HTTP. Each call is one
/// request/response round trip returning a fresh snapshot.
/// NOTE: All APIs are sync as the bridge is expected to run next to the game.
#[derive(Debug)]
pub struct HttpTelemetry {
    client: Client,
    supports_advance: bool,
}

impl HttpTelemetry {
    pub fn new(base_url: &str) -> EnvResult<Self> {
        Ok(Self {
            client: Client::new(base_url)?,
            supports_advance: false,
        })
    }

    /// Opt in to `POST /v1/game/advance` for step synchronization. Older bridges
    /// do not expose it.
    pub fn with_advance(mut self, supported: bool) -> Self {
        self.supports_advance = supported;
        self
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

impl TelemetrySource for HttpTelemetry {
    fn telemetry(&mut self) -> EnvResult<Telemetry> {
        let url = self.client.make_api_url("vessel/telemetry");
        let val = self.client.http_get(&url)?;
        Ok(serde_json::from_value(val)?)
    }

    fn set_control(&mut self, update: &ControlUpdate) -> EnvResult<()> {
        let url = self.client.make_api_url("vessel/control");
        self.client.http_post(&url, update).map(drop)
    }

    fn load_game(&mut self, save_name: &str) -> EnvResult<()> {
        let url = self.client.make_api_url("game/load");
        let res = self
            .client
            .send_post(&url, &json!({ "save_name": save_name }))?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(EnvError::SaveNotFound {
                save_name: save_name.to_string(),
            });
        }
        Client::into_json(res).map(drop)
    }

    fn activate_next_stage(&mut self) -> EnvResult<()> {
        let url = self.client.make_api_url("vessel/stage");
        self.client.http_post(&url, &json!({})).map(drop)
    }

    fn set_assist_flags(&mut self, sas: bool, rcs: bool) -> EnvResult<()> {
        let url = self.client.make_api_url("vessel/assist");
        self.client
            .http_post(&url, &json!({ "sas": sas, "rcs": rcs }))
            .map(drop)
    }

    fn set_physics_warp(&mut self, factor: u32) -> EnvResult<()> {
        let url = self.client.make_api_url("game/warp");
        self.client
            .http_post(&url, &json!({ "factor": factor }))
            .map(drop)
    }

    fn advance_time(&mut self, dt: f64) -> EnvResult<()> {
        if !self.supports_advance {
            return Err(EnvError::Unsupported("advance_time"));
        }

        let url = self.client.make_api_url("game/advance");
        self.client.http_post(&url, &json!({ "dt": dt })).map(drop)
    }
}

#[derive(Debug)]
pub struct Client {
    base_url: String,
    api_url: String,
    client: reqwest::blocking::Client,
}

impl Client {
    pub fn new(base_url: &str) -> EnvResult<Self> {
        let mut base_url = base_url.replace("//localhost:", "//127.0.0.1:");
        if base_url.ends_with('/') {
            _ = base_url.remove(base_url.len() - 1);
        }

        let api_url = format!("{base_url}/v1/");

        Ok(Self {
            base_url,
            api_url,
            client: reqwest::blocking::Client::builder().build()?,
        })
    }

    pub fn make_api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn http_get(&self, url: &str) -> EnvResult<Value> {
        let res = self
            .client
            .get(url)
            .headers(Self::construct_common_headers())
            .send()?;
        Self::into_json(res)
    }

    fn http_post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> EnvResult<Value> {
        let res = self.send_post(url, body)?;
        Self::into_json(res)
    }

    fn send_post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> EnvResult<Response> {
        tracing::trace!(url, "POST");
        Ok(self
            .client
            .post(url)
            .headers(Self::construct_common_headers())
            .json(body)
            .send()?)
    }

    fn into_json(res: Response) -> EnvResult<Value> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(EnvError::Telemetry(format!("bridge returned {status}: {body}")));
        }

        let text = res.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn construct_common_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}
