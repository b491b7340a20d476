//! E-ticket HTTP adapter.
//!
//! Implements the `rwb-core` TicketGateway over the railway e-ticket JSON
//! API: a POST per availability query and per station-directory search, with
//! optional session headers. A request either completes within the timeout
//! or errors out; nothing here retries.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use rwb_core::{
    config::Config,
    domain::{Lang, Station},
    errors::Error,
    ports::TicketGateway,
    Result,
};

#[derive(Clone, Debug)]
pub struct EticketClient {
    http: reqwest::Client,
    stations_api: String,
    trains_api: String,
    xsrf: Option<String>,
    cookie: Option<String>,
}

impl EticketClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| Error::Api(format!("http client build: {e}")))?;

        Ok(Self {
            http,
            stations_api: cfg.stations_api.clone(),
            trains_api: cfg.trains_api.clone(),
            xsrf: cfg.eticket_xsrf.clone(),
            cookie: cfg.eticket_cookie.clone(),
        })
    }

    async fn post_json(&self, url: &str, lang: Lang, payload: Value) -> Result<Value> {
        let mut req = self
            .http
            .post(url)
            .json(&payload)
            .header("Accept", "application/json")
            .header("Accept-Language", lang.code())
            .header("Connection", "keep-alive");

        if let Some(xsrf) = &self.xsrf {
            req = req.header("X-XSRF-TOKEN", xsrf);
        }
        if let Some(cookie) = &self.cookie {
            req = req.header("Cookie", cookie);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Api(format!("eticket request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "eticket request failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Api(format!("eticket json error: {e}")))
    }
}

#[async_trait]
impl TicketGateway for EticketClient {
    async fn fetch_availability(
        &self,
        from_code: &str,
        to_code: &str,
        date: NaiveDate,
        lang: Lang,
    ) -> Result<Value> {
        let payload = json!({
            "directions": {
                "forward": {
                    "date": date.format("%Y-%m-%d").to_string(),
                    "depStationCode": from_code,
                    "arvStationCode": to_code,
                }
            }
        });
        self.post_json(&self.trains_api, lang, payload).await
    }

    async fn search_stations(&self, query: &str, lang: Lang) -> Result<Vec<Station>> {
        let q = query.trim();
        if q.chars().count() < 2 {
            return Ok(Vec::new());
        }

        let data = self
            .post_json(&self.stations_api, lang, json!({ "name": q }))
            .await?;

        Ok(parse_stations(&data))
    }
}

/// Directory entries out of `data.stations`; codes may arrive as strings or
/// numbers, entries without both fields are dropped.
fn parse_stations(data: &Value) -> Vec<Station> {
    let Some(stations) = data
        .get("data")
        .and_then(|d| d.get("stations"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    stations
        .iter()
        .filter_map(|s| {
            let code = match s.get("code") {
                Some(Value::String(v)) => v.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => return None,
            };
            let name = s.get("name")?.as_str()?.to_string();
            if name.is_empty() {
                return None;
            }
            Some(Station { code, name })
        })
        .collect()
}
