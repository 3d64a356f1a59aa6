use super::{
    PerfQueryClient,
    PerfQuerySpec,
};
use crate::metrics::{
    ClusterIdentity,
    EntityRecord,
};
use eyre::{
    eyre,
    Context as _,
    Result,
};
use reqwest::Client as HttpClient;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    future::Future,
    pin::Pin,
};
use url::Url;

const QUERY_PATH: [&str; 3] = ["vsanHealth", "perf", "query"];

/// Talks JSON to the performance manager exposed under `<endpoint>/vsanHealth`.
#[derive(Debug, Clone)]
pub struct HttpPerfClient {
    http_client: HttpClient,
    query_url: Url,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PerfQueryRequest<'a> {
    query_specs: [&'a PerfQuerySpec; 1],
    cluster: ManagedObjectReference<'a>,
}

#[derive(Debug, Serialize)]
struct ManagedObjectReference<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct PerfQueryResponse {
    #[serde(default)]
    returnval: Vec<EntityRecord>,
}

impl HttpPerfClient {
    pub fn new(http_client: HttpClient, endpoint: &Url) -> Result<Self> {
        Ok(Self {
            http_client,
            query_url: query_url(endpoint)?,
            username: None,
            password: None,
        })
    }

    pub fn with_credentials(mut self, username: String, password: Option<String>) -> Self {
        self.username = Some(username);
        self.password = password;
        self
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    async fn send_query(&self, cluster: &ClusterIdentity, spec: &PerfQuerySpec) -> Result<Vec<EntityRecord>> {
        let body = PerfQueryRequest {
            query_specs: [spec],
            cluster: ManagedObjectReference {
                kind: "ClusterComputeResource",
                value: &cluster.moid,
            },
        };

        let mut request = self.http_client.post(self.query_url.clone()).json(&body);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request
            .send()
            .await
            .wrap_err_with(|| format!("Failed to send performance query to {}", self.query_url))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(eyre!("performance query returned {}: {}", status, text.trim()));
        }

        let parsed: PerfQueryResponse = response
            .json()
            .await
            .wrap_err("Failed to decode performance query response")?;
        Ok(parsed.returnval)
    }
}

impl PerfQueryClient for HttpPerfClient {
    fn query_perf<'a>(
        &'a self,
        cluster: &'a ClusterIdentity,
        spec: &'a PerfQuerySpec,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntityRecord>>> + Send + 'a>> {
        Box::pin(self.send_query(cluster, spec))
    }
}

fn query_url(endpoint: &Url) -> Result<Url> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|_| eyre!("Endpoint URL cannot be used as a base: {}", endpoint))?
        .pop_if_empty()
        .extend(QUERY_PATH);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricSeries;
    use chrono::{
        TimeZone,
        Utc,
    };
    use pretty_assertions::assert_eq;
    use tokio::{
        io::{
            AsyncReadExt,
            AsyncWriteExt,
        },
        net::TcpListener,
    };

    fn cluster() -> ClusterIdentity {
        ClusterIdentity {
            vcenter: "vc01".to_string(),
            datacenter: "dc1".to_string(),
            name: "prod".to_string(),
            moid: "domain-c7".to_string(),
        }
    }

    fn spec() -> PerfQuerySpec {
        PerfQuerySpec {
            entity_ref_id: "cache-disk:*".to_string(),
            start_time: Utc.with_ymd_and_hms(2017, 6, 14, 23, 10, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2017, 6, 14, 23, 15, 0).unwrap(),
        }
    }

    /// Answers a single request with `status` and a JSON `body`, handing the
    /// raw request back through the join handle.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, handle)
    }

    #[test]
    fn query_url_is_appended_to_endpoint() {
        for endpoint in ["https://vc01.example.com", "https://vc01.example.com/"] {
            let url = query_url(&Url::parse(endpoint).unwrap()).unwrap();
            assert_eq!(url.as_str(), "https://vc01.example.com/vsanHealth/perf/query");
        }
        let url = query_url(&Url::parse("https://gw.example.com/proxy/").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://gw.example.com/proxy/vsanHealth/perf/query");
    }

    #[test]
    fn request_body_shape() {
        let spec = PerfQuerySpec {
            entity_ref_id: "cache-disk:*".to_string(),
            start_time: Utc.with_ymd_and_hms(2017, 6, 14, 23, 10, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2017, 6, 14, 23, 15, 0).unwrap(),
        };
        let body = PerfQueryRequest {
            query_specs: [&spec],
            cluster: ManagedObjectReference {
                kind: "ClusterComputeResource",
                value: "domain-c7",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "querySpecs": [{
                    "entityRefId": "cache-disk:*",
                    "startTime": "2017-06-14T23:10:00Z",
                    "endTime": "2017-06-14T23:15:00Z",
                }],
                "cluster": { "type": "ClusterComputeResource", "value": "domain-c7" },
            })
        );
    }

    #[test]
    fn response_without_returnval_is_empty() {
        let parsed: PerfQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.returnval.is_empty());
    }

    #[tokio::test]
    async fn error_status_fails_the_query() {
        let (endpoint, server) = serve_once("500 Internal Server Error", r#"{"fault":"NotAuthenticated"}"#).await;
        let client = HttpPerfClient::new(HttpClient::new(), &endpoint).unwrap();

        let err = client.query_perf(&cluster(), &spec()).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("500"), "{message}");
        assert!(message.contains("NotAuthenticated"), "{message}");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /vsanHealth/perf/query "), "{request}");
    }

    #[tokio::test]
    async fn returnval_records_are_decoded() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"returnval":[{
                "entityRefId": "cache-disk:52e5",
                "sampleInfo": "2017-06-14 23:10:00,2017-06-14 23:15:00",
                "value": [{"metricId": {"label": "latencyDevRead"}, "values": "1.5,2"}]
            }]}"#,
        )
        .await;
        let client = HttpPerfClient::new(HttpClient::new(), &endpoint)
            .unwrap()
            .with_credentials("administrator@vsphere.local".to_string(), Some("secret".to_string()));

        let records = client.query_perf(&cluster(), &spec()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity_ref_id, "cache-disk:52e5");
        assert_eq!(records[0].sample_info, "2017-06-14 23:10:00,2017-06-14 23:15:00");
        assert_eq!(records[0].series, vec![MetricSeries::new("latencyDevRead", "1.5,2")]);

        let request = server.await.unwrap();
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.contains("authorization: basic "), "{request}");
        assert!(request.contains(r#""entityRefId":"cache-disk:*""#), "{request}");
        assert!(request.contains(r#""value":"domain-c7""#), "{request}");
    }
}
