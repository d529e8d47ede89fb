use crate::dashboard_data::DashboardData;
use crate::datasets::error::DatasetError;
use crate::datasets::normalizer::NumericPolicy;
use crate::types::dataset::Dataset;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::task;
use tokio_util::sync::CancellationToken;

/// Fetches the four datasets over HTTP and turns them into [`DashboardData`].
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    base_url: String,
    client: Client,
    timeout: Duration,
    policy: NumericPolicy,
    cancel: CancellationToken,
}

impl DatasetLoader {
    pub fn new(base_url: &str, client: Client, timeout: Duration, policy: NumericPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn numeric_policy(&self) -> NumericPolicy {
        self.policy
    }

    /// Fetches all datasets concurrently and decodes them.
    ///
    /// Any failing fetch fails the whole load; no partial data is returned.
    pub async fn load(&self) -> Result<DashboardData, DatasetError> {
        let (daily, weekly, monthly, yearly) = tokio::try_join!(
            self.fetch_text(Dataset::Daily),
            self.fetch_text(Dataset::Weekly),
            self.fetch_text(Dataset::Monthly),
            self.fetch_text(Dataset::Yearly),
        )?;

        let policy = self.policy;
        let data = task::spawn_blocking(move || {
            DashboardData::from_csv(&daily, &weekly, &monthly, &yearly, policy)
        })
        .await??;

        info!(
            "Loaded dashboard data: {} daily, {} weekly, {} monthly, {} yearly rows across {} locations",
            data.daily_rows().len(),
            data.weekly_rows().len(),
            data.monthly_rows().len(),
            data.yearly_rows().len(),
            data.locations().len()
        );
        Ok(data)
    }

    /// Fetches the raw text of one dataset, bounded by the configured timeout.
    pub async fn fetch_text(&self, dataset: Dataset) -> Result<String, DatasetError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("Fetch of {} dataset cancelled", dataset);
                Err(DatasetError::Cancelled { dataset })
            }
            result = tokio::time::timeout(self.timeout, self.download(dataset)) => {
                result.unwrap_or_else(|_| {
                    warn!("Fetch of {} dataset timed out after {:?}", dataset, self.timeout);
                    Err(DatasetError::Timeout {
                        dataset,
                        timeout: self.timeout,
                    })
                })
            }
        }
    }

    /// Cancels every in-flight and future fetch of this loader.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A copy of this loader with its own, not yet cancelled, token.
    pub fn renewed(&self) -> Self {
        Self {
            cancel: CancellationToken::new(),
            ..self.clone()
        }
    }

    async fn download(&self, dataset: Dataset) -> Result<String, DatasetError> {
        let url = dataset.url(&self.base_url);
        info!("Downloading {} dataset from {}", dataset, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DatasetError::NetworkRequest {
                dataset,
                url: url.clone(),
                source: e,
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => DatasetError::HttpStatus {
                        dataset,
                        url,
                        status,
                        source: e,
                    },
                    None => DatasetError::NetworkRequest {
                        dataset,
                        url,
                        source: e,
                    },
                });
            }
        };

        let text = response
            .text()
            .await
            .map_err(|e| DatasetError::NetworkRequest {
                dataset,
                url: url.clone(),
                source: e,
            })?;
        info!("Downloaded {} bytes for {} dataset", text.len(), dataset);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MEASURES: &str =
        "avg_temp,min_temp,max_temp,avg_wind,min_wind,max_wind,avg_humidity,min_humidity,max_humidity";

    async fn mount_datasets(server: &MockServer) {
        let bodies = [
            (
                Dataset::Daily,
                format!(
                    "state,date,{}\nMissouri,2024-05-01,20,10,30,5,1,9,60,40,80\nOhio,2024-05-01,15,8,22,7,2,12,70,50,90\n",
                    MEASURES
                ),
            ),
            (
                Dataset::Weekly,
                format!("state,date,{}\nMissouri,2024-04-28,19,9,29,5,1,9,61,41,81\n", MEASURES),
            ),
            (
                Dataset::Monthly,
                format!("state,year,month,{}\nMissouri,2024,4,18,8,28,5,1,9,62,42,82\n", MEASURES),
            ),
            (
                Dataset::Yearly,
                format!("state,year,{}\nMissouri,2023,14,-10,38,6,0,30,65,20,100\n", MEASURES),
            ),
        ];
        for (dataset, body) in bodies {
            Mock::given(method("GET"))
                .and(path(format!("/{}", dataset.relative_path())))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(server)
                .await;
        }
    }

    fn loader(server: &MockServer, timeout: Duration) -> DatasetLoader {
        DatasetLoader::new(&server.uri(), Client::new(), timeout, NumericPolicy::Lenient)
    }

    #[tokio::test]
    async fn test_load_all_datasets() {
        let server = MockServer::start().await;
        mount_datasets(&server).await;

        let data = loader(&server, Duration::from_secs(5)).load().await.unwrap();

        assert_eq!(data.daily_rows().len(), 2);
        assert_eq!(data.weekly_rows().len(), 1);
        assert_eq!(data.monthly_rows().len(), 1);
        assert_eq!(data.yearly_rows().len(), 1);
        let ids: Vec<&str> = data.locations().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["missouri", "ohio"]);
    }

    #[tokio::test]
    async fn test_http_status_error_names_dataset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/{}", Dataset::Monthly.relative_path())))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_datasets(&server).await;

        let err = loader(&server, Duration::from_secs(5)).load().await.unwrap_err();

        match &err {
            DatasetError::HttpStatus {
                dataset, status, url, ..
            } => {
                assert_eq!(*dataset, Dataset::Monthly);
                assert_eq!(status.as_u16(), 404);
                assert!(url.ends_with("gold/monthly_state_weather.csv"));
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
        assert!(err.to_string().contains("monthly"));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("state,date\n")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = loader(&server, Duration::from_millis(100))
            .fetch_text(Dataset::Yearly)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DatasetError::Timeout {
                dataset: Dataset::Yearly,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_loader_fetches_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("state,date\n"))
            .expect(0)
            .mount(&server)
            .await;

        let loader = loader(&server, Duration::from_secs(5));
        loader.cancel();
        assert!(loader.is_cancelled());

        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, DatasetError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_decode_error_names_dataset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/{}", Dataset::Daily.relative_path())))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("state,date\nOhio,not-a-date\n"),
            )
            .mount(&server)
            .await;
        mount_datasets(&server).await;

        let err = loader(&server, Duration::from_secs(5)).load().await.unwrap_err();
        assert_eq!(err.dataset(), Some(Dataset::Daily));
        assert!(matches!(err, DatasetError::Decode { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let loader = DatasetLoader::new(
            "http://localhost:1234/",
            Client::new(),
            Duration::from_secs(1),
            NumericPolicy::Strict,
        );
        assert_eq!(loader.base_url(), "http://localhost:1234");
        assert_eq!(loader.numeric_policy(), NumericPolicy::Strict);
    }
}
