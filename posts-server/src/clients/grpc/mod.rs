use std::future::Future;
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use super::error::ClientError;

pub(crate) mod identity_client;
pub(crate) mod media_client;
pub(crate) mod proto;

#[derive(Debug, Clone)]
pub(crate) struct RemoteEndpoint {
    pub(crate) url: String,
    pub(crate) call_timeout: Duration,
    pub(crate) max_message_size_bytes: usize,
}

impl RemoteEndpoint {
    /// Channels connect on first use so the service can start before its peers.
    pub(crate) fn lazy_channel(&self) -> Result<Channel, ClientError> {
        let endpoint = Endpoint::from_shared(self.url.clone())?
            .connect_timeout(self.call_timeout)
            .timeout(self.call_timeout);
        Ok(endpoint.connect_lazy())
    }
}

/// Bounds a whole remote exchange, including draining response streams.
pub(crate) async fn with_deadline<T, F>(
    service: &'static str,
    deadline: Duration,
    call: F,
) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout { service, deadline }),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{RemoteEndpoint, with_deadline};
    use crate::clients::error::ClientError;

    #[tokio::test]
    async fn with_deadline_passes_through_results() {
        let value = with_deadline("media", Duration::from_secs(1), async {
            Ok::<_, ClientError>(7)
        })
        .await
        .expect("call must finish in time");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn with_deadline_reports_timeout() {
        let err = with_deadline("identity", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ClientError>(())
        })
        .await
        .expect_err("call must time out");
        assert!(matches!(err, ClientError::Timeout { service: "identity", .. }));
    }

    #[tokio::test]
    async fn lazy_channel_rejects_malformed_url() {
        let endpoint = RemoteEndpoint {
            url: "not a url".to_string(),
            call_timeout: Duration::from_secs(1),
            max_message_size_bytes: 1024,
        };
        assert!(endpoint.lazy_channel().is_err());
    }
}
