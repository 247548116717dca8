#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests"
)]

use std::sync::Arc;

use channel_socket::display::OutputLog;
use channel_socket::error::Kind;
use channel_socket::subscription::{Client, RequestError};
use httpmock::{Method::POST, MockServer};
use reqwest::StatusCode;

mod request_subscription {
    use super::*;

    #[tokio::test]
    async fn request_subscription_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/subscribe")
                .query_param("channel", "room-42");
            then.status(StatusCode::OK).body("joined room-42");
        });

        let response = client.request_subscription("room-42").await?;

        assert_eq!(response, "joined room-42");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn body_should_be_returned_verbatim_for_error_status() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/subscribe")
                .query_param("channel", "missing");
            then.status(StatusCode::BAD_REQUEST)
                .body(r#"{"error":"channel not found"}"#);
        });

        let response = client.request_subscription("missing").await?;

        assert_eq!(response, r#"{"error":"channel not found"}"#);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn custom_path_should_be_used() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::with_path(&format!("{}/api", server.base_url()), "/channels/join")?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/channels/join")
                .query_param("channel", "general");
            then.status(StatusCode::OK).body("joined general");
        });

        let response = client.request_subscription("general").await?;

        assert_eq!(response, "joined general");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn invalid_text_body_should_fail() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        server.mock(|when, then| {
            when.method(POST).path("/subscribe");
            then.status(StatusCode::OK).body(vec![0xff, 0xfe, 0xfd]);
        });

        let error = client.request_subscription("room-42").await.unwrap_err();

        assert_eq!(error.kind(), Kind::Subscription);
        assert!(
            matches!(
                error.downcast_ref::<RequestError>(),
                Some(RequestError::InvalidText(_))
            ),
            "expected an invalid text error, got {error}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_should_be_transport_failure() -> anyhow::Result<()> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let client = Client::new(&format!("http://{addr}"))?;

        let error = client.request_subscription("room-42").await.unwrap_err();

        assert_eq!(error.kind(), Kind::Subscription);
        assert!(
            matches!(
                error.downcast_ref::<RequestError>(),
                Some(RequestError::TransportFailure(_))
            ),
            "expected a transport failure, got {error}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_requests_should_not_interleave() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;

        for channel in ["a", "b"] {
            server.mock(|when, then| {
                when.method(POST)
                    .path("/subscribe")
                    .query_param("channel", channel);
                then.status(StatusCode::OK).body(format!("joined {channel}"));
            });
        }

        let (a, b) = tokio::join!(
            client.request_subscription("a"),
            client.request_subscription("b")
        );

        assert_eq!(a?, "joined a");
        assert_eq!(b?, "joined b");

        Ok(())
    }
}

mod subscribe_and_show {
    use super::*;

    #[tokio::test]
    async fn confirmation_should_be_shown() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url())?;
        let log = Arc::new(OutputLog::new());

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/subscribe")
                .query_param("channel", "room-42");
            then.status(StatusCode::OK).body("joined room-42");
        });

        client.subscribe_and_show("room-42", log.as_ref()).await?;

        assert_eq!(log.subscription_result().as_deref(), Some("joined room-42"));
        assert!(log.contents().is_empty(), "the output log is separate");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn failure_text_should_be_shown() -> anyhow::Result<()> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let client = Client::new(&format!("http://{addr}"))?;
        let log = Arc::new(OutputLog::new());

        let error = client
            .subscribe_and_show("room-42", log.as_ref())
            .await
            .unwrap_err();

        assert_eq!(log.subscription_result(), Some(error.to_string()));
        assert_eq!(log.fatal_count(), 0);

        Ok(())
    }
}
