mod test {

    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    use crate::error::AuthError;
    use crate::helpers::time::now_millis;
    use crate::provider::response::ProviderResponse;
    use crate::store::file_store::StoreError;
    use crate::tests::common::{build_service, error_provider_body, good_provider_body};

    #[tokio::test]
    async fn fresh_cache_is_served_without_a_network_call() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/token/");
                then.status(200).json_body(good_provider_body());
            })
            .await;

        let svc = build_service(&server.base_url());
        let record = json!({
            "access_token": "1234",
            "expires_in": 1111,
            "expiresDate": now_millis() + 1111 * 1000,
            "appTokenBaseURL": server.base_url(),
            "arcgisUserId": "test-user"
        });
        svc.store.write(record.to_string().as_bytes()).await.unwrap();

        let token = svc.manager.get_token(false).await.expect("cached token");

        assert_eq!(token.access_token, "1234");
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn expired_cache_triggers_exactly_one_acquisition() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/token/");
                then.status(200).json_body(json!({ "access_token": "fresh", "expires_in": 7200 }));
            })
            .await;

        let svc = build_service(&server.base_url());
        let stale = json!({
            "access_token": "stale",
            "expires_in": 1111,
            "expiresDate": now_millis() - 1000,
            "appTokenBaseURL": server.base_url(),
            "arcgisUserId": "test-user"
        });
        svc.store.write(stale.to_string().as_bytes()).await.unwrap();

        let token = svc.manager.get_token(false).await.expect("refreshed token");

        assert_eq!(token.access_token, "fresh");
        assert_eq!(mock.hits_async().await, 1);

        // superseded wholesale in the store as well
        let cached = svc.manager.get_cached_token().await.unwrap();
        assert_eq!(cached.access_token, "fresh");
    }

    #[tokio::test]
    async fn force_refresh_always_contacts_the_provider() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/token/");
                then.status(200).json_body(json!({ "access_token": "forced", "expires_in": 7200 }));
            })
            .await;

        let svc = build_service(&server.base_url());
        let valid = json!({
            "access_token": "still-good",
            "expires_in": 1111,
            "expiresDate": now_millis() + 1111 * 1000,
            "appTokenBaseURL": server.base_url(),
            "arcgisUserId": "test-user"
        });
        svc.store.write(valid.to_string().as_bytes()).await.unwrap();

        let token = svc.manager.get_token(true).await.expect("forced token");

        assert_eq!(token.access_token, "forced");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn provider_error_is_surfaced_verbatim_and_never_cached() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/token/");
                // disguised failure: transport status is 200
                then.status(200).json_body(error_provider_body(400));
            })
            .await;

        let svc = build_service(&server.base_url());
        let result = svc.manager.get_token(false).await;

        match result {
            Err(AuthError::Provider(failure)) => {
                assert_eq!(failure.error.code, 400);
                assert_eq!(failure.error.error, "invalid_client_id");
            }
            other => panic!("expected Provider error, got {:?}", other),
        }

        // the store was never written
        match svc.store.read().await {
            Err(StoreError::NotFound) => {}
            other => panic!("store should be untouched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cache_response_passes_errors_through_without_writing() {
        let svc = build_service("http://127.0.0.1:9");
        let failure: ProviderResponse =
            serde_json::from_value(error_provider_body(403)).expect("error body decodes as failure");
        assert!(failure.is_error());

        match svc.manager.cache_response(failure).await {
            Err(AuthError::Provider(failure)) => assert_eq!(failure.error.code, 403),
            other => panic!("expected Provider error, got {:?}", other),
        }
        assert!(matches!(svc.store.read().await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn cold_start_acquires_stamps_and_persists() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/token/");
                then.status(200).json_body(good_provider_body());
            })
            .await;

        let svc = build_service(&server.base_url());
        let before = now_millis();
        let token = svc.manager.get_token(false).await.expect("acquired token");
        let after = now_millis();

        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(token.access_token, "1234");
        // expiry = issuance + expires_in * 1000, within clock tolerance
        assert!(token.expires_date >= before + 1111 * 1000);
        assert!(token.expires_date <= after + 1111 * 1000);
        assert_eq!(token.app_token_base_url, server.base_url());
        assert_eq!(token.subject_id, "test-user");

        let persisted = svc.manager.get_cached_token().await.expect("persisted record");
        assert_eq!(persisted, token);
    }

    #[tokio::test]
    async fn failed_store_write_still_returns_the_token() {
        use crate::cache::manager::TokenCacheManager;
        use crate::provider::client::ProviderClient;
        use crate::store::file_store::FileStore;
        use crate::tests::common::provider_config;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/oauth2/token/");
                then.status(200).json_body(good_provider_body());
            })
            .await;

        // a directory cannot be overwritten as a record file
        let cache_dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(cache_dir.path());
        let provider = ProviderClient::new(&provider_config(&server.base_url())).unwrap();
        let manager = TokenCacheManager::new(
            provider,
            store.clone(),
            server.base_url(),
            "test-user".to_owned(),
        );

        // caching is best-effort: the acquisition still succeeds
        let token = manager.get_token(true).await.expect("token despite failed cache write");
        assert_eq!(token.access_token, "1234");
        assert_eq!(mock.hits_async().await, 1);

        // and nothing usable was persisted
        assert!(store.read().await.is_err());
    }

    #[tokio::test]
    async fn transport_failure_normalizes_to_code_500() {
        // nothing listens here
        let svc = build_service("http://127.0.0.1:9");

        let err = svc.manager.get_token(false).await.expect_err("no provider");
        let envelope = err.to_response();

        assert!(matches!(err, AuthError::Transport(_)));
        assert_eq!(envelope.error.code, 500);
        assert!(envelope.error.message.starts_with("Invalid server response: "));
    }
}
