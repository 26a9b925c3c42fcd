#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU32, Ordering};

    use http::StatusCode;

    use crate::config::settings::RetryConfig;
    use crate::content::error::ContentError;
    use crate::resilience::retry::RetrySettings;

    fn fast_retry(attempts: u32) -> RetrySettings {
        RetrySettings { attempts, base_delay_ms: 1, max_delay_ms: 4 }
    }

    #[tokio::test]
    async fn retryable_errors_use_every_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), ContentError> = fast_retry(3)
            .run_with_retry(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ContentError::Status(StatusCode::BAD_GATEWAY))
                },
                ContentError::is_retryable,
            )
            .await;

        assert!(matches!(result, Err(ContentError::Status(StatusCode::BAD_GATEWAY))));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), ContentError> = fast_retry(3)
            .run_with_retry(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ContentError::Status(StatusCode::NOT_FOUND))
                },
                ContentError::is_retryable,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = fast_retry(3)
            .run_with_retry(
                move || async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(ContentError::Transport("connection reset".to_owned()))
                    } else {
                        Ok("verses")
                    }
                },
                ContentError::is_retryable,
            )
            .await;

        assert_eq!(result.unwrap(), "verses");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_config_values_fall_back_to_defaults() {
        let cfg = RetryConfig { attempts: Some(0), base_delay_ms: None, max_delay_ms: Some(50) };
        let settings = RetrySettings::from(Some(&cfg));

        assert_eq!(settings.attempts, 1);
        assert_eq!(settings.base_delay_ms, 200);
        assert_eq!(settings.max_delay_ms, 50);

        assert_eq!(RetrySettings::from(None::<&RetryConfig>).attempts, 2);
    }

    #[test]
    fn backoff_doubles_up_to_cap_without_overflow() {
        let settings = RetrySettings { attempts: 3, base_delay_ms: 100, max_delay_ms: 300 };
        assert_eq!(settings.next_delay(100), 200);
        assert_eq!(settings.next_delay(200), 300);

        let huge = RetrySettings { attempts: 3, base_delay_ms: u64::MAX, max_delay_ms: u64::MAX };
        assert_eq!(huge.next_delay(u64::MAX), u64::MAX);
        assert_eq!(huge.next_delay(u64::MAX / 2 + 1), u64::MAX);
    }

    #[test]
    fn status_mapping() {
        assert!(ContentError::Transport("timeout".to_owned()).is_retryable());
        assert!(!ContentError::Decode("eof".to_owned()).is_retryable());
        assert_eq!(
            ContentError::Configuration("content.base_url".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ContentError::Status(StatusCode::NOT_FOUND).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
