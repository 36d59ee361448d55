//! Reintentos de comandos
//!
//! Un comando que falla por conflicto de concurrencia se repite completo,
//! desde la validación. Cualquier otro error se devuelve tal cual.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::utils::errors::AppResult;

/// Espera base entre intentos; crece linealmente
const BASE_BACKOFF_MS: u64 = 25;

pub async fn with_retries<T, F, Fut>(operation: &str, attempts: u32, mut command: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match command().await {
            Err(error) if error.is_retryable() && attempt < attempts => {
                warn!(
                    "⚠️ {} falló por concurrencia (intento {}/{}): {}",
                    operation, attempt, attempts, error
                );
                tokio::time::sleep(Duration::from_millis(BASE_BACKOFF_MS * u64::from(attempt))).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_concurrency_conflicts_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_retries("test", 3, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(AppError::ConcurrencyConflict("lock timeout".into()))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: AppResult<()> = with_retries("test", 2, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::ConcurrencyConflict("deadlock".into()))
        })
        .await;

        assert!(matches!(result, Err(AppError::ConcurrencyConflict(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_validation_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: AppResult<()> = with_retries("test", 5, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::Conflict("duplicate day".into()))
        })
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
