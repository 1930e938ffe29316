// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for API key lookup.

#[cfg(test)]
mod tests {
    use crate::config::SecretKeySelector;
    use crate::credentials::{CredentialStore, StaticCredentialStore};
    use crate::errors::SolverError;

    fn selector(name: &str, key: &str) -> SecretKeySelector {
        SecretKeySelector {
            name: name.to_string(),
            key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_static_store_returns_value() {
        let store =
            StaticCredentialStore::default().with_secret("cert-manager", "pdns", "api-key", "s3cr3t\n");

        let value = store
            .secret_value("cert-manager", &selector("pdns", "api-key"))
            .await
            .unwrap();

        assert_eq!(value, "s3cr3t");
    }

    #[tokio::test]
    async fn test_static_store_missing_secret() {
        let store = StaticCredentialStore::default();

        let err = store
            .secret_value("cert-manager", &selector("pdns", "api-key"))
            .await
            .unwrap_err();

        match err {
            SolverError::Credential {
                namespace, name, ..
            } => {
                assert_eq!(namespace, "cert-manager");
                assert_eq!(name, "pdns");
            }
            other => panic!("expected Credential, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_static_store_missing_key() {
        let store = StaticCredentialStore::default().with_secret("ns", "pdns", "api-key", "v");

        let err = store
            .secret_value("ns", &selector("pdns", "other"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("key \"other\" not found"));
    }

    #[tokio::test]
    async fn test_secret_is_namespace_scoped() {
        let store = StaticCredentialStore::default().with_secret("team-a", "pdns", "api-key", "v");

        assert!(store
            .secret_value("team-b", &selector("pdns", "api-key"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_value_is_rejected() {
        let store = StaticCredentialStore::default().with_secret("ns", "pdns", "api-key", "  ");

        let err = store
            .secret_value("ns", &selector("pdns", "api-key"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[tokio::test]
    async fn test_fallback_answers_unknown_secrets() {
        let store = StaticCredentialStore::with_fallback("from-env");

        let value = store
            .secret_value("any", &selector("whatever", "k"))
            .await
            .unwrap();
        assert_eq!(value, "from-env");
    }
}
