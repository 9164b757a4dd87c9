//! Unit tests for token service

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::domain::value_objects::ClientMetadata;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{MockTokenRepository, TokenRepository};
use crate::services::token::{TokenService, TokenServiceConfig};

fn create_test_service() -> (TokenService<MockTokenRepository>, Arc<MockTokenRepository>) {
    let repo = Arc::new(MockTokenRepository::new());
    let config = TokenServiceConfig::with_secret("test-secret-key-for-unit-tests");
    let service = TokenService::new(Arc::clone(&repo), config).unwrap();
    (service, repo)
}

fn client() -> ClientMetadata {
    ClientMetadata::new(Some("198.51.100.4".to_string()), Some("test-agent".to_string()))
}

fn assert_token_error(result: Result<impl std::fmt::Debug, DomainError>, expected: TokenError) {
    match result {
        Err(DomainError::Token(err)) => assert_eq!(err, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[test]
fn test_rejects_empty_secret() {
    let repo = Arc::new(MockTokenRepository::new());
    let result = TokenService::new(repo, TokenServiceConfig::with_secret(""));
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[test]
fn test_rejects_non_positive_ttl() {
    let repo = Arc::new(MockTokenRepository::new());
    let mut config = TokenServiceConfig::with_secret("secret");
    config.access_ttl_seconds = 0;
    assert!(TokenService::new(repo, config).is_err());
}

#[tokio::test]
async fn test_issue_then_verify_round_trips_user_id() {
    let (service, repo) = create_test_service();
    let user_id = Uuid::new_v4();

    let pair = service.issue_tokens(user_id, &client()).await.unwrap();

    assert_eq!(pair.access_ttl_seconds, 900);
    assert_eq!(pair.refresh_ttl_seconds, 2_592_000);

    let claims = service.verify_access_token(&pair.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.iss, "saasboard");

    let records = repo.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, pair.refresh_record_id);
    assert_eq!(records[0].user_id, user_id);
    assert_eq!(records[0].ip_address.as_deref(), Some("198.51.100.4"));
    assert!(!records[0].revoked);
}

#[tokio::test]
async fn test_issue_fails_when_record_cannot_be_saved() {
    let (service, repo) = create_test_service();
    repo.fail_saves(true);

    let result = service.issue_tokens(Uuid::new_v4(), &client()).await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[tokio::test]
async fn test_verify_rejects_garbage_and_foreign_signatures() {
    let (service, _) = create_test_service();
    assert_token_error(service.verify_access_token("not.a.jwt"), TokenError::InvalidToken);

    let other_repo = Arc::new(MockTokenRepository::new());
    let other = TokenService::new(other_repo, TokenServiceConfig::with_secret("another-secret")).unwrap();
    let pair = other.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    assert_token_error(service.verify_access_token(&pair.access_token), TokenError::InvalidToken);
    assert!(service.inspect_access_token(&pair.access_token).is_none());
}

#[tokio::test]
async fn test_verify_distinguishes_expired_tokens() {
    let (service, _) = create_test_service();
    let mut claims = Claims::new_access_token(Uuid::new_v4(), 900, "saasboard");
    claims.iat -= 3600;
    claims.exp = Utc::now().timestamp() - 10;
    let token = service.encode_jwt(&claims).unwrap();

    assert_token_error(service.verify_access_token(&token), TokenError::ExpiredToken);
    assert!(service.inspect_access_token(&token).is_none());
}

#[tokio::test]
async fn test_verify_rejects_wrong_issuer() {
    let (service, _) = create_test_service();
    let claims = Claims::new_access_token(Uuid::new_v4(), 900, "someone-else");
    let token = service.encode_jwt(&claims).unwrap();

    assert_token_error(service.verify_access_token(&token), TokenError::InvalidToken);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let (service, _) = create_test_service();
    let pair = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    assert_token_error(service.verify_access_token(&pair.refresh_token), TokenError::InvalidToken);
}

#[tokio::test]
async fn test_rotation_issues_new_pair_and_revokes_old_record() {
    let (service, repo) = create_test_service();
    let user_id = Uuid::new_v4();
    let first = service.issue_tokens(user_id, &client()).await.unwrap();

    let second = service
        .rotate_refresh_token(&first.refresh_token, &client())
        .await
        .unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_ne!(first.refresh_record_id, second.refresh_record_id);
    let claims = service.verify_access_token(&second.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);

    let records = repo.all().await;
    assert_eq!(records.len(), 2);
    let old = records.iter().find(|r| r.id == first.refresh_record_id).unwrap();
    let new = records.iter().find(|r| r.id == second.refresh_record_id).unwrap();
    assert!(old.revoked);
    assert!(!new.revoked);
}

#[tokio::test]
async fn test_rotated_token_cannot_be_replayed() {
    let (service, _) = create_test_service();
    let pair = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    service
        .rotate_refresh_token(&pair.refresh_token, &client())
        .await
        .unwrap();

    assert_token_error(
        service.rotate_refresh_token(&pair.refresh_token, &client()).await,
        TokenError::RevokedOrMissing,
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_single_winner() {
    let (service, repo) = create_test_service();
    let service = Arc::new(service);
    let pair = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let token = pair.refresh_token.clone();
        handles.push(tokio::spawn(async move {
            service.rotate_refresh_token(&token, &ClientMetadata::default()).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::Token(TokenError::RevokedOrMissing)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    // original record plus exactly one rotated record
    assert_eq!(repo.all().await.len(), 2);
}

#[tokio::test]
async fn test_expired_refresh_token_fails_even_if_not_revoked() {
    let (service, repo) = create_test_service();
    service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();
    let mut record = repo.all().await.remove(0);

    record.created_at = Utc::now() - Duration::days(31);
    record.expires_at = Utc::now() - Duration::seconds(5);
    repo.put(record.clone()).await;
    let expired = service
        .encode_jwt(&Claims::new_refresh_token(&record, "saasboard"))
        .unwrap();

    assert_token_error(
        service.rotate_refresh_token(&expired, &client()).await,
        TokenError::ExpiredToken,
    );
    assert!(!repo.all().await[0].revoked);
}

#[tokio::test]
async fn test_rotation_with_unknown_identifier() {
    let (service, repo) = create_test_service();
    service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    let other_repo = Arc::new(MockTokenRepository::new());
    let other = TokenService::new(
        other_repo,
        TokenServiceConfig::with_secret("test-secret-key-for-unit-tests"),
    )
    .unwrap();
    let foreign = other.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    assert_token_error(
        service.rotate_refresh_token(&foreign.refresh_token, &client()).await,
        TokenError::RevokedOrMissing,
    );
    assert_eq!(repo.all().await.len(), 1);
}

#[tokio::test]
async fn test_access_token_cannot_be_used_to_rotate() {
    let (service, _) = create_test_service();
    let pair = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    assert_token_error(
        service.rotate_refresh_token(&pair.access_token, &client()).await,
        TokenError::InvalidToken,
    );
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let (service, repo) = create_test_service();
    let pair = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    service.revoke_refresh_token(&pair.refresh_token).await.unwrap();
    service.revoke_refresh_token(&pair.refresh_token).await.unwrap();
    service.revoke_refresh_token("garbage").await.unwrap();

    assert!(repo.all().await[0].revoked);
    assert_token_error(
        service.rotate_refresh_token(&pair.refresh_token, &client()).await,
        TokenError::RevokedOrMissing,
    );
}

#[tokio::test]
async fn test_revoked_record_lookup_is_unaffected_by_other_users() {
    let (service, repo) = create_test_service();
    let a = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();
    let b = service.issue_tokens(Uuid::new_v4(), &client()).await.unwrap();

    service.revoke_refresh_token(&a.refresh_token).await.unwrap();

    let records = repo.all().await;
    let b_record = records.iter().find(|r| r.id == b.refresh_record_id).unwrap();
    assert!(!b_record.revoked);
    assert!(repo
        .find_by_identifier(&b_record.token_identifier)
        .await
        .unwrap()
        .is_some());
}
