use worktunes_api::error::ApiError;
use worktunes_api::usecase::auth::{
    GetMeUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase,
};
use worktunes_auth_types::token::{validate_access_token, validate_refresh_token};
use worktunes_testing::auth::keys;

use crate::helpers::{MockSessionStore, MockUserRepo, TEST_PASSWORD, test_user};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        password: TEST_PASSWORD.to_owned(),
        username: "newcomer".to_owned(),
    }
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_with_default_profile_and_session() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let profiles_handle = users.profiles_handle();
    let sessions = MockSessionStore::default();
    let tokens_handle = sessions.tokens_handle();

    let usecase = RegisterUseCase {
        users,
        sessions,
        keys: keys(),
    };
    let output = usecase
        .execute(register_input("  New@Example.com "))
        .await
        .unwrap();

    assert_eq!(output.user.email, "new@example.com");
    assert!(output.user.is_active);
    assert_ne!(output.user.password_hash, TEST_PASSWORD);
    assert_eq!(users_handle.lock().unwrap().len(), 1);

    let profiles = profiles_handle.lock().unwrap();
    assert_eq!(profiles[0].user_id, output.user.id);
    assert_eq!(profiles[0].location, "Unknown");
    assert_eq!(profiles[0].timezone, "UTC");

    let info = validate_access_token(&output.tokens.access_token, &keys()).unwrap();
    assert_eq!(info.user_id, output.user.id);
    assert_eq!(
        tokens_handle.lock().unwrap().get(&output.user.id),
        Some(&output.tokens.refresh_token)
    );
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let existing = test_user();
    let usecase = RegisterUseCase {
        users: MockUserRepo::new(vec![existing.clone()]),
        sessions: MockSessionStore::default(),
        keys: keys(),
    };

    let result = usecase.execute(register_input(&existing.email)).await;
    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_and_record_last_login() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let sessions = MockSessionStore::default();
    let tokens_handle = sessions.tokens_handle();

    let usecase = LoginUseCase {
        users,
        sessions,
        keys: keys(),
    };
    let output = usecase
        .execute(LoginInput {
            email: user.email.to_uppercase(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(output.user.id, user.id);
    assert!(output.user.last_login_at.is_some());
    assert!(users_handle.lock().unwrap()[0].last_login_at.is_some());
    assert!(tokens_handle.lock().unwrap().contains_key(&user.id));
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let user = test_user();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: MockSessionStore::default(),
        keys: keys(),
    };

    let result = usecase
        .execute(LoginInput {
            email: user.email,
            password: "not-the-password".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_email_as_invalid_credentials() {
    let usecase = LoginUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionStore::default(),
        keys: keys(),
    };

    let result = usecase
        .execute(LoginInput {
            email: "ghost@example.com".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_deactivated_account() {
    let mut user = test_user();
    user.is_active = false;
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: MockSessionStore::default(),
        keys: keys(),
    };

    let result = usecase
        .execute(LoginInput {
            email: user.email,
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::AccountDeactivated)),
        "expected AccountDeactivated, got {result:?}"
    );
}

// ── RefreshUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rotate_refresh_token_and_reject_previous_one() {
    let user = test_user();
    let users = MockUserRepo::new(vec![user.clone()]);
    let sessions = MockSessionStore::default();
    let tokens_handle = sessions.tokens_handle();

    let login = LoginUseCase {
        users,
        sessions,
        keys: keys(),
    };
    let first = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let refresh = RefreshUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: MockSessionStore {
            tokens: tokens_handle.clone(),
        },
        keys: keys(),
    };
    let second = refresh.execute(&first.tokens.refresh_token).await.unwrap();

    assert_ne!(second.tokens.refresh_token, first.tokens.refresh_token);
    let info = validate_refresh_token(&second.tokens.refresh_token, &keys()).unwrap();
    assert_eq!(info.user_id, user.id);
    assert_eq!(
        tokens_handle.lock().unwrap().get(&user.id),
        Some(&second.tokens.refresh_token)
    );

    let replay = refresh.execute(&first.tokens.refresh_token).await;
    assert!(
        matches!(replay, Err(ApiError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {replay:?}"
    );
}

#[tokio::test]
async fn should_let_only_one_concurrent_refresh_win() {
    let user = test_user();
    let login = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: MockSessionStore::default(),
        keys: keys(),
    };
    let output = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();
    let tokens_handle = login.sessions.tokens_handle();

    let refresh = RefreshUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: login.sessions,
        keys: keys(),
    };
    let token = output.tokens.refresh_token;
    let (a, b) = tokio::join!(refresh.execute(&token), refresh.execute(&token));

    let winners: Vec<_> = [a, b].into_iter().filter_map(Result::ok).collect();
    assert_eq!(winners.len(), 1, "exactly one refresh must succeed");
    assert_eq!(
        tokens_handle.lock().unwrap().get(&user.id),
        Some(&winners[0].tokens.refresh_token)
    );
}

#[tokio::test]
async fn should_reject_access_token_as_refresh_token() {
    let user = test_user();
    let sessions = MockSessionStore::default();
    let login = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions,
        keys: keys(),
    };
    let output = login
        .execute(LoginInput {
            email: user.email.clone(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let refresh = RefreshUseCase {
        users: MockUserRepo::new(vec![user]),
        sessions: login.sessions,
        keys: keys(),
    };
    let result = refresh.execute(&output.tokens.access_token).await;
    assert!(matches!(result, Err(ApiError::InvalidRefreshToken)));
}

#[tokio::test]
async fn should_reject_refresh_after_logout() {
    let user = test_user();
    let register = RegisterUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionStore::default(),
        keys: keys(),
    };
    let output = register
        .execute(register_input("leaving@example.com"))
        .await
        .unwrap();

    let logout = LogoutUseCase {
        sessions: MockSessionStore {
            tokens: register.sessions.tokens_handle(),
        },
    };
    logout.execute(output.user.id).await.unwrap();

    let refresh = RefreshUseCase {
        users: MockUserRepo::new(vec![output.user.clone(), user]),
        sessions: logout.sessions,
        keys: keys(),
    };
    let result = refresh.execute(&output.tokens.refresh_token).await;
    assert!(matches!(result, Err(ApiError::InvalidRefreshToken)));
}

// ── GetMeUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_current_user() {
    let user = test_user();
    let usecase = GetMeUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };
    let me = usecase.execute(user.id).await.unwrap();
    assert_eq!(me.email, user.email);
}

#[tokio::test]
async fn should_return_user_not_found_for_deleted_account() {
    let usecase = GetMeUseCase {
        users: MockUserRepo::empty(),
    };
    let result = usecase.execute(uuid::Uuid::now_v7()).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}
