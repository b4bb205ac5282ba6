mod common;

use common::{token_for, TestApp};
use paman::{
    common::error::{AppError, Denial},
    models::auth::{RegisterProfilePayload, Role, UserSearchAttribute, UserSearchQuery},
};
use uuid::Uuid;

fn profile(name: &str, email: &str) -> RegisterProfilePayload {
    RegisterProfilePayload {
        full_name: name.to_string(),
        email: email.to_string(),
        location: Some("Merauke".to_string()),
    }
}

#[tokio::test]
async fn test_register_profile_defaults_to_user_role() {
    let app = TestApp::new();
    let subject = Uuid::new_v4();
    let service = &app.state.user_service;

    let user = service
        .register_profile(subject, profile("Yohanes Wenda", "yohanes@papuamandiri.id"))
        .await
        .expect("Failed to register profile");
    assert_eq!(user.id, subject);
    assert_eq!(user.role, Role::User);

    // O mesmo token agora resolve uma sessão
    let session = app
        .state
        .auth_service
        .resolve_session(&token_for(subject))
        .await
        .unwrap();
    assert_eq!(session.role, Role::User);

    let err = service
        .register_profile(subject, profile("Yohanes Wenda", "outro@papuamandiri.id"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProfileAlreadyExists));
}

#[tokio::test]
async fn test_register_profile_validates_payload() {
    let app = TestApp::new();
    let service = &app.state.user_service;

    let err = service
        .register_profile(Uuid::new_v4(), profile("Yo", "yohanes@papuamandiri.id"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(m) if m == "Nama lengkap wajib diisi (minimal 8 karakter)"));

    let err = service
        .register_profile(Uuid::new_v4(), profile("Yohanes Wenda", "bukan-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(m) if m == "Email tidak valid"));
}

#[tokio::test]
async fn test_token_without_profile_has_no_session() {
    let app = TestApp::new();
    let auth = &app.state.auth_service;
    let subject = Uuid::new_v4();

    assert_eq!(auth.validate_token(&token_for(subject)).unwrap(), subject);
    assert!(matches!(
        auth.resolve_session(&token_for(subject)).await,
        Err(AppError::ProfileNotFound)
    ));
    assert!(matches!(
        auth.validate_token("bukan.token.jwt"),
        Err(AppError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_me_returns_own_profile() {
    let app = TestApp::new();
    let session = app.session(Role::AdminPemerintah, "Dinas Perindag");

    let me = app.state.user_service.me(&session).await.unwrap();
    assert_eq!(me.id, session.user_id);
    assert_eq!(me.user_name, "Dinas Perindag");
}

#[tokio::test]
async fn test_admin_searches_users_by_attribute() {
    let app = TestApp::new();
    let admin = app.session(Role::SuperAdmin, "Root Admin");
    app.session(Role::User, "Maria Wonda");
    app.session(Role::User, "Markus Tabuni");
    app.session(Role::AdminKomunitas, "Yosina Rumbiak");
    let service = &app.state.user_service;

    let page = service
        .search_users(
            &admin,
            UserSearchQuery {
                q: Some("mar".to_string()),
                attribute: Some(UserSearchAttribute::UserName),
                page: Some(1),
                limit: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);

    let by_email = service
        .search_users(
            &admin,
            UserSearchQuery {
                q: Some("yosina".to_string()),
                attribute: Some(UserSearchAttribute::UserEmail),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_email.items.len(), 1);
    assert_eq!(by_email.items[0].user_name, "Yosina Rumbiak");

    // Limite padrão de 5 por página
    let everyone = service.search_users(&admin, UserSearchQuery::default()).await.unwrap();
    assert_eq!(everyone.total_count, 4);
    assert_eq!(everyone.total_pages, 1);
}

#[tokio::test]
async fn test_user_administration_requires_super_admin() {
    let app = TestApp::new();
    let community = app.session(Role::AdminKomunitas, "Mama Yosina");
    let target = app.session(Role::User, "Warga Biasa");
    let service = &app.state.user_service;

    assert!(matches!(
        service.search_users(&community, UserSearchQuery::default()).await,
        Err(AppError::Forbidden(Denial::MissingRole(_)))
    ));
    assert!(matches!(
        service.delete_user(&community, target.user_id).await,
        Err(AppError::Forbidden(Denial::MissingRole(_)))
    ));
    assert!(matches!(
        app.state.dashboard_service.statistics(&community).await,
        Err(AppError::Forbidden(Denial::MissingRole(_)))
    ));
}

#[tokio::test]
async fn test_delete_user_and_statistics() {
    let app = TestApp::new();
    let admin = app.session(Role::SuperAdmin, "Root Admin");
    let target = app.session(Role::User, "Warga Biasa");
    app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);

    let stats = app.state.dashboard_service.statistics(&admin).await.unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_materi, 1);

    app.state.user_service.delete_user(&admin, target.user_id).await.unwrap();
    assert!(matches!(
        app.state.user_service.delete_user(&admin, target.user_id).await,
        Err(AppError::NotFound(_))
    ));

    let stats = app.state.dashboard_service.statistics(&admin).await.unwrap();
    assert_eq!(stats.total_users, 1);
}
