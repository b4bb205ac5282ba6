mod common;

use common::TestApp;
use paman::{
    common::error::{AppError, Denial},
    models::auth::Role,
};
use uuid::Uuid;

#[tokio::test]
async fn test_member_saves_and_lists_materials() {
    let app = TestApp::new();
    let member = app.session(Role::User, "Warga Biasa");
    let category = app.db.seed_category("Pertanian");
    let first = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", Some(category.id));
    let second = app.db.seed_material("Anyaman Noken", "Kerajinan tangan", None);
    let service = &app.state.saved_material_service;

    service.save(&member, first.id).await.expect("Failed to save material");
    service.save(&member, second.id).await.expect("Failed to save material");

    let saved = service.list(&member).await.unwrap();
    assert_eq!(saved.len(), 2);
    // Mais recente primeiro
    assert_eq!(saved[0].material.id, second.id);
    assert_eq!(saved[1].category_title.as_deref(), Some("Pertanian"));

    assert!(service.is_saved(Some(&member), first.id).await.unwrap());
}

#[tokio::test]
async fn test_saving_twice_is_a_conflict() {
    let app = TestApp::new();
    let member = app.session(Role::User, "Warga Biasa");
    let material = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);
    let service = &app.state.saved_material_service;

    service.save(&member, material.id).await.unwrap();
    let err = service.save(&member, material.id).await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateSaved));
    assert_eq!(service.list(&member).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_saving_unknown_material_is_not_found() {
    let app = TestApp::new();
    let member = app.session(Role::User, "Warga Biasa");

    let err = app
        .state
        .saved_material_service
        .save(&member, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = TestApp::new();
    let member = app.session(Role::User, "Warga Biasa");
    let material = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);
    let service = &app.state.saved_material_service;

    service.save(&member, material.id).await.unwrap();
    service.remove(&member, material.id).await.unwrap();
    service.remove(&member, material.id).await.unwrap();

    assert!(!service.is_saved(Some(&member), material.id).await.unwrap());
}

#[tokio::test]
async fn test_only_plain_users_keep_saved_materials() {
    let app = TestApp::new();
    let admin = app.session(Role::SuperAdmin, "Root Admin");
    let material = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);
    let service = &app.state.saved_material_service;

    let err = service.save(&admin, material.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(Denial::MissingRole(_))));
    assert!(service.list(&admin).await.is_err());
}

#[tokio::test]
async fn test_is_saved_without_session_is_false() {
    let app = TestApp::new();
    let material = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);

    let saved = app
        .state
        .saved_material_service
        .is_saved(None, material.id)
        .await
        .unwrap();
    assert!(!saved);
}

#[tokio::test]
async fn test_saved_lists_are_per_user() {
    let app = TestApp::new();
    let alice = app.session(Role::User, "Alice Wenda");
    let bob = app.session(Role::User, "Bob Kogoya");
    let material = app.db.seed_material("Budidaya Sagu", "Sagu di lahan rawa", None);
    let service = &app.state.saved_material_service;

    service.save(&alice, material.id).await.unwrap();

    assert!(service.list(&bob).await.unwrap().is_empty());
    assert!(!service.is_saved(Some(&bob), material.id).await.unwrap());
}
