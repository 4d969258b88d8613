//! Identity layer tests: UserManager, RoleManager and startup seeding
//! over the in-memory store.

mod common;

use std::sync::Arc;

use useradmin::config::{AdminSeed, AppConfig};
use useradmin::db::seed_admin;
use useradmin::identity::{
    MemoryUserStore, PasswordOptions, PasswordValidator, RoleManager, UserManager, UserStore, UserValidator,
};
use useradmin::models::role::ADMIN_ROLE;
use useradmin::models::user::AppUser;
use common::*;

fn managers(require_unique_email: bool) -> (UserManager, RoleManager) {
    let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let users = UserManager::new(
        store.clone(),
        UserValidator { require_unique_email },
        PasswordValidator::default(),
    );
    (users, RoleManager::new(store))
}

#[tokio::test]
async fn test_create_and_find_by_name_is_case_insensitive() {
    let (users, _) = managers(true);
    let draft = AppUser::draft("Carol", "carol@example.com", "Carol", "Danvers");

    let (result, stored) = users.create(&draft, VALID_PASSWORD).await.expect("create");
    assert!(result.succeeded());
    let stored = stored.expect("stored user");

    let found = users.find_by_name("CAROL").await.expect("query").expect("found");
    assert_eq!(found.id, stored.id);
    assert_eq!(found.full_name(), "Carol Danvers");
    let by_email = users.find_by_email("Carol@Example.com").await.expect("query").expect("found");
    assert_eq!(by_email.id, stored.id);
}

#[tokio::test]
async fn test_failed_create_returns_no_user() {
    let (users, _) = managers(true);
    let draft = AppUser::draft("carol", "carol@example.com", "", "");

    let (result, stored) = users.create(&draft, "abc").await.expect("create");

    assert!(!result.succeeded());
    assert!(stored.is_none());
    assert!(users.users().await.expect("list").is_empty());
}

#[tokio::test]
async fn test_duplicate_email_allowed_when_not_required_unique() {
    let (users, _) = managers(false);
    let a = AppUser::draft("a", "shared@example.com", "", "");
    let b = AppUser::draft("b", "shared@example.com", "", "");

    assert!(users.create(&a, VALID_PASSWORD).await.expect("create").0.succeeded());
    assert!(users.create(&b, VALID_PASSWORD).await.expect("create").0.succeeded());
    assert_eq!(users.users().await.expect("list").len(), 2);
}

#[tokio::test]
async fn test_verify_password() {
    let (users, _) = managers(true);
    let draft = AppUser::draft("carol", "carol@example.com", "", "");
    let (_, stored) = users.create(&draft, VALID_PASSWORD).await.expect("create");
    let stored = stored.expect("stored");

    assert!(users.verify_password(&stored, VALID_PASSWORD).expect("verify"));
    assert!(!users.verify_password(&stored, "wrong").expect("verify"));
    // drafts carry no hash
    assert!(!users.verify_password(&draft, VALID_PASSWORD).expect("verify"));
}

#[tokio::test]
async fn test_update_of_deleted_user_fails_softly() {
    let (users, _) = managers(true);
    let (_, stored) = users
        .create(&AppUser::draft("carol", "carol@example.com", "", ""), VALID_PASSWORD)
        .await
        .expect("create");
    let stored = stored.expect("stored");

    assert!(users.delete(&stored).await.expect("delete").succeeded());
    let result = users.update(&stored).await.expect("update");

    assert!(!result.succeeded());
    assert_eq!(result.errors()[0].code, "UserNotFound");
    assert!(!users.delete(&stored).await.expect("delete again").succeeded());
}

#[tokio::test]
async fn test_custom_password_options() {
    let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let users = UserManager::new(
        store,
        UserValidator::default(),
        PasswordValidator::new(PasswordOptions {
            required_length: 12,
            require_digit: false,
            require_lowercase: true,
            require_uppercase: false,
            require_non_alphanumeric: false,
        }),
    );

    assert!(!users.validate_password(VALID_PASSWORD).succeeded());
    assert!(users.validate_password("correcthorsebattery").succeeded());
}

#[tokio::test]
async fn test_role_manager_create_and_duplicates() {
    let (_, roles) = managers(true);

    assert!(roles.create("Editors").await.expect("create").succeeded());
    let dup = roles.create("editors").await.expect("create");
    assert!(!dup.succeeded());
    assert_eq!(dup.errors()[0].code, "DuplicateRoleName");
    assert!(!roles.create("  ").await.expect("create").succeeded());

    let names: Vec<String> = roles.roles().await.expect("roles").into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Editors".to_string()]);
}

#[tokio::test]
async fn test_role_manager_ensure_is_idempotent() {
    let (_, roles) = managers(true);

    let first = roles.ensure(ADMIN_ROLE).await.expect("ensure");
    let second = roles.ensure("ADMIN").await.expect("ensure");

    assert_eq!(first, second);
    assert_eq!(roles.roles().await.expect("roles").len(), 1);
}

#[tokio::test]
async fn test_seed_admin_creates_account_in_admin_role() {
    let admin = setup_admin_seeded().await;
    let users = admin.user_manager();

    let account = users.find_by_name(ADMIN_USER).await.expect("query").expect("seeded");
    assert!(users.is_in_role(&account, ADMIN_ROLE).await.expect("roles"));
    assert!(users.verify_password(&account, ADMIN_PASS).expect("verify"));
}

#[tokio::test]
async fn test_seed_admin_twice_keeps_existing_account() {
    let admin = setup_admin_seeded().await;
    let config = test_config();

    seed_admin(admin.user_manager(), admin.role_manager(), &config.admin)
        .await
        .expect("second seed");

    assert_eq!(admin.list().await.expect("list").len(), 1);
    assert_eq!(admin.list_roles().await.expect("roles"), vec![ADMIN_ROLE.to_string()]);
}

#[tokio::test]
async fn test_seed_admin_with_weak_password_is_config_error() {
    let admin = setup_admin();
    let seed = AdminSeed {
        user_name: "root".to_string(),
        email: "root@example.com".to_string(),
        password: "weak".to_string(),
    };

    let result = seed_admin(admin.user_manager(), admin.role_manager(), &seed).await;

    assert!(matches!(result, Err(useradmin::errors::AppError::Config(_))));
    assert!(admin.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn test_config_password_rules_flow_into_admin() {
    let config = AppConfig::from_lookup(|key| match key {
        "PASSWORD_MIN_LENGTH" => Some("4".to_string()),
        "PASSWORD_REQUIRE_DIGIT" | "PASSWORD_REQUIRE_UPPERCASE" | "PASSWORD_REQUIRE_NON_ALPHANUMERIC" => {
            Some("false".to_string())
        }
        _ => None,
    })
    .expect("config");
    let admin = useradmin::build_admin(Arc::new(MemoryUserStore::new()), &config);

    let mut req = new_user("dave");
    req.password = "abcd".to_string();
    admin.create(&req).await.expect("relaxed rules accept a simple password");
}
