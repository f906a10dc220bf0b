use std::error::Error;
use std::sync::Arc;
use userhub_core::{
    CreateUserRequest, InMemoryUserRepository, ManualClock, RepoError, UpdateUserRequest,
    UserRepository, UserService, UserServiceError, UserValidationError,
};

const T0: i64 = 1_700_000_000_000;

fn service() -> (
    UserService<Arc<InMemoryUserRepository>, Arc<ManualClock>>,
    Arc<ManualClock>,
) {
    let clock = Arc::new(ManualClock::new(T0));
    let repo = Arc::new(InMemoryUserRepository::new());
    (UserService::new(repo, Arc::clone(&clock)), clock)
}

fn create_request(email: &str, name: &str, role: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
    }
}

#[test]
fn create_user_succeeds_with_valid_input() {
    let (svc, _) = service();

    let user = svc
        .create_user(&create_request("dev@example.com", "Dev User", "Engineer"))
        .unwrap();

    assert!(!user.id.is_empty());
    assert_eq!(user.email, "dev@example.com");
    assert_eq!(user.name, "Dev User");
    assert_eq!(user.role, "Engineer");
    assert!(!user.deactivated);
    assert_eq!(user.created_at, T0);
    assert_eq!(user.created_at, user.updated_at);
}

#[test]
fn create_user_trims_text_fields() {
    let (svc, _) = service();

    let user = svc
        .create_user(&create_request("  dev@example.com ", "\tDev User  ", " Engineer "))
        .unwrap();

    assert_eq!(user.email, "dev@example.com");
    assert_eq!(user.name, "Dev User");
    assert_eq!(user.role, "Engineer");
}

#[test]
fn create_user_rejects_invalid_input() {
    let (svc, _) = service();

    let cases = [
        (create_request("", "Dev", ""), UserValidationError::EmptyEmail),
        (
            create_request("dev.example.com", "Dev", ""),
            UserValidationError::InvalidEmail,
        ),
        (
            create_request("dev@example.com", "   ", ""),
            UserValidationError::EmptyName,
        ),
        (CreateUserRequest::default(), UserValidationError::EmptyEmail),
    ];

    for (request, expected) in cases {
        match svc.create_user(&request) {
            Err(UserServiceError::Validation(actual)) => assert_eq!(actual, expected),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
    assert!(svc.repository().is_empty().unwrap());
}

#[test]
fn get_user_roundtrips_created_user() {
    let (svc, _) = service();
    let created = svc
        .create_user(&create_request("ann@example.com", "Ann", ""))
        .unwrap();

    let fetched = svc.get_user(&created.id).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn get_user_requires_id() {
    let (svc, _) = service();

    let err = svc.get_user("").unwrap_err();
    assert!(matches!(err, UserServiceError::InvalidArgument(_)));
    assert_eq!(err.to_string(), "id is required");
}

#[test]
fn get_user_missing_maps_not_found_with_cause() {
    let (svc, _) = service();

    let err = svc.get_user("missing").unwrap_err();
    match &err {
        UserServiceError::NotFound { id, source } => {
            assert_eq!(id, "missing");
            assert_eq!(*source, RepoError::NotFound("missing".to_string()));
        }
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(err.source().is_some());
}

#[test]
fn returned_users_do_not_alias_storage() {
    let (svc, _) = service();
    let mut created = svc
        .create_user(&create_request("iso@example.com", "Iso", "qa"))
        .unwrap();
    created.name = "changed".to_string();

    let mut listed = svc.list_users().unwrap();
    listed[0].email = "changed@example.com".to_string();

    let fetched = svc.get_user(&created.id).unwrap();
    assert_eq!(fetched.name, "Iso");
    assert_eq!(fetched.email, "iso@example.com");
    assert_ne!(fetched.name, created.name);
    assert_ne!(fetched.email, listed[0].email);
}

#[test]
fn list_users_returns_every_user() {
    let (svc, _) = service();
    assert!(svc.list_users().unwrap().is_empty());

    svc.create_user(&create_request("a@example.com", "A", ""))
        .unwrap();
    svc.create_user(&create_request("b@example.com", "B", ""))
        .unwrap();

    assert_eq!(svc.list_users().unwrap().len(), 2);
}

#[test]
fn update_role_only_keeps_email_and_name() {
    let (svc, clock) = service();
    let created = svc
        .create_user(&create_request("upd@example.com", "Upd", "Engineer"))
        .unwrap();
    let later = clock.advance(5_000);

    let updated = svc
        .update_user(&UpdateUserRequest {
            id: created.id.clone(),
            role: Some("Manager".to_string()),
            ..UpdateUserRequest::default()
        })
        .unwrap();

    assert_eq!(updated.email, "upd@example.com");
    assert_eq!(updated.name, "Upd");
    assert_eq!(updated.role, "Manager");
    assert!(!updated.deactivated);
    assert_eq!(updated.created_at, T0);
    assert_eq!(updated.updated_at, later);
}

#[test]
fn update_sets_deactivated_even_when_false() {
    let (svc, _) = service();
    let created = svc
        .create_user(&create_request("flag@example.com", "Flag", ""))
        .unwrap();

    let deactivated = svc
        .update_user(&UpdateUserRequest {
            id: created.id.clone(),
            deactivated: true,
            ..UpdateUserRequest::default()
        })
        .unwrap();
    assert!(deactivated.deactivated);
    assert!(!deactivated.is_active());

    let reactivated = svc
        .update_user(&UpdateUserRequest {
            id: created.id.clone(),
            ..UpdateUserRequest::default()
        })
        .unwrap();
    assert!(!reactivated.deactivated);
}

#[test]
fn update_refresh_is_visible_to_later_reads() {
    let (svc, clock) = service();
    let created = svc
        .create_user(&create_request("ts@example.com", "Ts", ""))
        .unwrap();
    let later = clock.advance(60_000);

    let updated = svc
        .update_user(&UpdateUserRequest {
            id: created.id.clone(),
            name: Some("Ts Renamed".to_string()),
            ..UpdateUserRequest::default()
        })
        .unwrap();

    let fetched = svc.get_user(&created.id).unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.updated_at, later);
}

#[test]
fn update_ignores_blank_text_fields() {
    let (svc, _) = service();
    let created = svc
        .create_user(&create_request("blank@example.com", "Blank", "ops"))
        .unwrap();

    let updated = svc
        .update_user(&UpdateUserRequest {
            id: created.id.clone(),
            email: Some(String::new()),
            name: Some("   ".to_string()),
            role: None,
            deactivated: false,
        })
        .unwrap();

    assert_eq!(updated.email, "blank@example.com");
    assert_eq!(updated.name, "Blank");
    assert_eq!(updated.role, "ops");
}

#[test]
fn update_stores_email_without_at_sign() {
    let (svc, _) = service();
    let created = svc
        .create_user(&create_request("mail@example.com", "Mail", ""))
        .unwrap();

    let updated = svc
        .update_user(&UpdateUserRequest {
            id: created.id.clone(),
            email: Some(" not-an-address ".to_string()),
            ..UpdateUserRequest::default()
        })
        .unwrap();

    assert_eq!(updated.email, "not-an-address");
    assert_eq!(svc.get_user(&created.id).unwrap().email, "not-an-address");
}

#[test]
fn update_user_errors() {
    let (svc, _) = service();

    let err = svc.update_user(&UpdateUserRequest::default()).unwrap_err();
    assert!(matches!(err, UserServiceError::InvalidArgument(_)));

    let err = svc
        .update_user(&UpdateUserRequest {
            id: "ghost".to_string(),
            ..UpdateUserRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, UserServiceError::NotFound { ref id, .. } if id == "ghost"));
}

#[test]
fn delete_user_then_delete_again_is_not_found() {
    let (svc, _) = service();
    let created = svc
        .create_user(&create_request("del@example.com", "Del", ""))
        .unwrap();

    svc.delete_user(&created.id).unwrap();
    assert!(matches!(
        svc.get_user(&created.id),
        Err(UserServiceError::NotFound { .. })
    ));
    assert!(matches!(
        svc.delete_user(&created.id),
        Err(UserServiceError::NotFound { .. })
    ));
    assert!(matches!(
        svc.delete_user(""),
        Err(UserServiceError::InvalidArgument(_))
    ));
}

#[test]
fn concurrent_service_creates_are_all_stored() {
    let (svc, _) = service();
    let svc = Arc::new(svc);

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let svc = Arc::clone(&svc);
            scope.spawn(move || {
                for n in 0..25 {
                    svc.create_user(&create_request(
                        &format!("u{worker}-{n}@example.com"),
                        "Worker",
                        "",
                    ))
                    .unwrap();
                }
            });
        }
    });

    assert_eq!(svc.repository().len().unwrap(), 200);
    let ids: std::collections::HashSet<_> = svc
        .list_users()
        .unwrap()
        .into_iter()
        .map(|user| user.id)
        .collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn service_accepts_trait_object_repository() {
    let repo: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let svc = UserService::new(Arc::clone(&repo), ManualClock::new(T0));

    let created = svc
        .create_user(&create_request("dyn@example.com", "Dyn", ""))
        .unwrap();
    assert_eq!(repo.get(&created.id).unwrap(), created);
}
