//! End-to-end tests for the axum HTTP layer.
//!
//! These tests use mock repositories - no database required.
//! Run with: `cargo test --features "axum_api mocks" --test e2e_axum`

#![cfg(all(feature = "axum_api", feature = "mocks"))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use orgbook::api::axum::{AppState, routes};
use orgbook::crypto::{Argon2Hasher, PasswordHasher};
use orgbook::repository::{CreateMembership, NewOrganization, NewUser};
use orgbook::session::InMemorySessionRepository;
use orgbook::storage::InMemoryAvatarStorage;
use orgbook::{
    GlobalRole, MembershipRepository, MockContactRepository, MockMembershipRepository,
    MockOrganizationRepository, MockUserRepository, OrgRole, Organization, OrganizationRepository,
    OrgbookConfig, User, UserRepository,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const PASSWORD: &str = "password123";

struct TestApp {
    router: Router,
    users: MockUserRepository,
    organizations: MockOrganizationRepository,
    memberships: MockMembershipRepository,
    contacts: MockContactRepository,
    storage: InMemoryAvatarStorage,
}

fn create_app() -> TestApp {
    let users = MockUserRepository::new();
    let organizations = MockOrganizationRepository::new();
    let memberships = MockMembershipRepository::new();
    let contacts = MockContactRepository::new();
    let storage = InMemoryAvatarStorage::new();

    let state = AppState {
        user_repository: users.clone(),
        organization_repository: organizations.clone(),
        membership_repository: memberships.clone(),
        contact_repository: contacts.clone(),
        session_repository: InMemorySessionRepository::new(),
        avatar_storage: storage.clone(),
        config: Arc::new(OrgbookConfig::development()),
    };

    TestApp {
        router: routes().with_state(state),
        users,
        organizations,
        memberships,
        contacts,
        storage,
    }
}

impl TestApp {
    async fn user(&self, name: &str, email: &str, global_role: GlobalRole) -> User {
        let hashed_password = Argon2Hasher::new(1024, 1, 1).hash(PASSWORD).unwrap();
        self.users
            .create_user(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                hashed_password,
                global_role,
            })
            .await
            .unwrap()
    }

    async fn organization(&self, slug: &str, owner: &User) -> Organization {
        let org = self
            .organizations
            .create(NewOrganization {
                name: slug.to_owned(),
                slug: slug.to_owned(),
                owner_user_id: owner.id,
            })
            .await
            .unwrap();
        self.join(&org, owner, OrgRole::Admin).await;
        org
    }

    async fn join(&self, org: &Organization, user: &User, role: OrgRole) {
        self.memberships
            .create(CreateMembership {
                organization_id: org.id,
                user_id: user.id,
                role,
            })
            .await
            .unwrap();
    }

    /// Logs in and returns the `Cookie` header value.
    async fn login(&self, email: &str) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "email": email, "password": PASSWORD }).to_string(),
            ))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

fn png_payload() -> Value {
    json!({
        "file_name": "face.png",
        "content_type": "image/png",
        "data": STANDARD.encode([0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]),
    })
}

fn storage_path(avatar_url: &Value) -> String {
    avatar_url
        .as_str()
        .unwrap()
        .trim_start_matches("/storage/")
        .to_owned()
}

#[tokio::test]
async fn test_healthz() {
    let app = create_app();
    let (status, body) = app.send("GET", "/healthz", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requires_session() {
    let app = create_app();

    let (status, body) = app.send("GET", "/contacts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = app
        .send("GET", "/organizations", Some("orgbook_session=forged.abcdef"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_app();
    app.user("Alice", "alice@example.com", GlobalRole::Member).await;

    let (status, body) = app
        .send(
            "POST",
            "/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_contacts_without_organization() {
    let app = create_app();
    app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let cookie = app.login("alice@example.com").await;

    let (status, body) = app.send("GET", "/contacts", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NO_ACTIVE_ORGANIZATION");
}

#[tokio::test]
async fn test_create_list_and_duplicate_email_conflict() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    app.organization("acme", &alice).await;
    let cookie = app.login("alice@example.com").await;

    let (status, created) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&cookie),
            Some(json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@example.com",
                "notes": ["met at the fair", "  "],
                "custom_fields": [{ "key": "company", "value": "Globex" }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["notes"].as_array().unwrap().len(), 1);
    assert_eq!(created["notes"][0]["author_name"], "Alice");
    assert_eq!(created["custom_fields"][0]["key"], "company");

    let (status, conflict) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&cookie),
            Some(json!({
                "first_name": "Janet",
                "last_name": "Doe",
                "email": "Jane@Example.com",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        conflict,
        json!({ "code": "DUPLICATE_EMAIL", "existing_contact_id": created["id"] })
    );

    let (status, list) = app.send("GET", "/contacts", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, found) = app
        .send("GET", "/contacts?search=DOE", Some(&cookie), None)
        .await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    let (_, none) = app
        .send("GET", "/contacts?search=zzz", Some(&cookie), None)
        .await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_errors_are_field_keyed() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    app.organization("acme", &alice).await;
    let cookie = app.login("alice@example.com").await;

    let (status, body) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&cookie),
            Some(json!({ "first_name": "", "last_name": "Doe", "email": "nope" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["errors"]["first_name"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"].get("last_name").is_none());
}

#[tokio::test]
async fn test_member_can_read_and_add_notes_but_not_write() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let bob = app.user("Bob", "bob@example.com", GlobalRole::Member).await;
    let acme = app.organization("acme", &alice).await;
    app.join(&acme, &bob, OrgRole::Member).await;

    let alice_cookie = app.login("alice@example.com").await;
    let (_, created) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&alice_cookie),
            Some(json!({ "first_name": "Jane", "last_name": "Doe" })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let bob_cookie = app.login("bob@example.com").await;
    let (status, _) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&bob_cookie),
            Some(json!({ "first_name": "John", "last_name": "Roe" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("DELETE", &format!("/contacts/{id}"), Some(&bob_cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("GET", "/contacts/create", Some(&bob_cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, note) = app
        .send(
            "POST",
            &format!("/contacts/{id}/notes"),
            Some(&bob_cookie),
            Some(json!({ "body": "called back" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["author_name"], "Bob");

    let (status, shown) = app
        .send("GET", &format!("/contacts/{id}"), Some(&bob_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["notes"][0]["body"], "called back");
}

#[tokio::test]
async fn test_contacts_are_isolated_between_organizations() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let carol = app.user("Carol", "carol@example.com", GlobalRole::Member).await;
    app.organization("acme", &alice).await;
    app.organization("globex", &carol).await;

    let alice_cookie = app.login("alice@example.com").await;
    let (_, created) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&alice_cookie),
            Some(json!({ "first_name": "Jane", "last_name": "Doe", "email": "jane@example.com" })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let carol_cookie = app.login("carol@example.com").await;
    let (_, list) = app.send("GET", "/contacts", Some(&carol_cookie), None).await;
    assert!(list.as_array().unwrap().is_empty());

    for (method, uri) in [
        ("GET", format!("/contacts/{id}")),
        ("GET", format!("/contacts/{id}/edit")),
        ("DELETE", format!("/contacts/{id}")),
        ("POST", format!("/contacts/{id}/duplicate")),
    ] {
        let (status, _) = app.send(method, &uri, Some(&carol_cookie), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }

    // same email is fine in another organization
    let (status, _) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&carol_cookie),
            Some(json!({ "first_name": "Jane", "last_name": "Doe", "email": "JANE@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_replaces_children_and_avatar() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    app.organization("acme", &alice).await;
    let cookie = app.login("alice@example.com").await;

    let (_, created) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&cookie),
            Some(json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "avatar": png_payload(),
                "notes": ["one", "two"],
                "custom_fields": [{ "key": "company", "value": "Globex" }],
            })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    let first_avatar = storage_path(&created["avatar_url"]);
    assert!(app.storage.exists(&first_avatar));

    let (status, replaced) = app
        .send(
            "PUT",
            &format!("/contacts/{id}"),
            Some(&cookie),
            Some(json!({ "first_name": "Jane", "last_name": "Doe", "avatar": png_payload() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(replaced["notes"].as_array().unwrap().is_empty());
    assert!(replaced["custom_fields"].as_array().unwrap().is_empty());
    assert_eq!(app.contacts.note_count(), 0);
    assert_eq!(app.contacts.meta_count(), 0);

    let second_avatar = storage_path(&replaced["avatar_url"]);
    assert_ne!(first_avatar, second_avatar);
    assert!(!app.storage.exists(&first_avatar));
    assert!(app.storage.exists(&second_avatar));

    let (status, removed) = app
        .send(
            "PUT",
            &format!("/contacts/{id}"),
            Some(&cookie),
            Some(json!({ "first_name": "Jane", "last_name": "Doe", "remove_avatar": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(removed["avatar_url"].is_null());
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_duplicate_and_delete() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    app.organization("acme", &alice).await;
    let cookie = app.login("alice@example.com").await;

    let (_, created) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&cookie),
            Some(json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@example.com",
                "avatar": png_payload(),
                "notes": ["keep me here"],
            })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, copy) = app
        .send("POST", &format!("/contacts/{id}/duplicate"), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(copy["id"], created["id"]);
    assert!(copy["email"].is_null());
    assert!(copy["notes"].as_array().unwrap().is_empty());
    assert_ne!(copy["avatar_url"], created["avatar_url"]);
    assert_eq!(app.storage.len(), 2);

    let (status, _) = app
        .send("DELETE", &format!("/contacts/{id}"), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.storage.len(), 1);

    let (status, _) = app
        .send("GET", &format!("/contacts/{id}"), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_switch_organization() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let carol = app.user("Carol", "carol@example.com", GlobalRole::Member).await;
    app.organization("acme", &alice).await;
    let globex = app.organization("globex", &alice).await;
    let initech = app.organization("initech", &carol).await;
    let cookie = app.login("alice@example.com").await;

    app.send(
        "POST",
        "/contacts/create",
        Some(&cookie),
        Some(json!({ "first_name": "Jane", "last_name": "Doe" })),
    )
    .await;

    let (status, switched) = app
        .send("POST", &format!("/switch-org/{}", globex.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(switched["slug"], "globex");

    let (_, list) = app.send("GET", "/contacts", Some(&cookie), None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = app
        .send("POST", &format!("/switch-org/{}", initech.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("POST", "/switch-org/999", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_organization_becomes_active() {
    let app = create_app();
    app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let cookie = app.login("alice@example.com").await;

    let (status, org) = app
        .send(
            "POST",
            "/organization/create",
            Some(&cookie),
            Some(json!({ "name": "Acme Corp", "slug": "Acme Corp" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(org["slug"], "acme-corp");
    assert_eq!(org["role"], "admin");

    let (status, _) = app
        .send(
            "POST",
            "/contacts/create",
            Some(&cookie),
            Some(json!({ "first_name": "Jane", "last_name": "Doe" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            "POST",
            "/organization/create",
            Some(&cookie),
            Some(json!({ "name": "Other", "slug": "acme-corp" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["slug"].is_array());

    let (_, list) = app.send("GET", "/organizations", Some(&cookie), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_membership_rules() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let bob = app.user("Bob", "bob@example.com", GlobalRole::Member).await;
    let acme = app.organization("acme", &alice).await;
    let cookie = app.login("alice@example.com").await;
    let members_uri = format!("/organizations/{}/users", acme.id);

    let (status, _) = app
        .send(
            "POST",
            &members_uri,
            Some(&cookie),
            Some(json!({ "user_id": bob.id, "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            "POST",
            &members_uri,
            Some(&cookie),
            Some(json!({ "user_id": bob.id, "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_MEMBER");

    let (status, body) = app
        .send(
            "POST",
            &members_uri,
            Some(&cookie),
            Some(json!({ "user_id": bob.id, "role": "owner" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["role"].is_array());

    let (_, listing) = app.send("GET", &members_uri, Some(&cookie), None).await;
    let names: Vec<_> = listing["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    // alice is the only admin
    let (status, body) = app
        .send(
            "PUT",
            &format!("{members_uri}/{}", alice.id),
            Some(&cookie),
            Some(json!({ "role": "member" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "LAST_ADMIN");

    let (status, body) = app
        .send("DELETE", &format!("{members_uri}/{}", alice.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CANNOT_REMOVE_OWNER");

    let (status, _) = app
        .send("DELETE", &format!("{members_uri}/{}", bob.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send("DELETE", &format!("{members_uri}/{}", bob.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_management_requires_admin() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let bob = app.user("Bob", "bob@example.com", GlobalRole::Member).await;
    let acme = app.organization("acme", &alice).await;
    app.join(&acme, &bob, OrgRole::Member).await;
    let cookie = app.login("bob@example.com").await;

    let (status, _) = app
        .send("GET", &format!("/organizations/{}/users", acme.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("GET", &format!("/organizations/{}/manage", acme.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, org) = app
        .send("GET", &format!("/organizations/{}", acme.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(org["role"], "member");
}

#[tokio::test]
async fn test_owner_cannot_leave() {
    let app = create_app();
    let alice = app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let bob = app.user("Bob", "bob@example.com", GlobalRole::Member).await;
    let acme = app.organization("acme", &alice).await;
    app.join(&acme, &bob, OrgRole::Admin).await;

    let alice_cookie = app.login("alice@example.com").await;
    let (status, body) = app
        .send("POST", &format!("/organizations/{}/leave", acme.id), Some(&alice_cookie), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "OWNER_CANNOT_LEAVE");

    let bob_cookie = app.login("bob@example.com").await;
    let (status, _) = app
        .send("POST", &format!("/organizations/{}/leave", acme.id), Some(&bob_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", "/contacts", Some(&bob_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NO_ACTIVE_ORGANIZATION");
}

#[tokio::test]
async fn test_user_administration() {
    let app = create_app();
    let admin = app.user("Admin", "admin@example.com", GlobalRole::Admin).await;
    app.user("Bob", "bob@example.com", GlobalRole::Member).await;

    let bob_cookie = app.login("bob@example.com").await;
    let (status, _) = app.send("GET", "/users", Some(&bob_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let cookie = app.login("admin@example.com").await;
    let (status, created) = app
        .send(
            "POST",
            "/users",
            Some(&cookie),
            Some(json!({
                "name": "Carol",
                "email": "carol@example.com",
                "password": "longenough",
                "global_role": "member",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("hashed_password").is_none());

    let (status, body) = app
        .send(
            "POST",
            "/users",
            Some(&cookie),
            Some(json!({ "name": "Carol", "email": "CAROL@example.com", "password": "longenough" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["email"].is_array());

    let (_, list) = app.send("GET", "/users", Some(&cookie), None).await;
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["Admin", "Bob", "Carol"]);

    let (status, body) = app
        .send("DELETE", &format!("/users/{}", admin.id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CANNOT_DELETE_SELF");

    let carol_id = created["id"].as_i64().unwrap();
    let (status, _) = app
        .send("DELETE", &format!("/users/{carol_id}"), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send("GET", &format!("/users/{carol_id}"), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = create_app();
    app.user("Alice", "alice@example.com", GlobalRole::Member).await;
    let cookie = app.login("alice@example.com").await;

    let (status, _) = app.send("POST", "/logout", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", "/organizations", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
