use chrono::{Duration, Utc};

use crate::context::OrgContext;
use crate::crypto::Argon2Hasher;
use crate::repository::{CreateMembership, NewContact, NewOrganization, NewUser};
use crate::session::{InMemorySessionRepository, Session, SessionData, SessionRepository};
use crate::storage::AvatarUpload;
use crate::{
    GlobalRole, Membership, MembershipRepository, MetaFields, MockMembershipRepository,
    MockOrganizationRepository, MockUserRepository, OrgRole, Organization, OrganizationId,
    OrganizationRepository, User, UserRepository,
};

fn context(user_id: i64, organization_id: i64, role: OrgRole) -> OrgContext {
    let membership = Membership {
        id: 1,
        organization_id: OrganizationId(organization_id),
        user_id,
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    OrgContext::new(
        User::mock(user_id, "Test User", "test@example.com"),
        &membership,
        "test-session",
    )
}

pub fn admin_context(user_id: i64, organization_id: i64) -> OrgContext {
    context(user_id, organization_id, OrgRole::Admin)
}

pub fn member_context(user_id: i64, organization_id: i64) -> OrgContext {
    context(user_id, organization_id, OrgRole::Member)
}

pub fn new_contact(first: &str, last: &str, email: Option<&str>) -> NewContact {
    NewContact {
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        email: email.map(ToOwned::to_owned),
        phone: None,
        avatar_path: None,
        created_by: 1,
        notes: Vec::new(),
        meta: MetaFields::new(),
    }
}

pub fn png_upload() -> AvatarUpload {
    AvatarUpload {
        file_name: "face.png".to_owned(),
        content_type: "image/png".to_owned(),
        bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
    }
}

pub fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::new(1024, 1, 1)
}

pub async fn session_for(sessions: &InMemorySessionRepository, user_id: i64) -> Session {
    let user = User::mock(user_id, "Test User", "test@example.com");
    let data = SessionData::for_user(&user, Duration::hours(1));
    let id = sessions.create(data.clone()).await.unwrap();
    Session::new(id, data)
}

/// Organization owned by `owner_id`, who joins it as admin.
pub async fn create_org(
    orgs: &MockOrganizationRepository,
    memberships: &MockMembershipRepository,
    slug: &str,
    owner_id: i64,
) -> Organization {
    let org = orgs
        .create(NewOrganization {
            name: slug.to_owned(),
            slug: slug.to_owned(),
            owner_user_id: owner_id,
        })
        .await
        .unwrap();
    join(memberships, org.id, owner_id, OrgRole::Admin).await;
    org
}

pub async fn join(
    memberships: &MockMembershipRepository,
    organization_id: OrganizationId,
    user_id: i64,
    role: OrgRole,
) -> Membership {
    memberships
        .create(CreateMembership {
            organization_id,
            user_id,
            role,
        })
        .await
        .unwrap()
}

pub async fn create_user(users: &MockUserRepository, name: &str, email: &str) -> User {
    users
        .create_user(NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            hashed_password: "not-a-real-hash".to_owned(),
            global_role: GlobalRole::Member,
        })
        .await
        .unwrap()
}

pub async fn global_admin(users: &MockUserRepository) -> User {
    users
        .create_user(NewUser {
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            hashed_password: "not-a-real-hash".to_owned(),
            global_role: GlobalRole::Admin,
        })
        .await
        .unwrap()
}
