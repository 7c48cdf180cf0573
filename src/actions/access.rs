use crate::{Membership, MembershipRepository, OrganizationId, OrgbookError, User};

/// The user's membership in the organization, or `Forbidden`.
pub(crate) async fn require_member<M: MembershipRepository>(
    membership_repository: &M,
    organization_id: OrganizationId,
    user_id: i64,
) -> Result<Membership, OrgbookError> {
    membership_repository
        .find(organization_id, user_id)
        .await?
        .ok_or(OrgbookError::Forbidden)
}

/// Like [`require_member`] but the membership must carry the admin role.
pub(crate) async fn require_admin<M: MembershipRepository>(
    membership_repository: &M,
    organization_id: OrganizationId,
    user_id: i64,
) -> Result<Membership, OrgbookError> {
    let membership = require_member(membership_repository, organization_id, user_id).await?;
    if membership.is_admin() {
        Ok(membership)
    } else {
        Err(OrgbookError::Forbidden)
    }
}

/// `LastAdmin` when `membership` is the only admin left.
pub(crate) async fn ensure_not_last_admin<M: MembershipRepository>(
    membership_repository: &M,
    membership: &Membership,
) -> Result<(), OrgbookError> {
    if membership.is_admin()
        && membership_repository
            .count_admins(membership.organization_id)
            .await?
            <= 1
    {
        return Err(OrgbookError::LastAdmin);
    }
    Ok(())
}

/// Global user administration is limited to global admins.
pub(crate) fn require_global_admin(user: &User) -> Result<(), OrgbookError> {
    if user.is_global_admin() {
        Ok(())
    } else {
        Err(OrgbookError::Forbidden)
    }
}
