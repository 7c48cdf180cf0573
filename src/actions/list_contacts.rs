use crate::context::OrgContext;
use crate::{Contact, ContactRepository, OrgbookError};

pub struct ListContactsAction<C: ContactRepository> {
    contact_repository: C,
}

impl<C: ContactRepository> ListContactsAction<C> {
    pub fn new(contact_repository: C) -> Self {
        ListContactsAction { contact_repository }
    }

    /// Contacts of the active organization, optionally filtered by a
    /// case-insensitive search over names and email.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_contacts", skip_all, err)
    )]
    pub async fn execute(
        &self,
        ctx: &OrgContext,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, OrgbookError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.contact_repository
            .list(ctx.organization_id, search)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{member_context, new_contact};
    use crate::MockContactRepository;

    #[tokio::test]
    async fn test_list_is_scoped_and_searchable() {
        let contacts = MockContactRepository::new();
        let ctx = member_context(1, 10);
        for (first, last) in [("Jane", "Doe"), ("John", "Smith")] {
            contacts
                .create(ctx.organization_id, new_contact(first, last, None))
                .await
                .unwrap();
        }
        contacts
            .create(crate::OrganizationId(11), new_contact("Other", "Org", None))
            .await
            .unwrap();

        let action = ListContactsAction::new(contacts);

        assert_eq!(action.execute(&ctx, None).await.unwrap().len(), 2);
        assert_eq!(action.execute(&ctx, Some("   ")).await.unwrap().len(), 2);

        let found = action.execute(&ctx, Some("smi")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "John");

        assert!(action.execute(&ctx, Some("other")).await.unwrap().is_empty());
    }
}
