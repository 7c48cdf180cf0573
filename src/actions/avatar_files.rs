use crate::storage::AvatarStorage;

/// Deletes a stored avatar, logging instead of failing. Callers run this after
/// the database write has settled, either committed or rejected.
pub(crate) async fn discard_avatar<A: AvatarStorage>(storage: &A, path: &str) {
    if let Err(e) = storage.delete(path).await {
        log::warn!(
            target: "orgbook::storage",
            "msg=\"failed to delete avatar\", path=\"{path}\", error=\"{e}\""
        );
    }
}
