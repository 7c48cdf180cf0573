use chrono::Utc;

use crate::events::{OrgEvent, dispatch};
use crate::session::{Session, SessionRepository};
use crate::OrgbookError;

pub struct LogoutAction<S: SessionRepository> {
    session_repository: S,
}

impl<S: SessionRepository> LogoutAction<S> {
    pub fn new(session_repository: S) -> Self {
        LogoutAction { session_repository }
    }

    /// Destroys the session; the active organization goes with it.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all, err)
    )]
    pub async fn execute(&self, session: &Session) -> Result<(), OrgbookError> {
        self.session_repository.destroy(&session.id).await?;

        dispatch(OrgEvent::LogoutSuccess {
            user_id: session.data.user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "orgbook::session",
            "msg=\"logout success\", user_id={}",
            session.data.user_id
        );

        Ok(())
    }
}
