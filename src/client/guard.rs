use super::{session::TokenStore, ClientError};

/// Screens of the finance client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Signup,
    Home,
    Transactions,
}

impl Page {
    pub fn is_protected(self) -> bool {
        matches!(self, Page::Home | Page::Transactions)
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Login => "/login",
            Page::Signup => "/signup",
            Page::Home => "/",
            Page::Transactions => "/transactions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render,
    Redirect(Page),
}

/// Anonymous visitors of protected pages go to login; signed-in visitors of
/// the auth pages go home.
pub fn resolve(page: Page, authenticated: bool) -> Access {
    match (page.is_protected(), authenticated) {
        (true, false) => Access::Redirect(Page::Login),
        (false, true) => Access::Redirect(Page::Home),
        _ => Access::Render,
    }
}

/// Where the client lands after a successful login or signup.
pub fn after_auth() -> Page {
    Page::Home
}

/// Token for a protected operation, or `NotAuthenticated`.
pub fn require_session(store: &TokenStore) -> Result<String, ClientError> {
    store.token()?.ok_or(ClientError::NotAuthenticated)
}

/// Gate for the login and signup pages: refuses when a session is stored.
pub fn require_anonymous(store: &TokenStore, page: Page) -> Result<(), ClientError> {
    match resolve(page, store.is_authenticated()) {
        Access::Render => Ok(()),
        Access::Redirect(to) => Err(ClientError::AlreadyAuthenticated(to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_pages_redirect_anonymous_users() {
        assert_eq!(resolve(Page::Home, false), Access::Redirect(Page::Login));
        assert_eq!(resolve(Page::Transactions, false), Access::Redirect(Page::Login));
        assert_eq!(resolve(Page::Home, true), Access::Render);
    }

    #[test]
    fn auth_pages_redirect_signed_in_users() {
        assert_eq!(resolve(Page::Login, false), Access::Render);
        assert_eq!(resolve(Page::Signup, false), Access::Render);
        assert_eq!(resolve(Page::Login, true), Access::Redirect(Page::Home));
        assert_eq!(after_auth().path(), "/");
    }

    #[test]
    fn require_session_without_token() {
        let store = TokenStore::new(
            std::env::temp_dir().join(format!("finboard-guard-{}", uuid::Uuid::new_v4())),
        );
        assert!(matches!(
            require_session(&store),
            Err(ClientError::NotAuthenticated)
        ));
        store.set_token("t").unwrap();
        assert_eq!(require_session(&store).unwrap(), "t");
        store.remove_token().unwrap();
    }

    #[test]
    fn auth_pages_refuse_a_stored_session() {
        let store = TokenStore::new(
            std::env::temp_dir().join(format!("finboard-guard-{}", uuid::Uuid::new_v4())),
        );
        require_anonymous(&store, Page::Login).unwrap();
        require_anonymous(&store, Page::Signup).unwrap();

        store.set_token("t").unwrap();
        for page in [Page::Login, Page::Signup] {
            match require_anonymous(&store, page) {
                Err(ClientError::AlreadyAuthenticated(to)) => assert_eq!(to, Page::Home),
                other => panic!("unexpected result: {other:?}"),
            }
        }
        assert_eq!(
            require_anonymous(&store, Page::Login).unwrap_err().to_string(),
            "already logged in, redirecting to /; run `logout` first"
        );
        store.remove_token().unwrap();
    }
}
