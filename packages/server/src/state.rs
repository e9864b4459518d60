use std::sync::Arc;

use api::auth::TokenService;
use api::{NoteService, UserService};
use store::Store;

/// Services shared by every handler.
pub struct AppState<S: Store> {
    pub users: Arc<UserService<S>>,
    pub notes: Arc<NoteService<S>>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: Arc<S>, tokens: TokenService) -> Self {
        Self {
            users: Arc::new(UserService::new(store.clone(), tokens)),
            notes: Arc::new(NoteService::new(store)),
        }
    }
}

// derive(Clone) would demand S: Clone
impl<S: Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            notes: self.notes.clone(),
        }
    }
}
