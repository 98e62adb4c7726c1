use crate::error::{Error, Result};
use crate::model::User;
use crate::storage::DataDir;
use crate::store::UserStore;

#[derive(Debug, Clone)]
pub struct UserLogic {
    users: UserStore,
}

impl UserLogic {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }

    pub fn from_data_dir(data_dir: &DataDir) -> Self {
        Self::new(UserStore::from_data_dir(data_dir))
    }

    /// Authenticate by exact email and password match.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        match self.users.find_by_credentials(email, password)? {
            Some(user) => {
                tracing::info!(user = user.code, "login succeeded");
                Ok(user)
            }
            None => {
                tracing::info!(email, "login rejected");
                Err(Error::AuthenticationFailed)
            }
        }
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.users.find_all()
    }
}
