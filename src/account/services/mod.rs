//! Account orchestration services.

mod accounts;

pub use accounts::{AccountService, AccountServiceError, AccountServiceResult, RegisterUserRequest};
