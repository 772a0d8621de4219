//! Domain model for citizen accounts.

mod error;
mod ids;
mod profile;
mod user;

pub use error::AccountDomainError;
pub use ids::UserId;
pub use profile::{CitizenProfile, PersistedProfileData};
pub use user::{User, Username};
