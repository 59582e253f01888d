//! Read-only repositories over the user/team store.

mod teams;
mod users;

pub use teams::TeamsRepository;
pub use users::UsersRepository;
